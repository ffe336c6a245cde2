//! Command-line interface for babycare.
//!
//! This module provides the CLI structure for the `babycare` binary and the
//! parsers for its date, time, and duration arguments.

mod commands;
pub mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AcceptanceArg, AgeCommand, BabyAddArgs, BabyCommand, BabyUpdateArgs, ConfigCommand,
    DiaperArgs, DiaperStatusArg, DiaperTypeArg, FeedingArgs, FeedingMethodArg, FeedingTypeArg,
    GenderArg, GrowthArgs, OutputFormat, PeeColorArg, PoopColorArg, ProfileDetails,
    RecordCommand, RecordKindArg, RecordTarget, RecordsCommand, SleepArgs, SleepQualityArg,
    SleepTypeArg, StatusCommand, SummaryCommand,
};

use crate::logging::Verbosity;

/// babycare - Track feeding, sleep, diapers, and growth for your baby
///
/// Keeps baby profiles and care records in a local database and reports
/// chronological and corrected age.
#[derive(Debug, Parser)]
#[command(name = "babycare")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage baby profiles
    #[command(subcommand)]
    Baby(BabyCommand),

    /// Show a baby's age and corrected age
    Age(AgeCommand),

    /// Add a care record
    Record {
        /// Target baby, time, and notes
        #[command(flatten)]
        target: RecordTarget,

        /// The kind of record to add
        #[command(subcommand)]
        command: RecordCommand,
    },

    /// Browse or delete care records
    #[command(subcommand)]
    Records(RecordsCommand),

    /// Summarize a day or a week
    #[command(subcommand)]
    Summary(SummaryCommand),

    /// Show database and selection status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
