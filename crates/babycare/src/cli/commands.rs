//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands. Dates and times
//! stay as strings here and are parsed by [`super::input`] in the handlers,
//! where "today" and "now" are known.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::baby::Gender;
use crate::records::{
    Acceptance, DiaperStatus, DiaperType, FeedingMethod, FeedingType, PeeColor, PoopColor,
    RecordKind, SleepQuality, SleepType,
};

/// Declares a clap value enum that mirrors a domain enum variant for variant.
macro_rules! value_arg {
    (
        $(#[$meta:meta])*
        $name:ident => $target:ty {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl From<$name> for $target {
            fn from(arg: $name) -> Self {
                match arg {
                    $( $name::$variant => Self::$variant ),+
                }
            }
        }
    };
}

value_arg! {
    /// Gender argument.
    GenderArg => Gender {
        /// Boy
        Male,
        /// Girl
        Female,
    }
}

value_arg! {
    /// What was fed.
    FeedingTypeArg => FeedingType {
        /// Breast milk
        BreastMilk,
        /// Formula
        Formula,
        /// Breast milk and formula
        Mixed,
        /// Solid food
        SolidFood,
    }
}

value_arg! {
    /// How milk was given.
    FeedingMethodArg => FeedingMethod {
        /// Nursing at the breast
        Breastfeeding,
        /// From a bottle
        Bottle,
    }
}

value_arg! {
    /// How much of a feed was taken.
    AcceptanceArg => Acceptance {
        /// Finished everything
        Full,
        /// About half
        Half,
        /// Very little
        Little,
        /// Refused
        Refused,
    }
}

value_arg! {
    /// Kind of sleep.
    SleepTypeArg => SleepType {
        /// Night sleep
        NightSleep,
        /// Daytime nap
        Nap,
    }
}

value_arg! {
    /// Sleep quality.
    SleepQualityArg => SleepQuality {
        /// Slept well
        Good,
        /// Some fussing
        Fair,
        /// Restless
        Poor,
    }
}

value_arg! {
    /// What was in the diaper.
    DiaperTypeArg => DiaperType {
        /// Wet
        Pee,
        /// Dirty
        Poop,
        /// Wet and dirty
        Both,
    }
}

value_arg! {
    /// Consistency.
    DiaperStatusArg => DiaperStatus {
        /// Normal
        Normal,
        /// Drier than usual
        Dry,
        /// Looser than usual
        Loose,
    }
}

value_arg! {
    /// Urine colour.
    PeeColorArg => PeeColor {
        /// Clear to pale
        Clear,
        /// Light yellow
        LightYellow,
        /// Yellow
        Yellow,
        /// Dark yellow
        DarkYellow,
        /// Orange
        Orange,
        /// Red
        Red,
        /// Brown
        Brown,
    }
}

value_arg! {
    /// Stool colour.
    PoopColorArg => PoopColor {
        /// Yellow
        Yellow,
        /// Golden
        Golden,
        /// Brown
        Brown,
        /// Green
        Green,
        /// Black
        Black,
        /// White or pale
        White,
        /// Red
        Red,
    }
}

value_arg! {
    /// Record kind argument for filtering.
    RecordKindArg => RecordKind {
        /// Feedings
        Feeding,
        /// Sleep sessions
        Sleep,
        /// Diaper changes
        Diaper,
        /// Growth measurements
        Growth,
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

/// Baby profile commands.
#[derive(Debug, Subcommand)]
pub enum BabyCommand {
    /// Add a baby
    Add(BabyAddArgs),

    /// List all babies
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one baby's profile (the current baby by default)
    Show {
        /// Nickname or id
        baby: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Make a baby the current one
    Use {
        /// Nickname or id
        baby: String,
    },

    /// Change a baby's profile
    Update(BabyUpdateArgs),

    /// Remove a baby and all of its records
    Remove {
        /// Nickname or id
        baby: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for `baby add`.
#[derive(Debug, Args)]
pub struct BabyAddArgs {
    /// Nickname
    pub nickname: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(short, long)]
    pub birth: String,

    /// Gender
    #[arg(short, long, value_enum)]
    pub gender: GenderArg,

    /// Birth and measurement details
    #[command(flatten)]
    pub details: ProfileDetails,
}

/// Arguments for `baby update`.
#[derive(Debug, Args)]
pub struct BabyUpdateArgs {
    /// Nickname or id
    pub baby: String,

    /// New nickname
    #[arg(long)]
    pub nickname: Option<String>,

    /// New date of birth (YYYY-MM-DD)
    #[arg(short, long)]
    pub birth: Option<String>,

    /// New gender
    #[arg(short, long, value_enum)]
    pub gender: Option<GenderArg>,

    /// Birth and measurement details
    #[command(flatten)]
    pub details: ProfileDetails,
}

/// Optional birth and measurement details shared by `add` and `update`.
#[derive(Debug, Args)]
pub struct ProfileDetails {
    /// Completed gestational weeks at birth
    #[arg(long)]
    pub weeks: Option<u32>,

    /// Extra gestational days at birth (0-6)
    #[arg(long)]
    pub days: Option<u32>,

    /// Height in cm
    #[arg(long)]
    pub height: Option<f64>,

    /// Weight in kg
    #[arg(long)]
    pub weight: Option<f64>,

    /// Head circumference in cm
    #[arg(long)]
    pub head: Option<f64>,
}

/// Age command arguments.
#[derive(Debug, Args)]
pub struct AgeCommand {
    /// Nickname or id (defaults to the current baby)
    #[arg(long)]
    pub baby: Option<String>,

    /// Compute the age on this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub on: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Options shared by every `record` subcommand.
#[derive(Debug, Args)]
pub struct RecordTarget {
    /// Nickname or id (defaults to the current baby)
    #[arg(long, global = true)]
    pub baby: Option<String>,

    /// When it happened: YYYY-MM-DDTHH:MM, "YYYY-MM-DD HH:MM" or HH:MM (today)
    #[arg(long, global = true)]
    pub at: Option<String>,

    /// Free-form notes
    #[arg(long, global = true)]
    pub notes: Option<String>,
}

/// Commands that add a care record.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Record a feeding
    Feeding(FeedingArgs),

    /// Record a sleep session
    Sleep(SleepArgs),

    /// Record a diaper change
    Diaper(DiaperArgs),

    /// Record a growth measurement
    Growth(GrowthArgs),
}

/// Arguments for `record feeding`.
#[derive(Debug, Args)]
pub struct FeedingArgs {
    /// What was fed
    #[arg(short = 't', long = "type", value_enum, default_value = "formula")]
    pub feeding_type: FeedingTypeArg,

    /// How milk was given
    #[arg(short, long, value_enum)]
    pub method: Option<FeedingMethodArg>,

    /// Amount (ml for milk unless --unit is given)
    #[arg(short, long)]
    pub amount: Option<f64>,

    /// Unit of --amount
    #[arg(long)]
    pub unit: Option<String>,

    /// Name of the solid food
    #[arg(long)]
    pub food: Option<String>,

    /// Nursing duration starting at --at (90, 90m, 1h30m)
    #[arg(short, long)]
    pub duration: Option<String>,

    /// How much was taken
    #[arg(long, value_enum, default_value = "full")]
    pub acceptance: AcceptanceArg,

    /// An allergic reaction was observed
    #[arg(long)]
    pub allergic: bool,
}

/// Arguments for `record sleep`.
#[derive(Debug, Args)]
pub struct SleepArgs {
    /// Kind of sleep
    #[arg(short = 't', long = "type", value_enum, default_value = "nap")]
    pub sleep_type: SleepTypeArg,

    /// When the baby woke up (same formats as --at)
    #[arg(long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// How long the sleep lasted (90, 90m, 1h30m)
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Sleep quality
    #[arg(long, value_enum)]
    pub quality: Option<SleepQualityArg>,

    /// Number of times the baby woke
    #[arg(short, long, default_value_t = 0)]
    pub wakes: u32,
}

/// Arguments for `record diaper`.
#[derive(Debug, Args)]
pub struct DiaperArgs {
    /// What was in the diaper
    #[arg(short = 't', long = "type", value_enum)]
    pub diaper_type: DiaperTypeArg,

    /// Urine consistency
    #[arg(long, value_enum)]
    pub pee_status: Option<DiaperStatusArg>,

    /// Urine colour
    #[arg(long, value_enum)]
    pub pee_color: Option<PeeColorArg>,

    /// Stool consistency
    #[arg(long, value_enum)]
    pub poop_status: Option<DiaperStatusArg>,

    /// Stool colour
    #[arg(long, value_enum)]
    pub poop_color: Option<PoopColorArg>,
}

/// Arguments for `record growth`.
#[derive(Debug, Args)]
pub struct GrowthArgs {
    /// Weight in kg
    #[arg(long)]
    pub weight: Option<f64>,

    /// Height in cm
    #[arg(long)]
    pub height: Option<f64>,

    /// Head circumference in cm
    #[arg(long)]
    pub head: Option<f64>,
}

/// Commands that browse or delete care records.
#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List records, newest first
    List {
        /// Nickname or id (defaults to the current baby)
        #[arg(long)]
        baby: Option<String>,

        /// Only this kind of record
        #[arg(short, long, value_enum)]
        kind: Option<RecordKindArg>,

        /// Only records on this day (YYYY-MM-DD, today, yesterday)
        #[arg(short, long)]
        date: Option<String>,

        /// Maximum number of records (defaults to records.list_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Delete a record by id
    Delete {
        /// Record id
        id: i64,
    },
}

/// Summary commands.
#[derive(Debug, Subcommand)]
pub enum SummaryCommand {
    /// Totals for one day
    Daily {
        /// Nickname or id (defaults to the current baby)
        #[arg(long)]
        baby: Option<String>,

        /// Day to summarize (YYYY-MM-DD, today, yesterday)
        #[arg(short, long)]
        date: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Totals for a Monday-based week
    Weekly {
        /// Nickname or id (defaults to the current baby)
        #[arg(long)]
        baby: Option<String>,

        /// Any day in the week to summarize (defaults to this week)
        #[arg(short, long)]
        week_of: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_arg_conversions() {
        assert_eq!(Gender::from(GenderArg::Female), Gender::Female);
        assert_eq!(
            FeedingType::from(FeedingTypeArg::SolidFood),
            FeedingType::SolidFood
        );
        assert_eq!(SleepType::from(SleepTypeArg::NightSleep), SleepType::NightSleep);
        assert_eq!(PeeColor::from(PeeColorArg::DarkYellow), PeeColor::DarkYellow);
        assert_eq!(PoopColor::from(PoopColorArg::White), PoopColor::White);
        assert_eq!(RecordKind::from(RecordKindArg::Growth), RecordKind::Growth);
    }

    #[test]
    fn test_value_arg_names_are_kebab_case() {
        let value = PeeColorArg::LightYellow.to_possible_value().unwrap();
        assert_eq!(value.get_name(), "light-yellow");

        let value = FeedingTypeArg::BreastMilk.to_possible_value().unwrap();
        assert_eq!(value.get_name(), "breast-milk");
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_status_command_debug() {
        let cmd = StatusCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }
}
