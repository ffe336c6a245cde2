//! `babycare` - A local-first tracker for infant feeding, sleep, diapers, and growth
//!
//! This library provides baby profiles with chronological and corrected age,
//! typed care records, daily and weekly summaries, and SQLite persistence.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod age;
pub mod baby;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod records;
pub mod storage;
pub mod store;
pub mod summary;

pub use age::{compute_age, compute_corrected_age, AgeResult};
pub use baby::{BabyProfile, Gender};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use records::{CareRecord, RecordEntry, RecordKind};
pub use storage::{RecordFilter, Storage, StorageStats};
pub use store::{BabyRepository, BabyStore};
pub use summary::{DailySummary, WeeklySummary};
