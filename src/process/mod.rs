// src/process/mod.rs
pub mod directory;
pub mod raw_table;
pub mod reshape;
pub mod utils;

pub use directory::{AthleteDirectory, AthleteRef, LeaderboardLink};
pub use raw_table::{extract_table_rows, RawBatch, RawRecord, RawTable, RawTableRow};
pub use reshape::{reshape, Trial, TrialResult};
