pub mod collect;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
