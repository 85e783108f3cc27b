//! Core types for PLR export processing
//!
//! Shared by every crate in the workspace:
//!
//! - [`Error`] / [`Result`]: the error type of the statistics and rendering crates
//! - [`config`]: explicit configuration threaded through the pipelines
//! - [`schema`]: column names of the device export and physiology dataset

pub mod config;
mod error;
pub mod schema;

pub use config::{
    AnalysisConfig, AppendHeader, AveragerConfig, DisplayOptions, GroupLabels, Protocol,
    SplitterConfig,
};
pub use error::{Error, Result};
