//! Batch pipelines for pupillary light reflex (PLR) exports
//!
//! Three independent pipelines, each with its own binary:
//!
//! - [`averager`]: per-subject means by measurement type and pupil, appended
//!   to a cumulative master CSV (`plr-average`)
//! - [`splitter`]: one CSV per measurement type and pupil (`plr-split`)
//! - [`group_stats`]: correlations, normality-gated group tests and ANCOVA
//!   between pregnant and control subjects (`plr-group-stats`)
//!
//! Paths come from a [`PathProvider`]; when it has nothing to offer a
//! pipeline returns [`Outcome::NoSelection`] instead of failing.

pub mod artifacts;
pub mod averager;
pub mod group_stats;
pub mod logging;
pub mod paths;
pub mod report;
pub mod splitter;

mod error;

pub use averager::{average_subject, run_averager, AverageSummary};
pub use error::{Error, Result};
pub use group_stats::{run_group_stats, CoalesceSummary, GroupStatistics, GroupStatsPipeline};
pub use paths::{FixedPaths, PathProvider, PromptPaths, WithFallback};
pub use splitter::{run_splitter, split_export, SplitFile};

pub use plr_core::{
    AnalysisConfig, AppendHeader, AveragerConfig, DisplayOptions, Protocol, SplitterConfig,
};

/// Result of a pipeline run
#[derive(Debug)]
pub enum Outcome<T> {
    Completed(T),
    /// No input or output path was chosen; nothing was read or written
    NoSelection,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::NoSelection => None,
        }
    }

    pub fn is_no_selection(&self) -> bool {
        matches!(self, Self::NoSelection)
    }
}
