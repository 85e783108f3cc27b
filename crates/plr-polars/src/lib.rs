//! Polars integration for PLR export processing
//!
//! This crate provides CSV I/O and a single extension trait, [`PlrFrameExt`],
//! carrying the table operations of the averaging, splitting and group
//! statistics pipelines.
//!
//! # Example
//!
//! ```rust,ignore
//! use polars::prelude::*;
//! use plr_polars::PlrFrameExt;
//!
//! let df = df![
//!     "MeasurementType" => ["1", "1", "2"],
//!     "Pupil Measured" => ["Left", "Left", "Left"],
//!     "PLR Latency" => [0.21, 0.23, 0.25],
//! ]?;
//!
//! let means = df.grouped_means(&["MeasurementType", "Pupil Measured"], &[])?;
//! assert_eq!(means.height(), 2);
//! ```

mod error;
pub mod io;
mod key;
mod methods;
mod traits;


pub use error::{Error, Result};
pub use io::{append_csv, read_csv, write_csv};
pub use key::GroupKey;
pub use traits::PlrFrameExt;
