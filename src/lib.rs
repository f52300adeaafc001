//! Pattern-based extraction of staff entries and detail fields from HTML pages.
//!
//! `parser` holds the pure transforms; `fetch`, `present` and `pipeline`
//! wire them to HTTP and output.

pub mod config;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod pipeline;
pub mod present;

pub use crate::config::{Settings, Target, TargetKind};
pub use crate::error::{ConfigError, FetchError};
pub use crate::pipeline::{Extractors, Outcome, Report};
