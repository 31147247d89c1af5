//! Extraction and tallying for conference review CSV exports: reviewer
//! coverage per primary, reviewer workloads, paper scores, declines and
//! their join.

pub mod aggregate;
pub mod columns;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractors;
pub mod filter;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod table;
pub mod transform;

pub use error::{Result, TallyError};
pub use extractors::{Extraction, Extractor, PassStats};
pub use output::{OutputFormat, OutputTable};
pub use pipeline::Pipeline;
pub use table::{Record, Table};
