//! File-level front-ends
//!
//! The modes a Git clean filter is actually invoked in: the
//! stdin-to-stdout filter, the sequential in-place converter, and the
//! one-shot `git config` installation helper.

pub mod convert;
pub mod filter;
pub mod install;

pub use convert::{convert_file, convert_files, BatchSummary};
pub use filter::run_filter;
pub use install::install;
