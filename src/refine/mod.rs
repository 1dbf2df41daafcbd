//! Post-sampling refinement passes over kept frames.

pub mod deduplicator;
pub mod junk_filter;

pub use deduplicator::{dedupe, DedupConfig};
pub use junk_filter::{filter_junk, DEFAULT_JUNK_PATTERNS};
