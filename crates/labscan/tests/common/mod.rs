//! Shared test utilities for labscan integration tests.
//!
//! This module provides:
//! - `TestHarness` for running the pipeline against artifacts in a temp directory
//! - Builders for model artifacts and DOCX uploads

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
