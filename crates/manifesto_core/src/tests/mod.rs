//! Integration tests for the manifesto impact library
//!
//! Tests are organized by topic:
//! - `fixtures` - Recorded engines built from synthetic outputs
//! - `household` - Household attribution: identity, signs, baseline, worked example
//! - `situation` - Form input to situation mapping and validation
//! - `population` - Population summaries over a synthetic dataset
//! - `batch` - Batch runs, progress and cancellation
//! - `snapshot` - Snapshot schema, export and reload

mod fixtures;
mod household;
