//! quizbench-core — Question files, result documents, scoring and review.
//!
//! This crate holds the data model shared by the runner, the scorer and the
//! grading editor, together with the logic that has a structural contract:
//! parsing question files, persisting result documents and computing scores.

pub mod collector;
pub mod error;
pub mod model;
pub mod parser;
pub mod review;
pub mod scoring;
pub mod store;
pub mod traits;
