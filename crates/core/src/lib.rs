//! Core library for qagen
//!
//! This crate implements the **Functional Core** of the qagen application:
//! pure transformation functions with zero I/O.
//!
//! The `qagen` crate (the Imperative Shell) owns the provider HTTP calls,
//! the CLI, the web server, and file output; everything here is a
//! deterministic mapping from inputs to outputs, testable with fixture data
//! and no mocking.
//!
//! # Module Organization
//!
//! - [`extract`]: the response validation and extraction contract: raw
//!   model completion text in, vetted question/answer pairs out
//! - [`prompt`]: prompt construction for the completion providers
//! - [`types`]: domain types shared across entry points

pub mod extract;
pub mod prompt;
pub mod types;

pub use extract::{extract_qa_pairs, ExtractionError};
pub use prompt::{build_combined_prompt, build_user_prompt, SYSTEM_PREAMBLE};
pub use types::{GenerationRequest, QaPair};
