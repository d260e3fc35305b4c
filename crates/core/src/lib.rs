//! # PonyPrompt Core
//!
//! Domain types, traits, and error definitions for the PonyPrompt prompt
//! generator. This crate has **no I/O of its own**. It defines the model
//! that the corpus backends, the sampling engine, and the adapters build on.
//!
//! ## Layout
//!
//! - [`corpus`]: the `CorpusSource` capability and the `Category` type
//! - [`diagnostic`]: non-fatal problems met while sampling
//! - [`policy`]: selection and empty-prompt policies
//! - [`prompt`]: fragments, prompt results, and category status
//! - [`error`]: the error taxonomy

pub mod corpus;
pub mod diagnostic;
pub mod error;
pub mod policy;
pub mod prompt;

// Re-export key types at crate root for ergonomics
pub use corpus::{Category, CorpusSource};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{CorpusError, Error, Result};
pub use policy::{EmptyPromptPolicy, SelectionPolicy};
pub use prompt::{CategoryStatus, Fragment, PromptResult};
