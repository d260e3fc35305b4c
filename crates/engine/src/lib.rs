//! The PonyPrompt engine.
//!
//! Three layers, leaf-first:
//!
//! 1. [`extract`] turns raw file bytes into eligible lines and payloads
//! 2. [`sampler`] picks one payload per category, falling back across files
//! 3. [`composer`] merges user text with the per-category fragments
//!
//! Randomness is always injected, so a seeded RNG reproduces a prompt
//! exactly.

pub mod composer;
pub mod extract;
pub mod sampler;

pub use composer::{ComposerSettings, PromptComposer};
pub use extract::{DELIMITER, ExtractedLines, TextEncoding, extract_lines, payload_of};
pub use sampler::{CategorySampler, SampleOutcome};
