//! Corpus backends for PonyPrompt.

pub mod fs;
pub mod in_memory;

pub use fs::FsCorpus;
pub use in_memory::InMemoryCorpus;
