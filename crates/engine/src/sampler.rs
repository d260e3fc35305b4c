//! Category sampling — pick one payload from a category's files.
//!
//! Nothing in here fails. Missing directories, unreadable files, and files
//! without usable lines become [`Diagnostic`]s on the returned
//! [`SampleOutcome`], and the category simply contributes no fragment.

use crate::extract::{DELIMITER, TextEncoding, extract_lines, payload_of};
use ponyprompt_core::corpus::{Category, CorpusSource};
use ponyprompt_core::diagnostic::{Diagnostic, DiagnosticKind};
use ponyprompt_core::error::CorpusError;
use ponyprompt_core::policy::SelectionPolicy;
use ponyprompt_core::prompt::Fragment;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of sampling one category.
#[derive(Debug, Clone, Default)]
pub struct SampleOutcome {
    pub fragment: Option<Fragment>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Samples fragments from categories under a fixed corpus root.
pub struct CategorySampler {
    source: Arc<dyn CorpusSource>,
    root: PathBuf,
    extension: Option<String>,
    policy: SelectionPolicy,
}

impl CategorySampler {
    pub fn new(
        source: Arc<dyn CorpusSource>,
        root: impl Into<PathBuf>,
        extension: Option<String>,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            source,
            root: root.into(),
            extension,
            policy,
        }
    }

    /// Name of the backing corpus source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Candidate file names for `category`, sorted.
    pub fn candidates(&self, category: &Category) -> Result<Vec<String>, CorpusError> {
        let names = self.source.list_files(&category.dir(&self.root))?;
        Ok(names
            .into_iter()
            .filter(|name| self.has_extension(name))
            .collect())
    }

    fn has_extension(&self, name: &str) -> bool {
        match &self.extension {
            None => true,
            Some(ext) => Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == ext),
        }
    }

    /// Sample one payload from `category`.
    pub fn sample<R: Rng + ?Sized>(&self, category: &Category, rng: &mut R) -> SampleOutcome {
        let mut outcome = SampleOutcome::default();

        let mut files = match self.candidates(category) {
            Ok(files) => files,
            Err(e) => {
                outcome.diagnostics.push(Diagnostic::category(
                    &category.name,
                    DiagnosticKind::CorpusUnavailable,
                    e.to_string(),
                ));
                return outcome;
            }
        };

        if files.is_empty() {
            outcome.diagnostics.push(Diagnostic::category(
                &category.name,
                DiagnosticKind::NoEligibleContent,
                format!(
                    "no candidate files in {}",
                    category.dir(&self.root).display()
                ),
            ));
            return outcome;
        }

        let dir = category.dir(&self.root);
        match self.policy {
            SelectionPolicy::SinglePick => {
                if let Some(file) = files.choose(rng) {
                    outcome.fragment =
                        self.sample_file(category, &dir, file, rng, &mut outcome.diagnostics);
                }
            }
            SelectionPolicy::ShuffleFallback => {
                files.shuffle(rng);
                for file in &files {
                    let fragment =
                        self.sample_file(category, &dir, file, rng, &mut outcome.diagnostics);
                    if fragment.is_some() {
                        outcome.fragment = fragment;
                        break;
                    }
                }
                if outcome.fragment.is_none() {
                    outcome.diagnostics.push(Diagnostic::category(
                        &category.name,
                        DiagnosticKind::NoEligibleContent,
                        format!("all {} candidate files exhausted", files.len()),
                    ));
                }
            }
        }

        outcome
    }

    /// Read one file and pick a payload from it according to the policy.
    fn sample_file<R: Rng + ?Sized>(
        &self,
        category: &Category,
        dir: &Path,
        file: &str,
        rng: &mut R,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Fragment> {
        let bytes = match self.source.read_file(&dir.join(file)) {
            Ok(bytes) => bytes,
            Err(e) => {
                diagnostics.push(Diagnostic::file(
                    &category.name,
                    file,
                    DiagnosticKind::FileUnreadable,
                    e.to_string(),
                ));
                return None;
            }
        };

        let mut extracted = extract_lines(&bytes);
        if extracted.encoding == TextEncoding::Latin1 {
            diagnostics.push(Diagnostic::file(
                &category.name,
                file,
                DiagnosticKind::EncodingFallback,
                "not valid UTF-8, decoded as Latin-1",
            ));
        }

        if extracted.is_empty() {
            diagnostics.push(Diagnostic::file(
                &category.name,
                file,
                DiagnosticKind::NoEligibleContent,
                format!("no lines containing '{DELIMITER}'"),
            ));
            return None;
        }

        let payload = match self.policy {
            SelectionPolicy::SinglePick => extracted
                .lines
                .choose(rng)
                .and_then(|line| payload_of(line))
                .map(str::to_string),
            SelectionPolicy::ShuffleFallback => {
                extracted.lines.shuffle(rng);
                extracted
                    .lines
                    .iter()
                    .find_map(|line| payload_of(line))
                    .map(str::to_string)
            }
        };

        if payload.is_none() {
            diagnostics.push(Diagnostic::file(
                &category.name,
                file,
                DiagnosticKind::NoEligibleContent,
                "payload is empty",
            ));
        }

        payload.map(|text| Fragment {
            category: category.name.clone(),
            file: file.to_string(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponyprompt_corpus::InMemoryCorpus;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn sampler(corpus: InMemoryCorpus, policy: SelectionPolicy) -> CategorySampler {
        CategorySampler::new(Arc::new(corpus), "/corpus", Some("txt".into()), policy)
    }

    fn faces() -> Category {
        Category::new("faces", "01_faces")
    }

    fn text_of(outcome: &SampleOutcome) -> Option<&str> {
        outcome.fragment.as_ref().map(|f| f.text.as_str())
    }

    #[test]
    fn reports_source_name() {
        let sampler = sampler(InMemoryCorpus::new(), SelectionPolicy::SinglePick);
        assert_eq!(sampler.source_name(), "in_memory");
    }

    #[test]
    fn missing_directory_is_absent() {
        let sampler = sampler(InMemoryCorpus::new(), SelectionPolicy::ShuffleFallback);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = sampler.sample(&faces(), &mut rng);
        assert!(outcome.fragment.is_none());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::CorpusUnavailable);
    }

    #[test]
    fn empty_directory_is_absent() {
        let corpus = InMemoryCorpus::new().with_dir("/corpus/01_faces");
        let outcome = sampler(corpus, SelectionPolicy::ShuffleFallback)
            .sample(&faces(), &mut StdRng::seed_from_u64(1));
        assert!(outcome.fragment.is_none());
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::NoEligibleContent);
    }

    #[test]
    fn extension_filter_applies() {
        let corpus = InMemoryCorpus::new()
            .with_file("/corpus/01_faces/notes.md", "x = from markdown")
            .with_file("/corpus/01_faces/faces.txt", "x = from text");
        let sampler = sampler(corpus, SelectionPolicy::ShuffleFallback);
        assert_eq!(sampler.candidates(&faces()).unwrap(), ["faces.txt"]);
        for seed in 0..20 {
            let outcome = sampler.sample(&faces(), &mut StdRng::seed_from_u64(seed));
            assert_eq!(text_of(&outcome), Some("from text"));
        }
    }

    #[test]
    fn no_extension_filter_accepts_any_file() {
        let corpus = InMemoryCorpus::new().with_file("/corpus/01_faces/notes.md", "x = md");
        let sampler = CategorySampler::new(
            Arc::new(corpus),
            "/corpus",
            None,
            SelectionPolicy::ShuffleFallback,
        );
        let outcome = sampler.sample(&faces(), &mut StdRng::seed_from_u64(3));
        assert_eq!(text_of(&outcome), Some("md"));
    }

    #[test]
    fn fallback_skips_bad_files() {
        let corpus = InMemoryCorpus::new()
            .with_file("/corpus/01_faces/a.txt", "novalue\nstill nothing")
            .with_unreadable("/corpus/01_faces/b.txt", "permission denied")
            .with_file("/corpus/01_faces/c.txt", "blank =   ")
            .with_file("/corpus/01_faces/d.txt", "face = good");
        let sampler = sampler(corpus, SelectionPolicy::ShuffleFallback);

        for seed in 0..50 {
            let outcome = sampler.sample(&faces(), &mut StdRng::seed_from_u64(seed));
            let fragment = outcome.fragment.expect("fallback should reach d.txt");
            assert_eq!(fragment.text, "good");
            assert_eq!(fragment.file, "d.txt");
            assert_eq!(fragment.category, "faces");
            assert!(outcome.diagnostics.iter().all(|d| d.file.as_deref() != Some("d.txt")));
        }
    }

    #[test]
    fn fallback_exhausted_reports_every_file() {
        let corpus = InMemoryCorpus::new()
            .with_file("/corpus/01_faces/a.txt", "novalue")
            .with_unreadable("/corpus/01_faces/b.txt", "gone");
        let outcome = sampler(corpus, SelectionPolicy::ShuffleFallback)
            .sample(&faces(), &mut StdRng::seed_from_u64(9));
        assert!(outcome.fragment.is_none());
        let kinds: Vec<DiagnosticKind> = outcome.diagnostics.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::FileUnreadable));
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == DiagnosticKind::NoEligibleContent)
                .count(),
            2
        );
    }

    #[test]
    fn fallback_tries_other_lines_in_same_file() {
        let corpus = InMemoryCorpus::new().with_file(
            "/corpus/01_faces/a.txt",
            "empty =\nalso empty =  \nface = the only one",
        );
        let sampler = sampler(corpus, SelectionPolicy::ShuffleFallback);
        for seed in 0..30 {
            let outcome = sampler.sample(&faces(), &mut StdRng::seed_from_u64(seed));
            assert_eq!(text_of(&outcome), Some("the only one"));
        }
    }

    #[test]
    fn single_pick_does_not_retry() {
        let corpus = InMemoryCorpus::new()
            .with_file("/corpus/01_faces/a.txt", "novalue")
            .with_file("/corpus/01_faces/b.txt", "face = good");
        let sampler = sampler(corpus, SelectionPolicy::SinglePick);
        let mut rng = StdRng::seed_from_u64(42);

        let mut hits = 0;
        let mut misses = 0;
        for _ in 0..200 {
            let outcome = sampler.sample(&faces(), &mut rng);
            match text_of(&outcome) {
                Some("good") => hits += 1,
                None => {
                    misses += 1;
                    assert_eq!(outcome.diagnostics[0].file.as_deref(), Some("a.txt"));
                }
                other => panic!("unexpected fragment {other:?}"),
            }
        }
        assert!(hits > 50 && misses > 50, "hits={hits} misses={misses}");
    }

    #[test]
    fn latin1_file_is_sampled_with_diagnostic() {
        let corpus =
            InMemoryCorpus::new().with_file("/corpus/01_faces/a.txt", [b'x', b'=', b'n', 0xE9]);
        let outcome = sampler(corpus, SelectionPolicy::ShuffleFallback)
            .sample(&faces(), &mut StdRng::seed_from_u64(0));
        assert_eq!(text_of(&outcome), Some("né"));
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::EncodingFallback);
    }

    #[test]
    fn selection_is_uniform_across_files_and_lines() {
        let corpus = InMemoryCorpus::new()
            .with_file("/corpus/01_faces/a.txt", "x = a1\nx = a2")
            .with_file("/corpus/01_faces/b.txt", "x = b1");
        let sampler = sampler(corpus, SelectionPolicy::ShuffleFallback);
        let mut rng = StdRng::seed_from_u64(7);

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..4000 {
            let outcome = sampler.sample(&faces(), &mut rng);
            *counts.entry(outcome.fragment.unwrap().text).or_default() += 1;
        }

        // Files are equally likely; lines within a file are equally likely.
        let b1 = counts["b1"];
        let a1 = counts["a1"];
        let a2 = counts["a2"];
        assert!((1700..2300).contains(&b1), "b1={b1}");
        assert!((800..1200).contains(&a1), "a1={a1}");
        assert!((800..1200).contains(&a2), "a2={a2}");
    }

    #[test]
    fn same_seed_same_fragment() {
        let corpus = InMemoryCorpus::new()
            .with_file("/corpus/01_faces/a.txt", "x = 1\nx = 2\nx = 3")
            .with_file("/corpus/01_faces/b.txt", "x = 4\nx = 5");
        let sampler = sampler(corpus, SelectionPolicy::ShuffleFallback);
        for seed in 0..20 {
            let first = sampler.sample(&faces(), &mut StdRng::seed_from_u64(seed));
            let second = sampler.sample(&faces(), &mut StdRng::seed_from_u64(seed));
            assert_eq!(first.fragment, second.fragment);
        }
    }
}
