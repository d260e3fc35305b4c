//! `ponyprompt generate` — Compose one prompt from the filesystem corpus.

use ponyprompt_config::AppConfig;
use ponyprompt_corpus::FsCorpus;
use ponyprompt_engine::PromptComposer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

pub async fn run(
    text: String,
    seed: Option<u64>,
    explain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let composer = PromptComposer::from_config(Arc::new(FsCorpus::new()), &config);

    let composed = match seed {
        Some(seed) => composer.compose(&text, &mut StdRng::seed_from_u64(seed)),
        None => composer.compose(&text, &mut rand::rng()),
    };
    let result = match composed {
        Ok(result) => result,
        Err(e) => {
            for diagnostic in e.diagnostics() {
                diagnostic.emit();
            }
            return Err(e.into());
        }
    };
    result.emit_diagnostics();

    println!("{}", result.full_prompt);

    if explain {
        println!();
        println!("Fragments:");
        if result.fragments.is_empty() {
            println!("  (none)");
        }
        for fragment in &result.fragments {
            println!(
                "  {:<12} {:<24} {}",
                fragment.category, fragment.file, fragment.text
            );
        }

        if !result.diagnostics.is_empty() {
            println!();
            println!("Diagnostics:");
            for diagnostic in &result.diagnostics {
                println!("  {diagnostic}");
            }
        }
    }

    Ok(())
}
