//! `ponyprompt categories` — Show the corpus survey.

use ponyprompt_config::AppConfig;
use ponyprompt_corpus::FsCorpus;
use ponyprompt_engine::PromptComposer;
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let composer = PromptComposer::from_config(Arc::new(FsCorpus::new()), &config);

    println!("📚 Corpus: {}", config.corpus.resolved_root().display());
    println!(
        "   Extension: {}",
        config.corpus.extension_filter().unwrap_or("(any)")
    );
    println!();

    for status in composer.survey() {
        if status.available {
            println!(
                "  ✅ {:<12} {:<16} {} file(s)",
                status.name, status.subdir, status.files
            );
        } else {
            println!(
                "  ❌ {:<12} {:<16} {}",
                status.name,
                status.subdir,
                status.error.as_deref().unwrap_or("unavailable")
            );
        }
    }

    Ok(())
}
