//! `ponyprompt doctor` — Diagnose config and corpus health.

use ponyprompt_config::AppConfig;
use ponyprompt_corpus::FsCorpus;
use ponyprompt_engine::PromptComposer;
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 PonyPrompt Doctor — Corpus Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — using defaults (run `ponyprompt init`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before checking the corpus.");
            return Ok(());
        }
    };

    let root = config.corpus.resolved_root();
    if root.is_dir() {
        println!("  ✅ Corpus root exists: {}", root.display());
    } else {
        println!("  ❌ Corpus root missing: {}", root.display());
        issues += 1;
    }

    let composer = PromptComposer::from_config(Arc::new(FsCorpus::new()), &config);
    for status in composer.survey() {
        match (status.available, status.files) {
            (true, 0) => {
                println!("  ⚠️  {} has no candidate files", status.name);
                issues += 1;
            }
            (true, n) => println!("  ✅ {} — {n} file(s)", status.name),
            (false, _) => {
                println!(
                    "  ❌ {} — {}",
                    status.name,
                    status.error.as_deref().unwrap_or("unavailable")
                );
                issues += 1;
            }
        }
    }

    // A sample run surfaces unreadable files and files without usable lines.
    let sample = composer.compose("", &mut rand::rng());
    let diagnostics = match &sample {
        Ok(result) => result.diagnostics.as_slice(),
        Err(e) => {
            println!("  ⚠️  Sample composition: {e}");
            issues += 1;
            e.diagnostics()
        }
    };
    for diagnostic in diagnostics.iter().filter(|d| d.file.is_some()) {
        println!("  ⚠️  {diagnostic}");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
