//! `ponyprompt init` — First-time setup.
//!
//! Creates the config file and one empty directory per category. Corpus
//! text itself is never written; drop your `.txt` files into the category
//! directories afterwards.

use ponyprompt_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🐴 PonyPrompt — First-Time Setup");
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    // Respect an existing config's corpus layout.
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let root = config.corpus.resolved_root();
    for category in &config.corpus.categories {
        let dir = category.dir(&root);
        if dir.exists() {
            println!("  Category directory exists: {}", dir.display());
        } else {
            std::fs::create_dir_all(&dir)?;
            println!("✅ Created {} → {}", category.name, dir.display());
        }
    }

    println!("\n📝 Next steps:");
    println!("   1. Add text files with `label = fragment` lines to each category directory");
    println!("   2. Run: ponyprompt generate --text \"a girl\"");
    println!("   3. Run: ponyprompt serve\n");

    Ok(())
}
