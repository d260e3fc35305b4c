//! `ponyprompt config` — Configuration management commands.

use ponyprompt_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.corpus.categories.is_empty() {
                warnings.push("No categories configured; prompts will only contain user text");
            }

            if !config.corpus.resolved_root().is_dir() {
                warnings.push("Corpus root does not exist (run `ponyprompt init`)");
            }

            if config.compose.command_token.trim().is_empty() {
                warnings.push("command_token is empty; prompts will not be prefixed");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Corpus:     {}", config.corpus.resolved_root().display());
            println!("   Categories: {}", config.corpus.categories.len());
            println!("   Selection:  {:?}", config.sampling.selection);
            println!("   Empty:      {:?}", config.compose.empty_prompt);
            println!(
                "   Gateway:    {}:{}",
                config.gateway.host, config.gateway.port
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn config_path_is_valid() {
        let path = ponyprompt_config::AppConfig::config_path();
        assert!(path.to_str().unwrap().contains("config.toml"));
        assert!(path.to_str().unwrap().contains(".ponyprompt"));
    }
}
