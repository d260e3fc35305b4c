//! `ponyprompt serve` — Start the HTTP API server.

use ponyprompt_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🐴 PonyPrompt Gateway");
    println!("   Listening:  {}:{}", config.gateway.host, config.gateway.port);
    println!("   Corpus:     {}", config.corpus.resolved_root().display());
    println!("   Categories: {}", config.corpus.categories.len());

    ponyprompt_gateway::start(config).await?;

    Ok(())
}
