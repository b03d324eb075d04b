//! List models command handler

use crate::clients::OllamaClient;
use crate::config::Config;
use crate::state::{HTTP_TIMEOUT_SECONDS, build_shared_http_client};

pub async fn cmd_list_models(config: &Config) -> anyhow::Result<()> {
    let client = OllamaClient::with_shared_client(
        build_shared_http_client(HTTP_TIMEOUT_SECONDS)?,
        &config.ollama.base_url,
        &config.ollama.model,
    );

    let models = client.list_models().await?;

    if models.is_empty() {
        println!("No models installed on {}", client.base_url());
        println!();
        println!("Pull one with: ollama pull {}", client.model());
        return Ok(());
    }

    println!("Models on {} ({} total)", client.base_url(), models.len());
    println!("{:-<60}", "");

    for model in &models {
        let marker = if model == client.model() || model.starts_with(&format!("{}:", client.model()))
        {
            "*"
        } else {
            " "
        };
        println!("{marker} {model}");
    }

    println!();
    println!("* = configured model ({})", client.model());

    Ok(())
}
