//! Request command handler.

use anyhow::anyhow;
use palaver_core::{Role, TurnMessage};
use palaver_models::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParams, ProviderAdapter};
use std::str::FromStr;

/// Handles the request command.
#[tracing::instrument(skip(messages))]
pub fn handle_request_command(
    model_id: &str,
    messages: &[String],
    max_tokens: Option<u32>,
    temperature: Option<f64>,
) -> anyhow::Result<()> {
    let turns = messages
        .iter()
        .map(|raw| parse_turn(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let params = GenerationParams::new(
        max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature.unwrap_or(DEFAULT_TEMPERATURE),
    );

    let adapter = ProviderAdapter::for_model(model_id);
    let body = adapter.build_request(&turns, &params)?;

    println!("family: {}", adapter.family());
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Splits `role:content` at the first `:`.
fn parse_turn(raw: &str) -> anyhow::Result<TurnMessage> {
    let (role, content) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Message '{}' must look like role:content", raw))?;
    let role = Role::from_str(role.trim())
        .map_err(|_| anyhow!("Unknown role '{}'; expected user, assistant or platform", role))?;
    Ok(TurnMessage::new(role, content))
}
