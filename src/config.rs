use std::env;

use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub bind_address: String,
    pub storage_account_name: String,
    pub storage_account_key: String,
    pub input_container: String,
    pub output_container: String,
    pub openai_endpoint: String,
    pub openai_api_key: String,
    pub openai_api_version: String,
    pub openai_gpt_deployment: String,
    pub openai_dalle_deployment: String,
    pub description_max_tokens: u32,
    pub sas_ttl_seconds: u64,
    pub request_timeout_seconds: u64,
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn required(name: &str) -> Result<String> {
    let value = env::var(name).unwrap_or_default();
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("{name} is required"));
    }
    Ok(value)
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            bind_address: env_string("BIND_ADDRESS", "0.0.0.0:8080"),
            storage_account_name: required("STORAGE_ACCOUNT_NAME")?,
            storage_account_key: required("STORAGE_ACCOUNT_KEY")?,
            input_container: env_string("STORAGE_INPUT_CONTAINER", "poc-input-selfi"),
            output_container: env_string("STORAGE_OUTPUT_CONTAINER", "poc-generated-selfi"),
            openai_endpoint: required("OPENAI_ENDPOINT")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_api_version: env_string("OPENAI_API_VERSION", "2024-05-01-preview"),
            openai_gpt_deployment: env_string("OPENAI_GPT_DEPLOYMENT", "gpt-4o"),
            openai_dalle_deployment: env_string("OPENAI_DALLE_DEPLOYMENT", "dall-e-3"),
            description_max_tokens: env_u32("DESCRIPTION_MAX_TOKENS", 300),
            sas_ttl_seconds: env_u64("SAS_TTL_SECONDS", 3600),
            request_timeout_seconds: env_u64("REQUEST_TIMEOUT_SECONDS", 120),
        })
    }
}
