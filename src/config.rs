use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::{
  ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_UPLOAD_URL,
};

pub const API_KEY_ENV: &str = "API_KEY";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
  pub api_key: String,
  pub base_url: String,
  pub upload_url: String,
  pub default_model: String,
  pub temperature: f64,
  pub max_tokens: u32,
  pub listen_addr: String,
  pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      api_key: String::new(),
      base_url: DEFAULT_BASE_URL.to_string(),
      upload_url: DEFAULT_UPLOAD_URL.to_string(),
      default_model: DEFAULT_MODEL.to_string(),
      temperature: DEFAULT_TEMPERATURE,
      max_tokens: DEFAULT_MAX_TOKENS,
      listen_addr: "127.0.0.1:3000".to_string(),
      log_file: None,
    }
  }
}

impl AppConfig {
  pub fn with_env_overrides(self) -> Self {
    self.with_api_key_from(std::env::var(API_KEY_ENV).ok())
  }

  fn with_api_key_from(mut self, key: Option<String>) -> Self {
    if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
      self.api_key = key;
    }
    self
  }

  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      api_key: self.api_key.clone(),
      base_url: self.base_url.clone(),
      upload_url: self.upload_url.clone(),
      model: self.default_model.clone(),
      temperature: self.temperature,
      max_tokens: self.max_tokens,
    }
  }
}

pub fn load_or_init(path: &Path) -> anyhow::Result<AppConfig> {
  if path.exists() {
    let data = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&data)?;
    Ok(config)
  } else {
    let config = AppConfig::default();
    save_config(path, &config)?;
    Ok(config)
  }
}

pub fn save_config(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(config)?;
  std::fs::write(path, json)?;
  Ok(())
}
