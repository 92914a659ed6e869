use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::attachment::Attachment;
use crate::cot::inject_directive;
use crate::error::{Error, Result};
use crate::models::{ChatRequest, ChatResponse, Message, ParsedReply};
use crate::reply::split;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_UPLOAD_URL: &str = "https://api.openai.com/v1/files";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_UPLOAD_PURPOSE: &str = "vision";

#[derive(Clone, Debug)]
pub struct ClientConfig {
  pub api_key: String,
  pub base_url: String,
  pub upload_url: String,
  pub model: String,
  pub temperature: f64,
  pub max_tokens: u32,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api_key: String::new(),
      base_url: DEFAULT_BASE_URL.to_string(),
      upload_url: DEFAULT_UPLOAD_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
      temperature: DEFAULT_TEMPERATURE,
      max_tokens: DEFAULT_MAX_TOKENS,
    }
  }
}

#[derive(Clone, Debug, Default)]
pub struct CompletionOptions {
  pub model: Option<String>,
  pub temperature: Option<f64>,
  pub max_tokens: Option<u32>,
  pub api_key: Option<String>,
  pub enable_cot: bool,
}

impl CompletionOptions {
  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = Some(model.into());
    self
  }

  pub fn with_temperature(mut self, temperature: f64) -> Self {
    self.temperature = Some(temperature);
    self
  }

  pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = Some(max_tokens);
    self
  }

  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  pub fn with_cot(mut self, enable: bool) -> Self {
    self.enable_cot = enable;
    self
  }
}

#[derive(Clone, Debug)]
pub struct CompletionClient {
  config: ClientConfig,
  http: reqwest::Client,
}

impl CompletionClient {
  pub fn new(config: ClientConfig) -> Self {
    Self {
      config,
      http: reqwest::Client::new(),
    }
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  fn completions_url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }

  fn api_key<'a>(&'a self, options: &'a CompletionOptions) -> &'a str {
    options.api_key.as_deref().unwrap_or(&self.config.api_key)
  }

  pub fn build_request(&self, messages: Vec<Message>, options: &CompletionOptions) -> ChatRequest {
    let messages = if options.enable_cot {
      inject_directive(messages)
    } else {
      messages
    };
    ChatRequest {
      model: options.model.clone().unwrap_or_else(|| self.config.model.clone()),
      messages,
      temperature: options.temperature.unwrap_or(self.config.temperature),
      max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
    }
  }

  pub async fn query(&self, messages: &[Message], options: &CompletionOptions) -> Result<ChatResponse> {
    let request = self.build_request(messages.to_vec(), options);
    debug!(
      model = %request.model,
      messages = request.messages.len(),
      cot = options.enable_cot,
      "sending chat completion"
    );

    let resp = self
      .http
      .post(self.completions_url())
      .bearer_auth(self.api_key(options))
      .json(&request)
      .send()
      .await?;
    read_json(resp).await
  }

  pub async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> Result<String> {
    let response = self.query(messages, options).await?;
    if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
      debug!(finish_reason = reason, "completion finished");
    }
    Ok(response.first_text())
  }

  pub async fn chain_of_thought(&self, messages: &[Message], options: &CompletionOptions) -> Result<ParsedReply> {
    let options = options.clone().with_cot(true);
    let raw = self.complete(messages, &options).await?;
    Ok(split(&raw))
  }

  pub async fn upload_files(&self, files: &[Attachment], purpose: &str) -> Result<serde_json::Value> {
    let mut form = Form::new().text("purpose", purpose.to_string());
    for file in files {
      let bytes = file.read().await?.into_owned();
      let part = Part::bytes(bytes)
        .file_name(file.name().to_string())
        .mime_str(file.mime())?;
      form = form.part("file", part);
    }
    debug!(files = files.len(), url = %self.config.upload_url, "uploading files");

    let resp = self
      .http
      .post(&self.config.upload_url)
      .bearer_auth(&self.config.api_key)
      .multipart(form)
      .send()
      .await?;
    read_json(resp).await
  }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let text = resp.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({}));
    warn!(status = status.as_u16(), "remote request failed");
    return Err(Error::Remote {
      status: status.as_u16(),
      body,
    });
  }
  let text = resp.text().await?;
  Ok(serde_json::from_str(&text)?)
}
