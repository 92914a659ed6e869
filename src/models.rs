use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
  Function,
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Role::System => "system",
      Role::User => "user",
      Role::Assistant => "assistant",
      Role::Function => "function",
    };
    f.write_str(name)
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
  role: Role,
  pub content: MessageContent,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

impl Message {
  pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
    Self {
      role,
      content: content.into(),
      name: None,
    }
  }

  pub fn system(content: impl Into<MessageContent>) -> Self {
    Self::new(Role::System, content)
  }

  pub fn user(content: impl Into<MessageContent>) -> Self {
    Self::new(Role::User, content)
  }

  pub fn assistant(content: impl Into<MessageContent>) -> Self {
    Self::new(Role::Assistant, content)
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn role(&self) -> Role {
    self.role
  }

  pub fn text(&self) -> Option<&str> {
    match &self.content {
      MessageContent::Text(text) => Some(text),
      MessageContent::Parts(_) => None,
    }
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
  Text(String),
  Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
  fn from(text: String) -> Self {
    MessageContent::Text(text)
  }
}

impl From<&str> for MessageContent {
  fn from(text: &str) -> Self {
    MessageContent::Text(text.to_string())
  }
}

impl From<Vec<ContentPart>> for MessageContent {
  fn from(parts: Vec<ContentPart>) -> Self {
    MessageContent::Parts(parts)
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
  Text { text: String },
  ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
  pub fn text(text: impl Into<String>) -> Self {
    ContentPart::Text { text: text.into() }
  }

  pub fn image(url: impl Into<String>, detail: ImageDetail) -> Self {
    ContentPart::ImageUrl {
      image_url: ImageUrl {
        url: url.into(),
        detail,
      },
    }
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImageUrl {
  pub url: String,
  #[serde(default)]
  pub detail: ImageDetail,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
  Low,
  High,
  #[default]
  Auto,
}

impl FromStr for ImageDetail {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "low" => Ok(ImageDetail::Low),
      "high" => Ok(ImageDetail::High),
      "auto" => Ok(ImageDetail::Auto),
      other => Err(format!("unknown image detail level: {other}")),
    }
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatRequest {
  pub model: String,
  pub messages: Vec<Message>,
  pub temperature: f64,
  pub max_tokens: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ChatResponse {
  pub id: String,
  pub object: String,
  pub created: u64,
  pub model: String,
  pub choices: Vec<Choice>,
  pub usage: Option<Usage>,
}

impl ChatResponse {
  pub fn first_text(&self) -> String {
    self
      .choices
      .first()
      .and_then(|choice| choice.message.content.clone())
      .unwrap_or_default()
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Choice {
  pub index: u32,
  pub message: ResponseMessage,
  pub finish_reason: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ResponseMessage {
  pub role: Option<String>,
  pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Usage {
  pub prompt_tokens: u32,
  pub completion_tokens: u32,
  pub total_tokens: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedReply {
  pub thinking: String,
  pub answer: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatTurnRequest {
  pub messages: Vec<Message>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadedFileInfo {
  pub name: String,
  #[serde(rename = "type")]
  pub mime: String,
  pub size: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UploadResponse {
  pub message: String,
  pub files: Vec<UploadedFileInfo>,
}
