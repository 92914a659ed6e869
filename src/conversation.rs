use serde::Serialize;
use tracing::{error, info};

use crate::attachment::Attachment;
use crate::client::{CompletionClient, CompletionOptions, DEFAULT_UPLOAD_PURPOSE};
use crate::composer::compose;
use crate::error::Result;
use crate::models::{Message, ParsedReply, Role};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Entry {
  pub role: Role,
  pub content: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub thinking: Option<String>,
  pub has_images: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Conversation {
  entries: Vec<Entry>,
  options: CompletionOptions,
}

impl Conversation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_options(options: CompletionOptions) -> Self {
    Self {
      entries: Vec::new(),
      options,
    }
  }

  pub fn entries(&self) -> &[Entry] {
    &self.entries
  }

  pub fn history(&self) -> Vec<Message> {
    self
      .entries
      .iter()
      .map(|entry| Message::new(entry.role, entry.content.as_str()))
      .collect()
  }

  /// Run one turn. History is only extended once the reply has arrived, so a
  /// failed turn leaves it exactly as it was.
  pub async fn submit(
    &mut self,
    client: &CompletionClient,
    text: &str,
    files: &[Attachment],
  ) -> Result<ParsedReply> {
    let message = compose(text, files, Role::User).await?;
    let mut messages = self.history();
    messages.push(message);

    let reply = client.chain_of_thought(&messages, &self.options).await?;
    info!(
      turn = self.entries.len() / 2 + 1,
      images = files.len(),
      has_thinking = !reply.thinking.is_empty(),
      "turn completed"
    );

    self.entries.push(Entry {
      role: Role::User,
      content: text.to_string(),
      thinking: None,
      has_images: !files.is_empty(),
    });
    self.entries.push(Entry {
      role: Role::Assistant,
      content: reply.answer.clone(),
      thinking: (!reply.thinking.is_empty()).then(|| reply.thinking.clone()),
      has_images: false,
    });
    Ok(reply)
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

/// Push attachments to remote file storage. Failures are logged and yield
/// `None`; they never fail the caller.
pub async fn upload_multimedia(client: &CompletionClient, files: &[Attachment]) -> Option<serde_json::Value> {
  match client.upload_files(files, DEFAULT_UPLOAD_PURPOSE).await {
    Ok(body) => Some(body),
    Err(err) => {
      error!(error = %err, files = files.len(), "error uploading files");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::ClientConfig;
  use crate::cot::COT_SYSTEM_PROMPT;
  use crate::error::Error;
  use httpmock::prelude::*;
  use serde_json::json;

  fn client_for(server: &MockServer) -> CompletionClient {
    CompletionClient::new(ClientConfig {
      api_key: "test-key".to_string(),
      base_url: server.base_url(),
      upload_url: server.url("/files"),
      ..ClientConfig::default()
    })
  }

  fn completion(content: &str) -> serde_json::Value {
    json!({
      "choices": [{
        "index": 0,
        "message": { "role": "assistant", "content": content },
        "finish_reason": "stop"
      }]
    })
  }

  #[tokio::test]
  async fn successful_turn_is_appended() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(completion("Thinking: a cat\nAnswer: It is a cat."));
      })
      .await;

    let client = client_for(&server);
    let mut conversation = Conversation::new();
    let image = Attachment::from_bytes("cat.png", "image/png", b"abc".to_vec());
    let reply = conversation
      .submit(&client, "What is this?", &[image])
      .await
      .unwrap();

    assert_eq!(reply.answer, "It is a cat.");
    assert_eq!(
      conversation.entries(),
      &[
        Entry {
          role: Role::User,
          content: "What is this?".to_string(),
          thinking: None,
          has_images: true,
        },
        Entry {
          role: Role::Assistant,
          content: "It is a cat.".to_string(),
          thinking: Some("a cat".to_string()),
          has_images: false,
        },
      ]
    );
  }

  #[tokio::test]
  async fn history_is_replayed_as_text() {
    let server = MockServer::start_async().await;
    let first = server
      .mock_async(|when, then| {
        when.method(POST).path("/chat/completions").json_body(json!({
          "model": "gpt-4o",
          "messages": [
            { "role": "system", "content": COT_SYSTEM_PROMPT },
            { "role": "user", "content": "hi" }
          ],
          "temperature": 0.7,
          "max_tokens": 1000
        }));
        then.status(200).json_body(completion("Answer: hello"));
      })
      .await;

    let client = client_for(&server);
    let mut conversation = Conversation::new();
    conversation.submit(&client, "hi", &[]).await.unwrap();
    first.assert_async().await;

    let second = server
      .mock_async(|when, then| {
        when.method(POST).path("/chat/completions").json_body(json!({
          "model": "gpt-4o",
          "messages": [
            { "role": "system", "content": COT_SYSTEM_PROMPT },
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "hello" },
            { "role": "user", "content": "again" }
          ],
          "temperature": 0.7,
          "max_tokens": 1000
        }));
        then.status(200).json_body(completion("plain reply"));
      })
      .await;

    let reply = conversation.submit(&client, "again", &[]).await.unwrap();
    second.assert_async().await;
    assert_eq!(reply.thinking, "");
    assert_eq!(reply.answer, "plain reply");
    assert_eq!(conversation.entries().len(), 4);
    assert_eq!(conversation.entries()[3].thinking, None);
  }

  #[tokio::test]
  async fn remote_error_leaves_history_untouched() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(500).json_body(json!({ "error": "boom" }));
      })
      .await;

    let client = client_for(&server);
    let mut conversation = Conversation::new();
    let err = conversation.submit(&client, "hi", &[]).await.unwrap_err();

    assert!(matches!(err, Error::Remote { status: 500, .. }));
    assert!(conversation.entries().is_empty());
  }

  #[tokio::test]
  async fn read_error_leaves_history_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let client = CompletionClient::new(ClientConfig::default());
    let mut conversation = Conversation::new();
    let missing = Attachment::from_path(dir.path().join("nope.png"));

    let err = conversation.submit(&client, "hi", &[missing]).await.unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert!(conversation.entries().is_empty());
  }

  #[tokio::test]
  async fn upload_failure_is_swallowed() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path("/files");
        then.status(500);
      })
      .await;

    let client = client_for(&server);
    let files = [Attachment::from_bytes("cat.png", "image/png", b"abc".to_vec())];
    assert_eq!(upload_multimedia(&client, &files).await, None);
  }

  #[tokio::test]
  async fn upload_success_returns_body() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path("/files");
        then.status(200).json_body(json!({ "id": "file-1" }));
      })
      .await;

    let client = client_for(&server);
    let files = [Attachment::from_bytes("cat.png", "image/png", b"abc".to_vec())];
    assert_eq!(upload_multimedia(&client, &files).await, Some(json!({ "id": "file-1" })));
  }
}
