use futures::future::try_join_all;

use crate::attachment::{encode, Attachment};
use crate::error::Result;
use crate::models::{ContentPart, ImageDetail, Message, Role};

pub async fn compose(text: &str, files: &[Attachment], role: Role) -> Result<Message> {
  if files.is_empty() {
    return Ok(Message::new(role, text));
  }

  let images = try_join_all(files.iter().map(|file| encode(file, ImageDetail::Auto))).await?;

  let mut parts = Vec::with_capacity(images.len() + 1);
  parts.push(ContentPart::text(text));
  parts.extend(images);
  Ok(Message::new(role, parts))
}
