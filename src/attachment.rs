use std::borrow::Cow;
use std::path::{Path, PathBuf};

use base64::Engine;

use crate::error::{Error, Result};
use crate::models::{ContentPart, ImageDetail};

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Clone, Debug)]
pub struct Attachment {
  name: String,
  mime: String,
  source: Source,
}

#[derive(Clone, Debug)]
enum Source {
  Memory(Vec<u8>),
  File(PathBuf),
}

impl Attachment {
  pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
    Self {
      name: name.into(),
      mime: normalize_mime(mime.into()),
      source: Source::Memory(data.into()),
    }
  }

  pub fn from_path(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();
    let mime = mime_guess::from_path(path)
      .first()
      .map(|m| m.essence_str().to_string())
      .unwrap_or_default();
    Self {
      name,
      mime: normalize_mime(mime),
      source: Source::File(path.to_path_buf()),
    }
  }

  pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
    self.mime = normalize_mime(mime.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn mime(&self) -> &str {
    &self.mime
  }

  pub async fn read(&self) -> Result<Cow<'_, [u8]>> {
    match &self.source {
      Source::Memory(data) => Ok(Cow::Borrowed(data.as_slice())),
      Source::File(path) => tokio::fs::read(path)
        .await
        .map(Cow::Owned)
        .map_err(|source| Error::Read {
          name: self.name.clone(),
          source,
        }),
    }
  }
}

fn normalize_mime(mime: String) -> String {
  if mime.trim().is_empty() {
    FALLBACK_MIME.to_string()
  } else {
    mime
  }
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
  let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
  format!("data:{mime};base64,{encoded}")
}

pub async fn encode(file: &Attachment, detail: ImageDetail) -> Result<ContentPart> {
  let bytes = file.read().await?;
  tracing::debug!(name = %file.name, mime = %file.mime, bytes = bytes.len(), "encoded attachment");
  Ok(ContentPart::image(to_data_url(&file.mime, &bytes), detail))
}
