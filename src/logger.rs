use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt().with_env_filter(filter);

  let installed = match log_file {
    Some(path) => {
      let file = OpenOptions::new().create(true).append(true).open(path)?;
      builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    }
    None => builder.with_writer(std::io::stderr).try_init(),
  };
  installed.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn appends_to_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thoughtline.log");
    std::fs::write(&path, "earlier line\n").unwrap();

    init(Some(&path)).unwrap();
    tracing::warn!("logger smoke test");

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("earlier line\n"));
    assert!(contents.contains("logger smoke test"));
    assert!(init(None).is_err());
  }
}
