use crate::models::ParsedReply;

const THINKING: &str = "Thinking:";
const ANSWER: &str = "Answer:";

/// Turns a raw completion into a [`ParsedReply`]. Implementations must be
/// total: every input yields a reply.
pub trait ReplyParser {
  fn parse(&self, raw: &str) -> ParsedReply;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerParser;

impl ReplyParser for MarkerParser {
  fn parse(&self, raw: &str) -> ParsedReply {
    split(raw)
  }
}

/// Split on the first `Answer:` marker, matched case-insensitively.
///
/// Text before it is the reasoning, minus a `Thinking:` marker at its very
/// start. With no `Answer:` marker, everything after the first `Thinking:` is
/// reasoning and the answer is empty. With neither marker the raw text is
/// returned verbatim as the answer.
pub fn split(raw: &str) -> ParsedReply {
  if let Some(at) = find_ignore_ascii_case(raw, ANSWER) {
    let head = &raw[..at];
    let head = strip_prefix_ignore_ascii_case(head, THINKING).unwrap_or(head);
    return ParsedReply {
      thinking: head.trim().to_string(),
      answer: raw[at + ANSWER.len()..].trim().to_string(),
    };
  }

  if let Some(at) = find_ignore_ascii_case(raw, THINKING) {
    return ParsedReply {
      thinking: raw[at + THINKING.len()..].trim().to_string(),
      answer: String::new(),
    };
  }

  ParsedReply {
    thinking: String::new(),
    answer: raw.to_string(),
  }
}

// Markers are ASCII, so a match always starts and ends on a char boundary.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
  haystack
    .as_bytes()
    .windows(needle.len())
    .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

fn strip_prefix_ignore_ascii_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
  let head = s.get(..prefix.len())?;
  if head.eq_ignore_ascii_case(prefix) {
    s.get(prefix.len()..)
  } else {
    None
  }
}
