use crate::models::{Message, MessageContent, Role};

pub const COT_SYSTEM_PROMPT: &str = "You are a helpful assistant that uses chain-of-thought reasoning. For each response, first think step-by-step about the problem before providing your final answer. Structure your response with \"Thinking:\" followed by your reasoning process, and then \"Answer:\" followed by your final response.";

/// Appended to an existing plain-text system message.
pub const COT_INSTRUCTIONS: &str = "Use chain-of-thought reasoning. For each response, first think step-by-step about the problem before providing your final answer. Structure your response with \"Thinking:\" followed by your reasoning process, and then \"Answer:\" followed by your final response.";

pub fn merge_directive(existing: &str) -> String {
  format!("{existing} {COT_INSTRUCTIONS}")
}

pub fn inject_directive(mut messages: Vec<Message>) -> Vec<Message> {
  if messages.is_empty() {
    return messages;
  }

  match messages.iter_mut().find(|m| m.role() == Role::System) {
    Some(system) => {
      if let MessageContent::Text(text) = &mut system.content {
        *text = merge_directive(text);
      }
    }
    None => messages.insert(0, Message::system(COT_SYSTEM_PROMPT)),
  }
  messages
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{ContentPart, ImageDetail};

  fn system_count(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.role() == Role::System).count()
  }

  #[test]
  fn merge_appends_after_a_space() {
    assert_eq!(merge_directive("Be concise."), format!("Be concise. {COT_INSTRUCTIONS}"));
    assert_eq!(merge_directive(""), format!(" {COT_INSTRUCTIONS}"));
  }

  #[test]
  fn merge_keeps_existing_text_verbatim() {
    assert_eq!(
      merge_directive("Be concise.\n\n"),
      format!("Be concise.\n\n {COT_INSTRUCTIONS}")
    );
  }

  #[test]
  fn merge_always_appends() {
    let once = merge_directive("Be concise.");
    assert_eq!(merge_directive(&once), format!("{once} {COT_INSTRUCTIONS}"));
  }

  #[test]
  fn existing_system_message_is_extended_in_place() {
    let messages = vec![Message::system("Be concise."), Message::user("hi")];
    let out = inject_directive(messages);

    assert_eq!(out.len(), 2);
    assert_eq!(system_count(&out), 1);
    assert_eq!(out[0].text(), Some(format!("Be concise. {COT_INSTRUCTIONS}").as_str()));
    assert_eq!(out[1], Message::user("hi"));
  }

  #[test]
  fn system_message_position_is_kept() {
    let messages = vec![
      Message::user("first"),
      Message::system("Be concise."),
      Message::assistant("ok"),
    ];
    let out = inject_directive(messages);

    assert_eq!(out.len(), 3);
    assert_eq!(out[0], Message::user("first"));
    assert_eq!(out[1].role(), Role::System);
    assert_eq!(out[2], Message::assistant("ok"));
  }

  #[test]
  fn missing_system_message_is_prepended() {
    let messages = vec![Message::user("hi"), Message::assistant("hello"), Message::user("why?")];
    let out = inject_directive(messages.clone());

    assert_eq!(out.len(), 4);
    assert_eq!(out[0], Message::system(COT_SYSTEM_PROMPT));
    assert_eq!(&out[1..], messages.as_slice());
  }

  #[test]
  fn multimodal_system_content_is_untouched() {
    let parts = vec![
      ContentPart::text("Look at this"),
      ContentPart::image("data:image/png;base64,YWJj", ImageDetail::Auto),
    ];
    let messages = vec![Message::system(parts.clone()), Message::user("hi")];
    let out = inject_directive(messages.clone());

    assert_eq!(out, messages);
    assert_eq!(system_count(&out), 1);
  }

  #[test]
  fn empty_list_stays_empty() {
    assert!(inject_directive(Vec::new()).is_empty());
  }
}
