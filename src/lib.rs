pub mod attachment;
pub mod client;
pub mod composer;
pub mod config;
pub mod conversation;
pub mod cot;
pub mod error;
pub mod logger;
pub mod models;
pub mod reply;
pub mod router;

pub use attachment::{encode, to_data_url, Attachment};
pub use client::{ClientConfig, CompletionClient, CompletionOptions};
pub use composer::compose;
pub use conversation::{upload_multimedia, Conversation, Entry};
pub use cot::{inject_directive, merge_directive};
pub use error::{Error, Result};
pub use models::{
  ChatRequest, ChatResponse, ContentPart, ImageDetail, ImageUrl, Message, MessageContent, ParsedReply, Role,
};
pub use reply::{split, MarkerParser, ReplyParser};
