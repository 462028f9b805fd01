//! Message entity <-> model mapper

use amity_core::entities::{Message, MessageKind};
use amity_core::value_objects::Snowflake;

use crate::models::MessageModel;

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            match_id: Snowflake::new(model.match_id),
            sender_id: Snowflake::new(model.sender_id),
            content: model.content,
            // Unknown kinds fall back to text rather than failing the row
            kind: MessageKind::parse(&model.kind).unwrap_or_default(),
            created_at: model.created_at,
            read_at: model.read_at,
        }
    }
}
