//! Notification entity model.

use std::borrow::Cow;

use notihub_core::types::id::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A notification addressed to one user.
///
/// Known fields are typed; anything else the producer sends is kept in
/// [`Notification::extra`] and can still be filtered, searched and sorted by
/// name through [`Notification::field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Store-assigned sequence number, 0-based and increasing in write order.
    /// Any value supplied by the producer is overwritten on write.
    #[serde(default)]
    pub id: u64,
    /// Owning user.
    pub user_uuid: UserId,
    /// Producer-defined category, e.g. `"new_rank"`.
    pub category: String,
    /// Producer-assigned identity of this notification.
    pub uuid: String,
    /// Short title.
    pub name: String,
    /// Body text.
    pub description: String,
    /// ISO-8601 creation timestamp, kept exactly as received.
    pub created_at: String,
    /// Object the notification refers to.
    #[serde(default)]
    pub object_uuid: String,
    /// Task the notification refers to, if any.
    #[serde(default)]
    pub task_uuid: Option<String>,
    /// Fields outside the known schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notification {
    /// Look up a field by its wire name and render it as text.
    ///
    /// Numbers and booleans in the extra bag are rendered with their JSON
    /// representation. `null`, nested values and absent fields yield `None`.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "user_uuid" => Some(Cow::Owned(self.user_uuid.to_string())),
            "category" => Some(Cow::Borrowed(&self.category)),
            "uuid" => Some(Cow::Borrowed(&self.uuid)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "description" => Some(Cow::Borrowed(&self.description)),
            "created_at" => Some(Cow::Borrowed(&self.created_at)),
            "object_uuid" => Some(Cow::Borrowed(&self.object_uuid)),
            "task_uuid" => self.task_uuid.as_deref().map(Cow::Borrowed),
            other => match self.extra.get(other)? {
                Value::String(s) => Some(Cow::Borrowed(s)),
                Value::Number(n) => Some(Cow::Owned(n.to_string())),
                Value::Bool(b) => Some(Cow::Owned(b.to_string())),
                _ => None,
            },
        }
    }

    /// Identity used to skip re-delivered records.
    pub fn identity(&self) -> (UserId, &str) {
        (self.user_uuid, &self.uuid)
    }
}
