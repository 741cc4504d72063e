use crate::types::DisplayMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presentation seam driven by the orchestrator.
pub trait Renderer: Send {
    /// Draw the user's own message.
    fn append_user(&mut self, text: &str);

    /// Draw a bot reply.
    fn append(&mut self, message: DisplayMessage);

    /// Show the loading placeholder and return its id. If one is already
    /// showing, its id is returned and nothing new is drawn.
    fn show_pending(&mut self) -> String;

    /// Remove the loading placeholder. Returns `false` if none was showing.
    fn clear_pending(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryBody {
    Text { text: String },
    Message { message: DisplayMessage },
    Pending,
}

/// One rendered item of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub author: Author,
    pub body: EntryBody,
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    fn new(author: Author, body: EntryBody) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author,
            body,
            timestamp: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.body, EntryBody::Pending)
    }

    /// The bot reply carried by this entry, if any.
    pub fn message(&self) -> Option<&DisplayMessage> {
        match &self.body {
            EntryBody::Message { message } => Some(message),
            _ => None,
        }
    }
}

/// Append-only record of a chat. Only the loading placeholder is ever
/// removed, and at most one exists at a time.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    pending: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn pending_id(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// All bot replies in order.
    pub fn bot_messages(&self) -> impl Iterator<Item = &DisplayMessage> {
        self.entries.iter().filter_map(Entry::message)
    }
}

impl Renderer for Transcript {
    fn append_user(&mut self, text: &str) {
        self.entries.push(Entry::new(
            Author::User,
            EntryBody::Text {
                text: text.to_string(),
            },
        ));
    }

    fn append(&mut self, message: DisplayMessage) {
        self.entries
            .push(Entry::new(Author::Bot, EntryBody::Message { message }));
    }

    fn show_pending(&mut self) -> String {
        if let Some(id) = &self.pending {
            return id.clone();
        }
        let entry = Entry::new(Author::Bot, EntryBody::Pending);
        let id = entry.id.clone();
        self.entries.push(entry);
        self.pending = Some(id.clone());
        id
    }

    fn clear_pending(&mut self) -> bool {
        let Some(id) = self.pending.take() else {
            return false;
        };
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut t = Transcript::new();
        t.append_user("hi");
        t.append(DisplayMessage::text("hello"));
        assert_eq!(t.len(), 2);
        assert_eq!(t.entries()[0].author, Author::User);
        assert_eq!(t.entries()[1].author, Author::Bot);
        assert_eq!(t.bot_messages().count(), 1);
    }

    #[test]
    fn test_pending_is_unique_and_cleared_once() {
        let mut t = Transcript::new();
        t.append_user("weather in Tokyo");
        let first = t.show_pending();
        let second = t.show_pending();
        assert_eq!(first, second);
        assert_eq!(t.entries().iter().filter(|e| e.is_pending()).count(), 1);
        assert_eq!(t.pending_id(), Some(first.as_str()));

        assert!(t.clear_pending());
        assert!(!t.clear_pending());
        assert_eq!(t.len(), 1);
        assert!(t.pending_id().is_none());
    }

    #[test]
    fn test_clear_pending_leaves_later_entries() {
        let mut t = Transcript::new();
        t.show_pending();
        t.append(DisplayMessage::text("done"));
        assert!(t.clear_pending());
        assert_eq!(t.len(), 1);
        assert_eq!(
            t.last().and_then(Entry::message).and_then(|m| m.text.as_deref()),
            Some("done")
        );
    }

    #[test]
    fn test_entry_serializes_with_kind_tag() {
        let mut t = Transcript::new();
        t.append_user("hi");
        let json = serde_json::to_value(&t.entries()[0]).unwrap();
        assert_eq!(json["author"], "user");
        assert_eq!(json["body"]["kind"], "text");
        assert_eq!(json["body"]["text"], "hi");
    }
}
