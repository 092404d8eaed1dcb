//! Session and message shapes read from persisted chat storage
//!
//! Values under a `chat_<id>` key are JSON arrays of message objects as
//! written by a browser chat client. Only the fields the catalog needs are
//! modelled; anything else on the wire is ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt
    System,
    /// End user
    User,
    /// Model reply
    Assistant,
    /// Legacy function-call result
    Function,
    /// Out-of-band data message
    Data,
    /// Tool result
    Tool,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
            Role::Data => "data",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `createdAt` value as persisted
///
/// Browser clients serialize a `Date` as an ISO-8601 string; some write the
/// epoch-milliseconds number instead. Both are kept verbatim so that a
/// present-but-unparsable value can be told apart from a missing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    /// Textual timestamp (RFC 3339 and a few ISO-8601 variants)
    Text(String),
    /// Milliseconds since the Unix epoch
    Millis(f64),
}

impl CreatedAt {
    /// Whether the value counts as a timestamp at all.
    ///
    /// An empty string and `0` are treated as missing, matching the
    /// truthiness check of the client that writes these records.
    pub fn is_set(&self) -> bool {
        match self {
            CreatedAt::Text(s) => !s.is_empty(),
            CreatedAt::Millis(ms) => *ms != 0.0,
        }
    }

    /// Parse into a UTC instant, `None` when the value is not a valid time.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdex::catalog::CreatedAt;
    ///
    /// let ts = CreatedAt::Text("2024-05-01T10:00:00.000Z".to_string());
    /// assert!(ts.to_utc().is_some());
    ///
    /// let bad = CreatedAt::Text("yesterday-ish".to_string());
    /// assert!(bad.to_utc().is_none());
    /// ```
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            CreatedAt::Text(s) => parse_timestamp(s),
            CreatedAt::Millis(ms) => {
                if !ms.is_finite() {
                    return None;
                }
                DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64)
            }
        }
    }
}

impl From<DateTime<Utc>> for CreatedAt {
    fn from(value: DateTime<Utc>) -> Self {
        CreatedAt::Text(value.to_rfc3339())
    }
}

/// Parse a textual timestamp.
///
/// Seconds may be omitted. Offset-less date-times and bare dates are read
/// as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A single persisted chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Optional client-side message id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Author role
    pub role: Role,
    /// Message text; `null` and a missing field both read as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Creation time; only required on a session's first message
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<CreatedAt>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Message {
    /// Creates a message without a timestamp
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdex::catalog::{Message, Role};
    ///
    /// let msg = Message::new(Role::User, "hello");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(!msg.has_timestamp());
    /// ```
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            created_at: None,
        }
    }

    /// Creates a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach a creation time
    pub fn with_created_at(mut self, created_at: impl Into<CreatedAt>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Whether a creation time is present (it may still be unparsable)
    pub fn has_timestamp(&self) -> bool {
        self.created_at.as_ref().is_some_and(CreatedAt::is_set)
    }

    /// Parsed creation time
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_ref()
            .filter(|c| c.is_set())
            .and_then(CreatedAt::to_utc)
    }
}

/// Options for deriving a display title from a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleOptions {
    /// Maximum characters taken from the first user message
    pub max_chars: usize,
    /// Marker appended when the message was cut
    pub ellipsis: String,
    /// Prefix of fallback titles, followed by a short id
    pub untitled_label: String,
    /// Title used when there is neither a user message nor an id
    pub new_chat_label: String,
    /// Storage key prefix stripped from ids in fallback titles
    pub key_prefix: String,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            max_chars: 30,
            ellipsis: "...".to_string(),
            untitled_label: "Chat".to_string(),
            new_chat_label: "New chat".to_string(),
            key_prefix: crate::catalog::DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// One persisted conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Storage key, prefix included
    pub id: String,
    /// Messages in conversation order
    pub messages: Vec<Message>,
}

impl Session {
    /// Creates a session
    pub fn new(id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            messages,
        }
    }

    /// Parsed creation time of the first message
    pub fn leading_timestamp(&self) -> Option<DateTime<Utc>> {
        self.messages.first().and_then(Message::timestamp)
    }

    /// Id with the storage prefix removed
    pub fn short_id<'a>(&'a self, key_prefix: &str) -> &'a str {
        self.id.strip_prefix(key_prefix).unwrap_or(&self.id)
    }

    /// Display title: the first user message, truncated.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdex::catalog::{Message, Session, TitleOptions};
    ///
    /// let opts = TitleOptions::default();
    ///
    /// let session = Session::new("chat_1", vec![Message::user("short question")]);
    /// assert_eq!(session.title(&opts), "short question");
    ///
    /// let long = Session::new("chat_2", vec![Message::user("a".repeat(40))]);
    /// assert_eq!(long.title(&opts), format!("{}...", "a".repeat(30)));
    ///
    /// let none = Session::new("chat_0123456789", vec![Message::assistant("hi")]);
    /// assert_eq!(none.title(&opts), "Chat 01234567");
    /// ```
    pub fn title(&self, opts: &TitleOptions) -> String {
        if let Some(first_user) = self.messages.iter().find(|m| m.role == Role::User) {
            let content = first_user.content.as_str();
            return match content.char_indices().nth(opts.max_chars) {
                Some((cut, _)) => format!("{}{}", &content[..cut], opts.ellipsis),
                None => content.to_string(),
            };
        }

        let short: String = self.short_id(&opts.key_prefix).chars().take(8).collect();
        if short.is_empty() {
            opts.new_chat_label.clone()
        } else {
            format!("{} {}", opts.untitled_label, short)
        }
    }
}
