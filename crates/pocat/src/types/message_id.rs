use std::fmt::{Display, Formatter, Result as FmtResult};

use const_fnv1a_hash::fnv1a_hash_str_64;
use serde::{Deserialize, Serialize};

/// Separator gettext places between a message context and its message-id.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// A compact, serializable identifier for a catalog message.
///
/// `MessageId` wraps a 64-bit FNV-1a hash of the message-id, or of
/// `context + U+0004 + message-id` for entries carrying a `msgctxt`. The
/// same key always produces the same hash, so ids can be stored or sent
/// across process boundaries in place of the source string.
///
/// # Example
///
/// ```
/// use pocat::MessageId;
///
/// const INTRO: MessageId = MessageId::from_msgid("Introduction");
///
/// assert_eq!(INTRO, MessageId::new(None, "Introduction"));
/// assert_ne!(INTRO, MessageId::new(Some("heading"), "Introduction"));
/// ```
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// Create a MessageId for a message without context at compile time.
    pub const fn from_msgid(msgid: &str) -> Self {
        Self(fnv1a_hash_str_64(msgid))
    }

    /// Create a MessageId for a message with an optional context.
    pub fn new(context: Option<&str>, msgid: &str) -> Self {
        match context {
            Some(context) => {
                let key = format!("{context}{CONTEXT_SEPARATOR}{msgid}");
                Self(fnv1a_hash_str_64(&key))
            }
            None => Self::from_msgid(msgid),
        }
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "MessageId({:016x})", self.0)
    }
}
