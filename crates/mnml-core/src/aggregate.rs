//! Consecutive-message aggregation.
//!
//! Messages from the same sender with no other sender in between render as
//! one visual group ("bubble block"). The log itself stays flat; groups are a
//! projection recomputed from it and never stored.
//!
//! ```text
//! log:    a1 a2 b1 a3 a4 a5
//! groups: [a1 a2] [b1] [a3 a4 a5]
//! ```
//!
//! An optional [`GroupingPolicy::max_gap`] additionally splits a same-sender
//! run when two neighbours are further apart than the gap.

use std::time::Duration;

use mnml_proto::ClientId;

use crate::message::Message;

/// Rules for merging a message into the preceding group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingPolicy {
    /// Maximum time between two messages of the same group. `None` merges
    /// any same-sender run regardless of elapsed time.
    pub max_gap: Option<Duration>,
}

impl GroupingPolicy {
    /// Policy that also splits runs separated by more than `gap`.
    pub fn with_max_gap(gap: Duration) -> Self {
        Self { max_gap: Some(gap) }
    }

    fn merges(&self, last: &Message, next: &Message) -> bool {
        if last.sender_id != next.sender_id {
            return false;
        }
        match self.max_gap {
            None => true,
            Some(gap) => next.timestamp.saturating_duration_since(last.timestamp) <= gap,
        }
    }
}

/// A run of consecutive messages from one sender.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageGroup {
    sender_id: ClientId,
    messages: Vec<Message>,
}

impl MessageGroup {
    fn new(first: Message) -> Self {
        Self { sender_id: first.sender_id.clone(), messages: vec![first] }
    }

    /// Author of every message in the group.
    pub fn sender_id(&self) -> &ClientId {
        &self.sender_id
    }

    /// Messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message.
    pub fn last(&self) -> &Message {
        // Groups are constructed with one message and only grow.
        &self.messages[self.messages.len() - 1]
    }

    /// Number of messages in the group. At least one.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Message bodies joined with newlines, for renderers that draw one bubble.
    pub fn text(&self) -> String {
        self.messages.iter().map(|m| m.body.as_str()).collect::<Vec<_>>().join("\n")
    }
}

/// Fold `message` into the grouped log.
///
/// Merges into the last group if its last message has the same sender (and
/// falls within the policy's gap), otherwise starts a new group. Never drops
/// or reorders a message.
#[must_use]
pub fn combine(
    message: Message,
    mut groups: Vec<MessageGroup>,
    policy: GroupingPolicy,
) -> Vec<MessageGroup> {
    match groups.last_mut() {
        Some(last) if policy.merges(last.last(), &message) => last.messages.push(message),
        _ => groups.push(MessageGroup::new(message)),
    }
    groups
}

/// Project a flat log into groups.
pub fn group<I>(messages: I, policy: GroupingPolicy) -> Vec<MessageGroup>
where
    I: IntoIterator<Item = Message>,
{
    messages.into_iter().fold(Vec::new(), |groups, message| combine(message, groups, policy))
}
