// ABOUTME: Transaction guard making a group of conversation appends atomic.
// ABOUTME: Uncommitted changes roll back on drop, including on cancellation.

use std::ops::{Deref, DerefMut};

use super::history::Conversation;
use super::turn::Turn;

/// Scoped mutation of a [`Conversation`].
///
/// Derefs to the conversation. Unless [`Transaction::commit`] is called, every
/// turn appended through the guard is removed and the system message restored
/// when the guard is dropped. Dropping a step future mid-flight therefore
/// leaves the conversation as it was when the transaction began.
pub struct Transaction<'a> {
    conversation: &'a mut Conversation,
    mark: usize,
    saved_system: Option<Turn>,
    committed: bool,
}

impl<'a> Transaction<'a> {
    pub(super) fn new(conversation: &'a mut Conversation) -> Self {
        let mark = conversation.turns.len();
        let saved_system = conversation.system.clone();
        Self {
            conversation,
            mark,
            saved_system,
            committed: false,
        }
    }

    /// Turns appended since the transaction began.
    pub fn appended(&self) -> &[Turn] {
        &self.conversation.turns[self.mark..]
    }

    /// Keep every change made through this guard.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for Transaction<'_> {
    type Target = Conversation;

    fn deref(&self) -> &Conversation {
        self.conversation
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Conversation {
        self.conversation
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let discarded = self.conversation.turns.len().saturating_sub(self.mark);
        if discarded > 0 {
            tracing::debug!(discarded, "rolling back conversation turns");
        }
        self.conversation.turns.truncate(self.mark);
        self.conversation.system = self.saved_system.take();
    }
}

impl Conversation {
    /// Begin a scoped group of appends. See [`Transaction`].
    pub fn transaction(&mut self) -> Transaction<'_> {
        Transaction::new(self)
    }
}
