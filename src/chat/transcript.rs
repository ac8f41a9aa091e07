use std::collections::VecDeque;

use crate::api::ChatTurn;

/// Maximum number of turns kept in a conversation.
pub const MAX_TURNS: usize = 20;

/// Ordered, bounded conversation history.
///
/// Insertion order is the request payload order. Pushing never evicts;
/// the owner trims with [`truncate_to_recent`](Self::truncate_to_recent)
/// once an exchange is complete.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: VecDeque<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
    }

    /// Drops the oldest turns until at most `max` remain.
    pub(crate) fn truncate_to_recent(&mut self, max: usize) {
        let excess = self.turns.len().saturating_sub(max);
        self.turns.drain(..excess);
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.back()
    }

    /// Copies the turns out in order, ready for a request body.
    pub fn to_messages(&self) -> Vec<ChatTurn> {
        self.turns.iter().cloned().collect()
    }
}
