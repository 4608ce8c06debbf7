// src/tasks/queue.rs

//! # Action Queue
//!
//! FIFO of scripted actions shared between the request path, which only
//! pushes, and the arbiter, which only pops. Both sides take the same lock.

use crate::tasks::ScriptedAction;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Thread-safe FIFO of scripted actions.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: Mutex<VecDeque<ScriptedAction>>,
}

impl ActionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action and returns the queue length after the push.
    pub fn push(&self, action: ScriptedAction) -> usize {
        let mut actions = self.actions.lock();
        actions.push_back(action);
        actions.len()
    }

    /// Removes the oldest action.
    pub fn pop(&self) -> Option<ScriptedAction> {
        self.actions.lock().pop_front()
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.actions.lock().len()
    }

    /// Whether no action is queued.
    pub fn is_empty(&self) -> bool {
        self.actions.lock().is_empty()
    }

    /// Drops every queued action and returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut actions = self.actions.lock();
        let dropped = actions.len();
        actions.clear();
        dropped
    }
}
