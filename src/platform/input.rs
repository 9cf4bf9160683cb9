//! Input events and the bounded queue carrying them from platform to core

use std::collections::VecDeque;

use log::warn;

use crate::consts::EVENT_QUEUE_CAPACITY;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Left,
    Right,
    Down,
    Up,
    /// Shift: twin shot
    Fire,
    Escape,
    /// Anything else the platform reports
    Other,
}

/// A platform input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Window closed
    Quit,
    Key { code: KeyCode, pressed: bool },
}

impl Event {
    pub fn press(code: KeyCode) -> Self {
        Event::Key {
            code,
            pressed: true,
        }
    }

    pub fn release(code: KeyCode) -> Self {
        Event::Key {
            code,
            pressed: false,
        }
    }
}

/// Bounded FIFO of pending events.
///
/// The tick drains it every frame. When it is full, new events are dropped
/// and counted rather than overwriting unread ones.
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: VecDeque<Event>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(EVENT_QUEUE_CAPACITY)
    }
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Enqueue an event; returns false if it was dropped
    pub fn push(&mut self, event: Event) -> bool {
        if self.events.len() >= self.capacity {
            self.dropped += 1;
            warn!("event queue full, dropping {:?}", event);
            return false;
        }
        self.events.push_back(event);
        true
    }

    /// Next pending event, oldest first
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to overflow since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
