//! Event bus for broadcasting course events

use crate::event::CourseEvent;

/// A simple event queue that systems push to and the host drains
pub struct EventBus {
    events: Vec<CourseEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: CourseEvent) {
        self.events.push(event);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<CourseEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending events without consuming them
    pub fn pending(&self) -> &[CourseEvent] {
        &self.events
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
