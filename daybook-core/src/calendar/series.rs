//! Recurring series: events created together by one recurrence request.

use crate::event::EventId;

/// Ordered record ids of one series. Grouping only: the events themselves
/// live in the calendar's main list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Series {
    members: Vec<EventId>,
}

impl Series {
    pub fn new(members: Vec<EventId>) -> Self {
        Series { members }
    }

    pub fn members(&self) -> &[EventId] {
        &self.members
    }

    pub fn position(&self, id: EventId) -> Option<usize> {
        self.members.iter().position(|m| *m == id)
    }

    pub fn remove(&mut self, id: EventId) -> Option<usize> {
        let position = self.position(id)?;
        self.members.remove(position);
        Some(position)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
