//! The event store.
//!
//! A [`Calendar`] is the only way events enter or leave the store. Every
//! mutation is staged on a working copy of the event list, checked for
//! duplicates and interval conflicts, and only then swapped in, so no caller
//! (and no listener) ever sees a store that breaks either invariant.

mod series;

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, EventBuilder, EventId, Visibility};
use crate::listener::{CalendarListener, Listeners};
use crate::recurrence::RecurrenceRequest;
use series::Series;

pub struct Calendar {
    title: String,
    default_visibility: Visibility,
    events: Vec<Event>,
    series: Vec<Series>,
    listeners: Listeners,
}

impl Calendar {
    pub fn new(title: impl Into<String>) -> DaybookResult<Self> {
        Self::with_default_visibility(title, Visibility::default())
    }

    pub fn with_default_visibility(
        title: impl Into<String>,
        default_visibility: Visibility,
    ) -> DaybookResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DaybookError::BlankTitle);
        }

        Ok(Calendar {
            title,
            default_visibility,
            events: Vec::new(),
            series: Vec::new(),
            listeners: Listeners::default(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> DaybookResult<()> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DaybookError::BlankTitle);
        }
        self.title = title;
        Ok(())
    }

    pub fn default_visibility(&self) -> Visibility {
        self.default_visibility
    }

    pub fn set_default_visibility(&mut self, visibility: Visibility) {
        self.default_visibility = visibility;
    }

    /// Start building an event that carries this calendar's default visibility.
    pub fn event_builder(&self, subject: impl Into<String>, start_date: NaiveDate) -> EventBuilder {
        Event::builder(subject, start_date).visibility(self.default_visibility)
    }

    // LISTENERS:

    pub fn add_listener(&self, listener: Arc<dyn CalendarListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn CalendarListener>) {
        self.listeners.remove(listener);
    }

    // MUTATIONS:

    pub fn add_event(&mut self, event: Event) -> DaybookResult<()> {
        let mut draft = self.events.clone();
        draft.push(event);
        check_member(&draft, draft.len() - 1)?;

        self.events = draft;
        if let Some(added) = self.events.last() {
            tracing::debug!(calendar = %self.title, "Added {}", added.key());
            self.listeners.announce_added(added);
        }
        Ok(())
    }

    /// Generate a recurring series and add all of it, or none of it.
    ///
    /// Returns the added occurrences in date order.
    pub fn add_recurring_event(&mut self, request: &RecurrenceRequest) -> DaybookResult<Vec<Event>> {
        let occurrences = request.expand(self.default_visibility)?;

        let mut draft = self.events.clone();
        for occurrence in &occurrences {
            draft.push(occurrence.clone());
            check_member(&draft, draft.len() - 1)?;
        }

        self.events = draft;
        self.series
            .push(Series::new(occurrences.iter().map(Event::id).collect()));

        tracing::debug!(
            calendar = %self.title,
            "Added {} occurrences of '{}'",
            occurrences.len(),
            request.subject
        );
        for occurrence in &occurrences {
            self.listeners.announce_added(occurrence);
        }

        Ok(occurrences)
    }

    /// Remove the member equal to `event` (by identity key), and drop it from
    /// its series if it has one. Listeners are not notified.
    pub fn remove_event(&mut self, event: &Event) -> DaybookResult<Event> {
        let index = self.index_of(event).ok_or(DaybookError::NotInCalendar)?;

        let removed = self.events.remove(index);
        self.detach_from_series(removed.id());

        tracing::debug!(calendar = %self.title, "Removed {}", removed.key());
        Ok(removed)
    }

    /// Replace `old` with `new`. The replacement does not inherit any series
    /// membership of `old`.
    pub fn update_event(&mut self, old: &Event, new: Event) -> DaybookResult<()> {
        let index = self.index_of(old).ok_or(DaybookError::NotInCalendar)?;

        let mut draft = self.events.clone();
        let previous = draft.remove(index);
        draft.push(new);
        check_member(&draft, draft.len() - 1)?;

        self.events = draft;
        self.detach_from_series(previous.id());

        if let Some(updated) = self.events.last() {
            tracing::debug!(calendar = %self.title, "Updated {} -> {}", previous.key(), updated.key());
            self.listeners.announce_modified(updated);
        }
        Ok(())
    }

    /// Store an edited copy of a series member and detach it from its series.
    ///
    /// `event` must carry the id of an event that currently belongs to a
    /// series (i.e. it was obtained from this calendar and then edited
    /// through its setters). If the edited event would duplicate or conflict
    /// with another event, nothing changes: the stored event and its series
    /// membership stay as they were.
    pub fn modify_recurring_event_instance(&mut self, event: Event) -> DaybookResult<()> {
        let series_index = self
            .series
            .iter()
            .position(|s| s.position(event.id()).is_some())
            .ok_or(DaybookError::NotRecurring)?;
        let index = self
            .events
            .iter()
            .position(|e| e.id() == event.id())
            .ok_or(DaybookError::NotInCalendar)?;

        let mut draft = self.events.clone();
        draft[index] = event;
        check_member(&draft, index)?;

        self.events = draft;
        let modified = &self.events[index];
        self.series[series_index].remove(modified.id());
        self.series.retain(|s| !s.is_empty());

        tracing::debug!(calendar = %self.title, "Modified series instance {}", modified.key());
        self.listeners.announce_modified(modified);
        Ok(())
    }

    /// Append without duplicate or conflict checks. Used by import, which
    /// trusts its source to be consistent.
    pub(crate) fn append_unchecked(&mut self, event: Event) {
        self.events.push(event);
        if let Some(added) = self.events.last() {
            self.listeners.announce_added(added);
        }
    }

    // QUERIES:
    // Everything returned is a copy; changing it never touches the calendar.

    pub fn events(&self) -> Vec<Event> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Look up an event by its identity key.
    pub fn get_event(
        &self,
        subject: &str,
        start_date: NaiveDate,
        start_time: Option<NaiveTime>,
    ) -> Option<Event> {
        self.events
            .iter()
            .find(|e| {
                e.subject() == subject && e.start_date() == start_date && e.start_time() == start_time
            })
            .cloned()
    }

    /// Look up the current version of a record.
    pub fn event(&self, id: EventId) -> Option<Event> {
        self.events.iter().find(|e| e.id() == id).cloned()
    }

    /// Events whose start..=end dates include `date`, whatever their times.
    pub fn events_on_date(&self, date: NaiveDate) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.occurs_on(date))
            .cloned()
            .collect()
    }

    /// Events whose dates touch the inclusive range `[from, to]`.
    pub fn events_in_range(&self, from: NaiveDate, to: NaiveDate) -> DaybookResult<Vec<Event>> {
        if from > to {
            return Err(DaybookError::InvalidRange(format!(
                "start date {} is after end date {}",
                from, to
            )));
        }

        Ok(self
            .events
            .iter()
            .filter(|e| e.overlaps_dates(from, to))
            .cloned()
            .collect())
    }

    /// Whether any event's `[start, end)` interval contains the given instant.
    pub fn is_busy(&self, date: NaiveDate, time: NaiveTime) -> bool {
        let at = date.and_time(time);
        self.events.iter().any(|e| e.contains(at))
    }

    // SERIES:
    // Series are found by record id, so an equal-by-key event built elsewhere
    // is not considered part of a series.

    pub fn is_recurring(&self, event: &Event) -> bool {
        self.find_series(event).is_some()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Every event of the series containing `event`, in series order.
    pub fn get_recurring_events_all(&self, event: &Event) -> DaybookResult<Vec<Event>> {
        let series = self.find_series(event).ok_or(DaybookError::NotRecurring)?;
        Ok(self.resolve(series))
    }

    /// Events of the series containing `event` that start on or after `from`.
    pub fn get_recurring_events_from_date(
        &self,
        event: &Event,
        from: NaiveDate,
    ) -> DaybookResult<Vec<Event>> {
        let series = self.find_series(event).ok_or(DaybookError::NotRecurring)?;
        Ok(self
            .resolve(series)
            .into_iter()
            .filter(|e| e.start_date() >= from)
            .collect())
    }

    fn find_series(&self, event: &Event) -> Option<&Series> {
        self.series
            .iter()
            .find(|s| s.position(event.id()).is_some())
    }

    fn resolve(&self, series: &Series) -> Vec<Event> {
        series
            .members()
            .iter()
            .filter_map(|id| self.events.iter().find(|e| e.id() == *id))
            .cloned()
            .collect()
    }

    fn index_of(&self, event: &Event) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }

    fn detach_from_series(&mut self, id: EventId) {
        for series in &mut self.series {
            series.remove(id);
        }
        self.series.retain(|s| !s.is_empty());
    }
}

/// Check `events[index]` against every other event in the list: first for a
/// duplicate identity key (or the same record twice), then for an interval
/// conflict.
fn check_member(events: &[Event], index: usize) -> DaybookResult<()> {
    let candidate = &events[index];

    if others(events, index).any(|e| e == candidate || e.id() == candidate.id()) {
        return Err(DaybookError::Duplicate(candidate.key().to_string()));
    }

    if let Some(existing) = others(events, index).find(|e| e.conflicts_with(candidate)) {
        return Err(DaybookError::Conflict(existing.key().to_string()));
    }

    Ok(())
}

fn others(events: &[Event], index: usize) -> impl Iterator<Item = &Event> {
    events
        .iter()
        .enumerate()
        .filter(move |(i, _)| *i != index)
        .map(|(_, e)| e)
}

impl PartialEq for Calendar {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl fmt::Debug for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Calendar")
            .field("title", &self.title)
            .field("default_visibility", &self.default_visibility)
            .field("events", &self.events)
            .field("series", &self.series)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
