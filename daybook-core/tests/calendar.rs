use std::io::Cursor;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime, Weekday};
use daybook_core::daybook::{find_calendar, restore_all, save_calendar};
use daybook_core::{
    Calendar, CalendarListener, DaybookError, Event, ListenerResult, RecurrenceRequest, Visibility,
};

#[derive(Default)]
struct Recorder {
    added: Mutex<Vec<Event>>,
    modified: Mutex<Vec<Event>>,
}

impl Recorder {
    fn added(&self) -> usize {
        self.added.lock().unwrap().len()
    }

    fn modified(&self) -> usize {
        self.modified.lock().unwrap().len()
    }
}

impl CalendarListener for Recorder {
    fn on_event_added(&self, event: &Event) -> ListenerResult {
        self.added.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn on_event_modified(&self, event: &Event) -> ListenerResult {
        self.modified.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct Exploding;

impl CalendarListener for Exploding {
    fn on_event_added(&self, _event: &Event) -> ListenerResult {
        Err("listener failure".into())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn timed(subject: &str, day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Event {
    Event::builder(subject, day)
        .end_date(day)
        .start_time(start)
        .end_time(end)
        .build()
        .unwrap()
}

fn calendar_with_recorder() -> (Calendar, Arc<Recorder>) {
    let calendar = Calendar::new("Work").unwrap();
    let recorder = Arc::new(Recorder::default());
    calendar.add_listener(recorder.clone());
    (calendar, recorder)
}

#[test]
fn add_event_stores_it_and_notifies_once() {
    let (mut calendar, recorder) = calendar_with_recorder();
    let event = Event::builder("Holiday", date(2025, 12, 25)).build().unwrap();

    calendar.add_event(event.clone()).unwrap();

    assert_eq!(calendar.events(), vec![event]);
    assert_eq!(recorder.added(), 1);
    assert_eq!(recorder.modified(), 0);
}

#[test]
fn duplicate_is_rejected_and_store_unchanged() {
    let (mut calendar, recorder) = calendar_with_recorder();
    calendar
        .add_event(timed("Sync", date(2025, 1, 1), hm(9, 0), hm(10, 0)))
        .unwrap();

    // Same identity key, different end time and description.
    let duplicate = Event::builder("Sync", date(2025, 1, 1))
        .end_date(date(2025, 1, 1))
        .start_time(hm(9, 0))
        .end_time(hm(9, 30))
        .description("again")
        .build()
        .unwrap();

    assert!(matches!(
        calendar.add_event(duplicate),
        Err(DaybookError::Duplicate(_))
    ));
    assert_eq!(calendar.len(), 1);
    assert_eq!(recorder.added(), 1);
}

#[test]
fn overlapping_event_is_rejected_without_notification() {
    let (mut calendar, recorder) = calendar_with_recorder();
    calendar
        .add_event(timed("Design review", date(2025, 1, 1), hm(10, 0), hm(11, 0)))
        .unwrap();

    let result = calendar.add_event(timed("1:1", date(2025, 1, 1), hm(10, 30), hm(11, 30)));

    assert!(matches!(result, Err(DaybookError::Conflict(_))));
    assert_eq!(calendar.len(), 1);
    assert_eq!(recorder.added(), 1);
}

#[test]
fn back_to_back_events_do_not_conflict() {
    let mut calendar = Calendar::new("Work").unwrap();

    calendar
        .add_event(timed("First", date(2025, 1, 1), hm(10, 0), hm(11, 0)))
        .unwrap();
    calendar
        .add_event(timed("Second", date(2025, 1, 1), hm(11, 0), hm(12, 0)))
        .unwrap();

    assert_eq!(calendar.len(), 2);
}

#[test]
fn all_day_event_blocks_its_whole_day() {
    let mut calendar = Calendar::new("Home").unwrap();
    calendar
        .add_event(Event::builder("Holiday", date(2025, 12, 25)).build().unwrap())
        .unwrap();

    assert!(matches!(
        calendar.add_event(timed("Dinner", date(2025, 12, 25), hm(18, 0), hm(20, 0))),
        Err(DaybookError::Conflict(_))
    ));
    calendar
        .add_event(timed("Brunch", date(2025, 12, 26), hm(0, 0), hm(1, 0)))
        .unwrap();
}

#[test]
fn recurring_event_adds_every_occurrence() {
    let (mut calendar, recorder) = calendar_with_recorder();
    let request = RecurrenceRequest::new("Weekly", date(2025, 1, 6), [Weekday::Mon], 3)
        .times(hm(10, 0), hm(11, 0));

    let occurrences = calendar.add_recurring_event(&request).unwrap();

    let dates: Vec<NaiveDate> = occurrences.iter().map(Event::start_date).collect();
    assert_eq!(dates, vec![date(2025, 1, 6), date(2025, 1, 13), date(2025, 1, 20)]);
    assert!(occurrences.iter().all(|e| e.start_date() == e.end_date()));
    assert_eq!(calendar.len(), 3);
    assert_eq!(recorder.added(), 3);

    let notified: Vec<NaiveDate> = recorder
        .added
        .lock()
        .unwrap()
        .iter()
        .map(Event::start_date)
        .collect();
    assert_eq!(notified, dates);
}

#[test]
fn recurring_event_is_all_or_nothing() {
    let (mut calendar, recorder) = calendar_with_recorder();
    calendar
        .add_event(timed("Dentist", date(2025, 1, 13), hm(10, 30), hm(11, 30)))
        .unwrap();

    let request = RecurrenceRequest::new("Weekly", date(2025, 1, 6), [Weekday::Mon], 3)
        .times(hm(10, 0), hm(11, 0));

    assert!(matches!(
        calendar.add_recurring_event(&request),
        Err(DaybookError::Conflict(_))
    ));
    assert_eq!(calendar.len(), 1);
    assert_eq!(calendar.series_count(), 0);
    assert_eq!(recorder.added(), 1);
}

#[test]
fn recurring_event_rejects_bad_arguments() {
    let mut calendar = Calendar::new("Work").unwrap();

    let no_days = RecurrenceRequest::new("Weekly", date(2025, 1, 6), Vec::<Weekday>::new(), 3);
    let no_count = RecurrenceRequest::new("Weekly", date(2025, 1, 6), [Weekday::Mon], 0);

    assert!(matches!(
        calendar.add_recurring_event(&no_days),
        Err(DaybookError::NoWeekdays)
    ));
    assert!(matches!(
        calendar.add_recurring_event(&no_count),
        Err(DaybookError::NoOccurrences)
    ));
    assert!(calendar.is_empty());
}

#[test]
fn remove_event_never_notifies() {
    let (mut calendar, recorder) = calendar_with_recorder();
    let event = Event::builder("Holiday", date(2025, 12, 25)).build().unwrap();
    calendar.add_event(event.clone()).unwrap();

    // Equal by key, built separately.
    let lookalike = Event::builder("Holiday", date(2025, 12, 25)).build().unwrap();
    calendar.remove_event(&lookalike).unwrap();

    assert!(calendar.is_empty());
    assert_eq!(recorder.added(), 1);
    assert_eq!(recorder.modified(), 0);
    assert!(matches!(
        calendar.remove_event(&event),
        Err(DaybookError::NotInCalendar)
    ));
}

#[test]
fn update_event_replaces_and_notifies_modification() {
    let (mut calendar, recorder) = calendar_with_recorder();
    let old = timed("Sync", date(2025, 1, 1), hm(9, 0), hm(10, 0));
    calendar.add_event(old.clone()).unwrap();

    let new = timed("Sync", date(2025, 1, 1), hm(9, 30), hm(10, 30));
    calendar.update_event(&old, new.clone()).unwrap();

    assert_eq!(calendar.events(), vec![new.clone()]);
    assert_eq!(recorder.modified.lock().unwrap().clone(), vec![new]);
}

#[test]
fn failed_update_restores_old_event() {
    let (mut calendar, recorder) = calendar_with_recorder();
    let old = timed("Sync", date(2025, 1, 1), hm(9, 0), hm(10, 0));
    let blocker = timed("Lunch", date(2025, 1, 1), hm(12, 0), hm(13, 0));
    calendar.add_event(old.clone()).unwrap();
    calendar.add_event(blocker).unwrap();
    let before = calendar.events();

    let clashing = timed("Sync", date(2025, 1, 1), hm(12, 30), hm(13, 30));

    assert!(matches!(
        calendar.update_event(&old, clashing),
        Err(DaybookError::Conflict(_))
    ));
    assert_eq!(calendar.events(), before);
    assert_eq!(
        calendar.events()[0].start_time(),
        Some(hm(9, 0)),
        "old event keeps its original fields"
    );
    assert_eq!(recorder.modified(), 0);
}

#[test]
fn update_of_missing_event_fails() {
    let mut calendar = Calendar::new("Work").unwrap();
    let ghost = Event::builder("Ghost", date(2025, 1, 1)).build().unwrap();

    assert!(matches!(
        calendar.update_event(&ghost, ghost.clone()),
        Err(DaybookError::NotInCalendar)
    ));
}

#[test]
fn modify_recurring_instance_detaches_it_from_series() {
    let (mut calendar, recorder) = calendar_with_recorder();
    let request = RecurrenceRequest::new("Weekly", date(2025, 1, 6), [Weekday::Mon], 3)
        .times(hm(10, 0), hm(11, 0));
    let occurrences = calendar.add_recurring_event(&request).unwrap();

    let mut edited = occurrences[1].clone();
    edited.set_times(hm(14, 0), hm(15, 0)).unwrap();
    calendar.modify_recurring_event_instance(edited.clone()).unwrap();

    let stored = calendar.event(edited.id()).unwrap();
    assert_eq!(stored.start_time(), Some(hm(14, 0)));
    assert!(!calendar.is_recurring(&stored));
    assert_eq!(calendar.get_recurring_events_all(&occurrences[0]).unwrap().len(), 2);
    assert_eq!(calendar.len(), 3);
    assert_eq!(recorder.modified(), 1);
}

#[test]
fn failed_recurring_modification_keeps_series_membership() {
    let (mut calendar, recorder) = calendar_with_recorder();
    let request = RecurrenceRequest::new("Weekly", date(2025, 1, 6), [Weekday::Mon], 2)
        .times(hm(10, 0), hm(11, 0));
    let occurrences = calendar.add_recurring_event(&request).unwrap();
    calendar
        .add_event(timed("Lunch", date(2025, 1, 6), hm(12, 0), hm(13, 0)))
        .unwrap();

    let mut edited = occurrences[0].clone();
    edited.set_times(hm(12, 30), hm(13, 30)).unwrap();

    assert!(matches!(
        calendar.modify_recurring_event_instance(edited),
        Err(DaybookError::Conflict(_))
    ));
    assert!(calendar.is_recurring(&occurrences[0]));
    assert_eq!(
        calendar.event(occurrences[0].id()).unwrap().start_time(),
        Some(hm(10, 0))
    );
    assert_eq!(recorder.modified(), 0);
}

#[test]
fn modify_non_recurring_event_fails() {
    let mut calendar = Calendar::new("Work").unwrap();
    let event = Event::builder("Holiday", date(2025, 12, 25)).build().unwrap();
    calendar.add_event(event.clone()).unwrap();

    assert!(matches!(
        calendar.modify_recurring_event_instance(event),
        Err(DaybookError::NotRecurring)
    ));
    assert_eq!(calendar.len(), 1);
}

#[test]
fn series_lookup_is_by_record_not_by_key() {
    let mut calendar = Calendar::new("Work").unwrap();
    let request = RecurrenceRequest::new("Weekly", date(2025, 1, 6), [Weekday::Mon], 3);
    let occurrences = calendar.add_recurring_event(&request).unwrap();

    let lookalike = Event::builder("Weekly", date(2025, 1, 6))
        .end_date(date(2025, 1, 6))
        .build()
        .unwrap();
    assert_eq!(lookalike, occurrences[0]);

    assert!(matches!(
        calendar.get_recurring_events_all(&lookalike),
        Err(DaybookError::NotRecurring)
    ));

    let from_second = calendar
        .get_recurring_events_from_date(&occurrences[0], date(2025, 1, 13))
        .unwrap();
    let dates: Vec<NaiveDate> = from_second.iter().map(Event::start_date).collect();
    assert_eq!(dates, vec![date(2025, 1, 13), date(2025, 1, 20)]);
}

#[test]
fn returned_events_are_copies() {
    let mut calendar = Calendar::new("Work").unwrap();
    calendar
        .add_event(Event::builder("A", date(2025, 1, 1)).build().unwrap())
        .unwrap();

    let mut snapshot = calendar.events();
    snapshot.clear();
    assert_eq!(calendar.len(), 1);

    let snapshot = calendar.events();
    calendar
        .add_event(Event::builder("B", date(2025, 1, 2)).build().unwrap())
        .unwrap();
    assert_eq!(snapshot.len(), 1);

    let mut copy = calendar.events()[0].clone();
    copy.set_subject("Renamed").unwrap();
    assert_eq!(calendar.events()[0].subject(), "A");
}

#[test]
fn date_queries_ignore_time_of_day() {
    let mut calendar = Calendar::new("Work").unwrap();
    calendar
        .add_event(
            Event::builder("Conference", date(2025, 6, 1))
                .end_date(date(2025, 6, 3))
                .start_time(hm(9, 0))
                .end_time(hm(8, 0))
                .build()
                .unwrap(),
        )
        .unwrap();
    calendar
        .add_event(timed("Retro", date(2025, 6, 5), hm(15, 0), hm(16, 0)))
        .unwrap();

    assert_eq!(calendar.events_on_date(date(2025, 6, 2)).len(), 1);
    assert_eq!(calendar.events_on_date(date(2025, 6, 4)).len(), 0);
    assert_eq!(
        calendar
            .events_in_range(date(2025, 6, 3), date(2025, 6, 5))
            .unwrap()
            .len(),
        2
    );
    assert!(matches!(
        calendar.events_in_range(date(2025, 6, 5), date(2025, 6, 3)),
        Err(DaybookError::InvalidRange(_))
    ));
}

#[test]
fn is_busy_uses_half_open_interval() {
    let mut calendar = Calendar::new("Work").unwrap();
    calendar
        .add_event(timed("Sync", date(2025, 1, 1), hm(10, 0), hm(11, 0)))
        .unwrap();

    assert!(calendar.is_busy(date(2025, 1, 1), hm(10, 0)));
    assert!(calendar.is_busy(date(2025, 1, 1), hm(10, 59)));
    assert!(!calendar.is_busy(date(2025, 1, 1), hm(11, 0)));
    assert!(!calendar.is_busy(date(2025, 1, 2), hm(10, 30)));
}

#[test]
fn get_event_matches_identity_key() {
    let mut calendar = Calendar::new("Work").unwrap();
    let event = timed("Sync", date(2025, 1, 1), hm(10, 0), hm(11, 0));
    calendar.add_event(event.clone()).unwrap();

    let found = calendar.get_event("Sync", date(2025, 1, 1), Some(hm(10, 0))).unwrap();
    assert_eq!(found.id(), event.id());
    assert!(calendar.get_event("Sync", date(2025, 1, 1), None).is_none());
    assert!(calendar.get_event("", date(2025, 1, 1), None).is_none());
}

#[test]
fn failing_listener_does_not_block_others_or_roll_back() {
    let mut calendar = Calendar::new("Work").unwrap();
    let recorder = Arc::new(Recorder::default());
    calendar.add_listener(Arc::new(Exploding));
    calendar.add_listener(recorder.clone());

    calendar
        .add_event(Event::builder("Holiday", date(2025, 12, 25)).build().unwrap())
        .unwrap();

    assert_eq!(calendar.len(), 1);
    assert_eq!(recorder.added(), 1);
}

#[test]
fn removed_listener_is_not_notified() {
    let mut calendar = Calendar::new("Work").unwrap();
    let recorder = Arc::new(Recorder::default());
    let listener: Arc<dyn CalendarListener> = recorder.clone();
    calendar.add_listener(listener.clone());
    calendar.add_listener(listener.clone());
    calendar.remove_listener(&listener);

    calendar
        .add_event(Event::builder("Holiday", date(2025, 12, 25)).build().unwrap())
        .unwrap();

    assert_eq!(recorder.added(), 0);
}

#[test]
fn csv_round_trip_preserves_events() {
    let mut source = Calendar::new("Work").unwrap();
    source
        .add_event(Event::builder("Holiday", date(2025, 12, 25)).build().unwrap())
        .unwrap();
    source
        .add_event(
            Event::builder("Review, Q4", date(2025, 12, 26))
                .end_date(date(2025, 12, 26))
                .start_time(hm(9, 0))
                .end_time(hm(10, 0))
                .description("Numbers")
                .location("Room \"B\"")
                .visibility(Visibility::Private)
                .build()
                .unwrap(),
        )
        .unwrap();

    let mut out = Vec::new();
    source.export_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().nth(1),
        Some("Holiday,12/25/2025,,12/25/2025,,True,,,False")
    );

    let (mut restored, recorder) = calendar_with_recorder();
    let summary = restored.import_csv(Cursor::new(text)).unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(recorder.added(), 2);

    let original = source.events();
    let imported = restored.events();
    assert_eq!(imported, original);
    for (a, b) in original.iter().zip(&imported) {
        assert_eq!(a.end_date_time(), b.end_date_time());
        assert_eq!(a.description(), b.description());
        assert_eq!(a.location(), b.location());
        assert_eq!(a.visibility(), b.visibility());
        assert_eq!(a.is_all_day(), b.is_all_day());
    }
}

fn export_then_import(source: &Calendar) -> Calendar {
    let mut out = Vec::new();
    source.export_csv(&mut out).unwrap();

    let mut restored = Calendar::new(source.title()).unwrap();
    let summary = restored.import_csv(Cursor::new(out)).unwrap();
    assert_eq!(summary.skipped, 0);
    restored
}

#[test]
fn csv_round_trip_keeps_sub_second_times() {
    let mut source = Calendar::new("Work").unwrap();
    let launch = Event::builder("Launch", date(2025, 1, 1))
        .end_date(date(2025, 1, 1))
        .start_time(NaiveTime::from_hms_milli_opt(10, 0, 0, 500).unwrap())
        .end_time(NaiveTime::from_hms_micro_opt(10, 30, 15, 250).unwrap())
        .build()
        .unwrap();
    source.add_event(launch.clone()).unwrap();

    let back = export_then_import(&source).events();

    assert_eq!(back, vec![launch.clone()]);
    assert_eq!(back[0].start_time(), launch.start_time());
    assert_eq!(back[0].end_date_time(), launch.end_date_time());
}

#[test]
fn csv_round_trip_keeps_line_breaks_and_padding() {
    let mut source = Calendar::new("Work").unwrap();
    let retro = Event::builder("  Retro ", date(2025, 2, 3))
        .description("Went well:\nshipping\r\nTo improve: \"estimates\", scope")
        .location(" Room 4 ")
        .build()
        .unwrap();
    source.add_event(retro.clone()).unwrap();

    let back = export_then_import(&source).events();

    assert_eq!(back.len(), 1);
    assert_eq!(back[0].key(), retro.key());
    assert_eq!(back[0].subject(), "  Retro ");
    assert_eq!(back[0].description(), retro.description());
    assert_eq!(back[0].location(), Some(" Room 4 "));
}

#[test]
fn import_skips_bad_rows_and_bypasses_conflict_checks() {
    let mut calendar = Calendar::with_default_visibility("Work", Visibility::Private).unwrap();
    let csv = "\
Subject,Start Date,Start Time,End Date,End Time,All Day Event,Description,Location,Private
Sync,01/01/2025,10:00,01/01/2025,11:00,False,,,
Overlap,01/01/2025,10:30,01/01/2025,11:30,False,,,False
broken row

Sync,01/01/2025,10:00,01/01/2025,11:00,False,,,False
";

    let summary = calendar.import_csv(Cursor::new(csv)).unwrap();

    assert_eq!(summary.imported, 3);
    assert_eq!(summary.skipped, 1);
    let events = calendar.events();
    assert_eq!(events[0].visibility(), Visibility::Private);
    assert_eq!(events[1].visibility(), Visibility::Public);
}

#[test]
fn import_of_empty_input_adds_nothing() {
    let mut calendar = Calendar::new("Work").unwrap();
    let summary = calendar.import_csv(Cursor::new("")).unwrap();

    assert_eq!(summary.imported, 0);
    assert!(calendar.is_empty());
}

#[test]
fn saved_calendar_is_restored_and_found_by_its_original_title() {
    let dir = tempfile::tempdir().unwrap();
    let mut plans = Calendar::new("Q1/Q2 plans.").unwrap();
    plans
        .add_event(timed("Kickoff", date(2025, 1, 6), hm(9, 0), hm(10, 0)))
        .unwrap();
    let mut home = Calendar::new("Home").unwrap();
    home.add_event(Event::builder("Dentist", date(2025, 1, 7)).build().unwrap())
        .unwrap();
    save_calendar(&plans, dir.path()).unwrap();
    save_calendar(&home, dir.path()).unwrap();

    let restored = restore_all(dir.path(), Visibility::Public).unwrap();

    let index = find_calendar(&restored, "Q1/Q2 plans.").unwrap();
    assert_eq!(restored[index].events(), plans.events());
    assert_eq!(find_calendar(&restored, "Home"), Some(0));
}
