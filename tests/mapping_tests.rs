use std::path::Path;
use timetree_to_gcal::components::migration::{map_event, preview, EventDefaults};
use timetree_to_gcal::components::timetree::time::to_local_timestamp;
use timetree_to_gcal::components::timetree::{load_export, parse_export, TimeTreeEvent};
use timetree_to_gcal::error::Error;

fn defaults() -> EventDefaults {
    EventDefaults {
        timezone: "Europe/London".to_string(),
        use_default_reminders: true,
    }
}

fn lunch() -> TimeTreeEvent {
    TimeTreeEvent {
        title: "Lunch".to_string(),
        all_day: false,
        note: "x".to_string(),
        start_at: 0,
        end_at: 3_600_000,
        recurrences: vec![],
        start_timezone: "UTC".to_string(),
        location: "Cafe".to_string(),
    }
}

#[test]
fn test_lunch_event_mapping() {
    let event = map_event(&lunch(), &defaults()).unwrap();

    assert_eq!(event.summary, "Lunch");
    assert_eq!(event.location, "Cafe");
    assert_eq!(event.description, "");
    assert_eq!(event.start.time_zone, "Europe/London");
    assert_eq!(event.end.time_zone, "Europe/London");
    assert_eq!(event.start.date_time, to_local_timestamp(0).unwrap());
    assert_eq!(event.end.date_time, to_local_timestamp(3_600_000).unwrap());
    assert!(event.start.date_time.ends_with("-00:00"));
    assert!(event.recurrence.is_empty());
    assert!(event.attendees.is_empty());
    assert!(event.reminders.use_default);
}

#[test]
fn test_mapping_is_deterministic() {
    let source = lunch();
    let first = map_event(&source, &defaults()).unwrap();
    let _other = map_event(&TimeTreeEvent::default(), &defaults()).unwrap();
    let second = map_event(&source, &defaults()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_note_all_day_and_source_timezone_are_dropped() {
    let mut source = lunch();
    source.note = "Remember the voucher".to_string();
    source.start_timezone = "Asia/Tokyo".to_string();
    let mut all_day = source.clone();
    all_day.all_day = true;

    let event = map_event(&source, &defaults()).unwrap();
    assert_eq!(event.description, "");
    assert_ne!(event.start.time_zone, "Asia/Tokyo");
    assert_eq!(event, map_event(&all_day, &defaults()).unwrap());

    let json = serde_json::to_string(&event).unwrap();
    assert!(!json.contains("voucher"));
    assert!(!json.contains("Asia/Tokyo"));
}

#[test]
fn test_recurrences_pass_through() {
    let mut source = lunch();
    source.recurrences = vec![
        "RRULE:FREQ=WEEKLY;BYDAY=MO".to_string(),
        "EXDATE:19700105T000000Z".to_string(),
    ];

    let event = map_event(&source, &defaults()).unwrap();
    assert_eq!(event.recurrence, source.recurrences);
}

#[test]
fn test_payload_uses_api_field_names() {
    let event = map_event(&lunch(), &defaults()).unwrap();
    let json = serde_json::to_value(&event).unwrap();

    assert_eq!(json["start"]["timeZone"], "Europe/London");
    assert!(json["start"]["dateTime"].is_string());
    assert_eq!(json["reminders"]["useDefault"], true);
    assert_eq!(json["attendees"], serde_json::json!([]));
    assert_eq!(json["description"], "");
}

#[test]
fn test_out_of_range_timestamp_fails_mapping() {
    let mut source = lunch();
    source.end_at = i64::MAX;

    assert!(matches!(
        map_event(&source, &defaults()),
        Err(Error::TimeConversion(_))
    ));
}

#[test]
fn test_load_export_fixture() {
    let export = load_export(Path::new("tests/data/timetree_export.json")).unwrap();

    assert_eq!(export.events.len(), 3);
    assert_eq!(export.events[0], lunch());
    assert_eq!(export.events[1].recurrences, vec!["RRULE:FREQ=WEEKLY;BYDAY=WE"]);

    let previews = preview(&export, &defaults());
    assert_eq!(previews.len(), 3);
    assert!(previews.iter().all(|p| p.is_ok()));
}

#[test]
fn test_missing_field_is_rejected() {
    let content = r#"{"events": [{"title": "No times", "all_day": false, "note": "",
        "recurrences": [], "start_timezone": "UTC", "location": ""}]}"#;

    let err = parse_export(content).unwrap_err();
    assert!(err.to_string().contains("start_at"));
}

#[test]
fn test_missing_input_file() {
    assert!(matches!(
        load_export(Path::new("tests/data/does_not_exist.json")),
        Err(Error::Input(_))
    ));
}
