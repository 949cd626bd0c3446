use event_csv_decode::event::Event;
use serde_json::json;

#[test]
fn event_deserializes_transparently_from_json_objects() {
    let event: Event = serde_json::from_str(r#"{"msg": "a,b", "n": 1}"#).unwrap();
    assert_eq!(event.get("msg").unwrap(), &json!("a,b"));
    assert_eq!(event.get("n").unwrap(), &json!(1));

    // Non-objects are not events.
    assert!(serde_json::from_str::<Event>("[1,2]").is_err());
    assert!(Event::from_value(json!("scalar")).is_none());
}

#[test]
fn event_serializes_back_to_the_same_object() {
    let event = Event::from_value(json!({"a": {"b": 1}, "c": "x"})).unwrap();
    let round: Event = serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
    assert_eq!(round, event);
}

#[test]
fn put_then_get_through_multiple_levels() {
    let mut event = Event::new();
    event.put("host.os.name", json!("linux")).unwrap();
    event.put("host.os.version", json!("6.1")).unwrap();
    event.put("host.name", json!("web-1")).unwrap();

    assert_eq!(event.get("host.os.name").unwrap(), &json!("linux"));
    assert_eq!(event.get("host.os.version").unwrap(), &json!("6.1"));
    assert_eq!(event.get("host.name").unwrap(), &json!("web-1"));
    assert!(event.contains("host.os"));
    assert!(!event.contains("host.ip"));
}

#[test]
fn into_map_exposes_the_root_object() {
    let event = Event::from_value(json!({"a": 1})).unwrap();
    let map = event.into_map();
    assert_eq!(map.get("a").unwrap(), &json!(1));
}
