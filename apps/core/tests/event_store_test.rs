use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use palette_core::collaborators::{Analytics, Collaborators};
use palette_core::event_store::{self, SqliteAnalytics};
use palette_core::model::{Command, Icon, ResultTemplate};
use palette_core::palette::CommandPalette;

#[test]
fn records_and_lists_events_in_order() {
    let db = event_store::open_memory().unwrap();
    event_store::record_event(&db, "palette shown", &serde_json::Value::Null).unwrap();
    event_store::record_event(&db, "palette feedback", &json!({ "message": "hi" })).unwrap();

    let events = event_store::list_events(&db).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "palette shown");
    assert_eq!(events[1].payload["message"], "hi");
    assert!(events[1].captured_epoch_secs > 0);
}

#[test]
fn persists_events_across_reopen() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let db_path = std::env::temp_dir()
        .join("palette")
        .join(format!("persist-test-{unique}.sqlite3"));

    {
        let db = event_store::open_file(&db_path).unwrap();
        event_store::record_event(&db, "palette shown", &serde_json::Value::Null).unwrap();
    }

    let reopened = event_store::open_file(&db_path).unwrap();
    assert_eq!(event_store::count_events(&reopened, "palette shown").unwrap(), 1);

    drop(reopened);
    std::fs::remove_file(&db_path).unwrap();
}

#[test]
fn sqlite_analytics_captures_palette_events() {
    let analytics = std::sync::Arc::new(SqliteAnalytics::new(event_store::open_memory().unwrap()));
    let mut palette =
        CommandPalette::new(Collaborators::default().with_analytics(analytics.clone()));
    palette.register_command(Command::new(
        "go-to",
        "global",
        ResultTemplate::new(Icon::new("rise"), "Go to Insights").executes(|| None),
    ));

    palette.show();
    palette.set_input("insights");
    let results = palette.search_results();
    palette.execute_result(&results[0]);

    let events = analytics
        .with_connection(|db| event_store::list_events(db))
        .unwrap()
        .unwrap();
    let names: Vec<&str> = events.iter().map(|event| event.name.as_str()).collect();
    assert_eq!(names, vec!["palette shown", "palette command executed"]);
    assert_eq!(events[1].payload["source"]["key"], "go-to");
}

#[test]
fn capture_is_usable_through_the_trait() {
    let analytics = SqliteAnalytics::new(event_store::open_memory().unwrap());
    let sink: &dyn Analytics = &analytics;
    sink.capture("palette feedback", json!({ "message": "more charts" }));

    let count = analytics
        .with_connection(|db| event_store::count_events(db, "palette feedback"))
        .unwrap()
        .unwrap();
    assert_eq!(count, 1);
}
