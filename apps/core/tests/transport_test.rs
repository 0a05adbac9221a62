use std::sync::{Arc, Mutex};

use serde_json::Value;

use palette_core::collaborators::{Analytics, Collaborators};
use palette_core::model::{Command, Icon, ResultTemplate};
use palette_core::palette::CommandPalette;
use palette_core::transport::{
    handle_json, handle_request, ErrorCode, PaletteRequest, TransportResponse,
};

#[derive(Default)]
struct ExecutedDisplays(Mutex<Vec<String>>);

impl Analytics for ExecutedDisplays {
    fn capture(&self, event: &str, payload: Value) {
        if event == "palette command executed" {
            let display = payload["display"].as_str().unwrap_or_default().to_string();
            self.0.lock().unwrap().push(display);
        }
    }
}

fn palette_with_seed_commands() -> CommandPalette {
    let mut palette = CommandPalette::default();
    palette.register_command(Command::new(
        "seed",
        "global",
        vec![
            ResultTemplate::new(Icon::new("rise"), "Go to Insights").executes(|| None),
            ResultTemplate::new(Icon::new("container"), "Go to Events").executes(|| None),
        ],
    ));
    palette
}

fn view_of(response: TransportResponse) -> palette_core::contract::PaletteView {
    match response {
        TransportResponse::Ok { view } => view,
        TransportResponse::Err { error } => panic!("expected ok response, got {error:?}"),
    }
}

#[test]
fn set_input_returns_grouped_view() {
    let mut palette = palette_with_seed_commands();

    let view = view_of(handle_request(
        &mut palette,
        PaletteRequest::SetInput {
            input: "insights".into(),
        },
    ));

    assert_eq!(view.input, "insights");
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].scope, "global");
    assert_eq!(view.groups[0].results[0].display, "Go to Insights");
    assert_eq!(view.groups[0].results[0].index, Some(0));
}

#[test]
fn json_handler_returns_invalid_json_error_code() {
    let mut palette = palette_with_seed_commands();

    let raw = handle_json(&mut palette, "{not-json");
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();

    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidJson),
        _ => panic!("expected invalid json error"),
    }
}

#[test]
fn json_handler_returns_invalid_request_error_code() {
    let mut palette = palette_with_seed_commands();

    let raw = handle_json(&mut palette, r#"{"kind":"launch_rocket"}"#);
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();

    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidRequest),
        _ => panic!("expected invalid request error"),
    }
}

#[test]
fn execute_out_of_range_reports_result_not_found() {
    let mut palette = palette_with_seed_commands();
    palette.set_input("insights");

    let response = handle_request(&mut palette, PaletteRequest::Execute { index: Some(9) });
    match response {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::ResultNotFound),
        _ => panic!("expected result not found"),
    }
}

#[test]
fn json_session_shows_navigates_and_executes() {
    let mut palette = palette_with_seed_commands();

    let raw = handle_json(&mut palette, r#"{"kind":"show"}"#);
    assert!(raw.contains("\"status\":\"ok\""));
    assert!(raw.contains("\"shown\":true"));

    handle_json(
        &mut palette,
        r#"{"kind":"set_input","payload":{"input":"go to"}}"#,
    );
    let raw = handle_json(&mut palette, r#"{"kind":"arrow_down"}"#);
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();
    assert_eq!(view_of(parsed).active_result_index, 1);

    let raw = handle_json(&mut palette, r#"{"kind":"submit"}"#);
    let view = view_of(serde_json::from_str(&raw).unwrap());
    assert!(!view.shown);
    assert_eq!(view.input, "");
}

#[test]
fn hover_overrides_keyboard_selection_until_left() {
    let mut palette = palette_with_seed_commands();
    palette.set_input("go to");

    let view = view_of(handle_request(
        &mut palette,
        PaletteRequest::Hover { index: Some(1) },
    ));
    assert_eq!(view.active_result_index, 1);

    let view = view_of(handle_request(&mut palette, PaletteRequest::Hover { index: None }));
    assert_eq!(view.active_result_index, 0);
}

#[test]
fn escape_request_hides_an_idle_palette() {
    let mut palette = palette_with_seed_commands();
    handle_request(&mut palette, PaletteRequest::Toggle);
    assert!(palette.is_shown());

    let view = view_of(handle_request(&mut palette, PaletteRequest::Escape));
    assert!(!view.shown);
}

#[test]
fn submit_runs_the_result_the_last_view_showed() {
    for _ in 0..10 {
        let executed = Arc::new(ExecutedDisplays::default());
        let mut palette =
            CommandPalette::new(Collaborators::logging().with_analytics(executed.clone()));
        for n in 0..20 {
            palette.register_command(Command::new(
                format!("sample-{n}"),
                "Samples",
                ResultTemplate::new(Icon::new("x"), format!("Sample {n}")).executes(|| None),
            ));
        }
        handle_request(&mut palette, PaletteRequest::Show);

        handle_request(&mut palette, PaletteRequest::View);
        let view = view_of(handle_request(&mut palette, PaletteRequest::View));
        let shown = view.groups[0].results[0].display.clone();
        handle_request(&mut palette, PaletteRequest::Submit);

        assert_eq!(executed.0.lock().unwrap().clone(), vec![shown]);
    }
}
