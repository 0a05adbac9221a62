use serde::{Deserialize, Serialize};

use crate::contract::PaletteView;
use crate::grouping::{result_at, total_results};
use crate::palette::CommandPalette;

/// One line of input to the palette driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum PaletteRequest {
    SetInput { input: String },
    ArrowUp,
    ArrowDown,
    Hover { index: Option<usize> },
    Execute { index: Option<usize> },
    Submit,
    Escape,
    Show,
    Hide,
    Toggle,
    View,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    ResultNotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { view: PaletteView },
    Err { error: ErrorResponse },
}

pub fn handle_request(palette: &mut CommandPalette, request: PaletteRequest) -> TransportResponse {
    match request {
        PaletteRequest::SetInput { input } => palette.set_input(input),
        PaletteRequest::ArrowUp => palette.arrow_up(),
        PaletteRequest::ArrowDown => {
            let total = total_results(palette.grouped_results());
            palette.arrow_down(total.saturating_sub(1));
        }
        PaletteRequest::Hover { index: Some(index) } => palette.mouse_enter_result(index),
        PaletteRequest::Hover { index: None } => palette.mouse_leave_result(),
        PaletteRequest::Execute { index } => {
            let index = index.unwrap_or_else(|| palette.active_result_index());
            let Some(result) = result_at(palette.grouped_results(), index).cloned() else {
                return TransportResponse::Err {
                    error: ErrorResponse {
                        code: ErrorCode::ResultNotFound,
                        message: format!("no result at index {index}"),
                    },
                };
            };
            palette.execute_result(&result);
        }
        PaletteRequest::Submit => {
            palette.submit();
        }
        PaletteRequest::Escape => {
            palette.escape();
        }
        PaletteRequest::Show => palette.show(),
        PaletteRequest::Hide => palette.hide(),
        PaletteRequest::Toggle => {
            palette.toggle();
        }
        PaletteRequest::View => {}
    }

    TransportResponse::Ok {
        view: palette.view(),
    }
}

pub fn handle_json(palette: &mut CommandPalette, payload: &str) -> String {
    let response = match serde_json::from_str::<PaletteRequest>(payload) {
        Ok(request) => handle_request(palette, request),
        Err(error) => invalid_json(&error),
    };
    encode_response(&response)
}

pub fn invalid_json(error: &serde_json::Error) -> TransportResponse {
    let code = if error.is_syntax() || error.is_eof() {
        ErrorCode::InvalidJson
    } else {
        ErrorCode::InvalidRequest
    };
    TransportResponse::Err {
        error: ErrorResponse {
            code,
            message: error.to_string(),
        },
    }
}

pub fn encode_response(response: &TransportResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|error| {
        format!(
            r#"{{"status":"err","error":{{"code":"invalid_request","message":"{}"}}}}"#,
            error.to_string().replace('"', "'")
        )
    })
}
