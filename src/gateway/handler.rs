use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::constants::{
    INPUT_PREVIEW_CHARS, SEMFIND_STATUS_HEADER, SEMFIND_STATUS_SUCCESS, char_prefix,
};
use crate::embedding::Embedder;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;

/// `POST /process` form fields. Missing fields deserialize as empty.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessForm {
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub threshold: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub status: &'static str,
    pub result: String,
    pub input: String,
    pub cached: bool,
}

#[instrument(skip_all, fields(text_chars = tracing::field::Empty))]
pub async fn process_handler<E>(
    State(state): State<HandlerState<E>>,
    form: Result<Form<ProcessForm>, FormRejection>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
{
    let Form(form) = form?;

    if form.input_text.is_empty() {
        return Err(GatewayError::InvalidRequest("no text provided".to_string()));
    }
    tracing::Span::current().record("text_chars", form.input_text.chars().count());

    let threshold = parse_threshold(form.threshold.as_deref(), state.default_threshold)?;
    let input = input_preview(&form.input_text);

    let service = state.service.clone();
    let ProcessForm {
        input_text, query, ..
    } = form;
    let prediction =
        tokio::task::spawn_blocking(move || service.predict(&input_text, &query, threshold))
            .await
            .map_err(|e| {
                error!(error = %e, "Match task failed");
                GatewayError::InternalError(e.to_string())
            })?
            .inspect_err(|e| error!(error = %e, "Match failed"))?;

    debug!(cached = prediction.cached, "Request processed");

    let mut headers = HeaderMap::new();
    headers.insert(
        SEMFIND_STATUS_HEADER,
        HeaderValue::from_static(SEMFIND_STATUS_SUCCESS),
    );

    let body = ProcessResponse {
        status: "success",
        result: prediction.summary.to_string(),
        input,
        cached: prediction.cached,
    };

    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

/// Blank or missing means `default`.
pub(crate) fn parse_threshold(raw: Option<&str>, default: f32) -> Result<f32, GatewayError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<f32>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| GatewayError::InvalidRequest(format!("invalid threshold '{value}'"))),
    }
}

/// First 100 characters, with `...` appended when the text was longer.
pub(crate) fn input_preview(text: &str) -> String {
    let prefix = char_prefix(text, INPUT_PREVIEW_CHARS);
    if prefix.len() < text.len() {
        format!("{prefix}...")
    } else {
        prefix.to_string()
    }
}
