use axum::body::{Body, Bytes};
use serde_json::{Map, Value};

use crate::{
    error::{Result, TtsError},
    types::{DEFAULT_FORMAT, DEFAULT_VOICE, MAX_TEXT_CHARS, SynthesisRequest},
};

/// Body limit for speech requests (1 MiB)
///
/// A JSON body holding at most `MAX_TEXT_CHARS` characters of text, even
/// fully `\u`-escaped, stays well under this, so anything larger carries
/// over-long text (or is not a usable request at all).
pub const BODY_LIMIT_BYTES: usize = 1 << 20;

impl SynthesisRequest {
    /// Parse and validate a raw request body
    ///
    /// An absent, unparseable, or non-object body is read as `{}` and so
    /// fails with "No text provided". `voice` and `format` fall back to
    /// their defaults when absent or `null`.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let mut fields = parse_object(body);

        let text = match fields.remove("text") {
            Some(Value::String(text)) if !text.is_empty() => text,
            Some(value) if is_truthy(&value) => {
                return Err(TtsError::InvalidRequest("text must be a string".to_string()));
            }
            _ => return Err(TtsError::NoText),
        };

        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(TtsError::TextTooLong);
        }

        let voice = string_field(&mut fields, "voice", DEFAULT_VOICE)?;
        let format = string_field(&mut fields, "format", DEFAULT_FORMAT)?;

        Ok(Self { text, voice, format })
    }
}

fn parse_object(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            tracing::debug!("request body is not a JSON object ({}), treating as empty", json_kind(&other));
            Map::new()
        }
        Err(e) => {
            tracing::debug!("request body is not valid JSON ({e}), treating as empty");
            Map::new()
        }
    }
}

fn string_field(fields: &mut Map<String, Value>, name: &str, default: &str) -> Result<String> {
    match fields.remove(name) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(TtsError::InvalidRequest(format!("{name} must be a string"))),
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extractor for the raw request body, bounded by `BODY_LIMIT_BYTES`
///
/// Content-Type is not checked: callers that omit it still get the
/// body-as-JSON treatment. A body over the limit is rejected as
/// `TextTooLong`, the same answer a smaller over-long text gets.
pub struct ExtractBody(pub Bytes);

impl<S> axum::extract::FromRequest<S> for ExtractBody
where
    S: Send + Sync,
{
    type Rejection = TtsError;

    async fn from_request(request: http::Request<Body>, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let bytes = axum::body::to_bytes(request.into_body(), BODY_LIMIT_BYTES)
            .await
            .map_err(|err| {
                if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
                {
                    TtsError::TextTooLong
                } else {
                    TtsError::InvalidRequest(format!("failed to read request body: {err}"))
                }
            })?;

        Ok(Self(bytes))
    }
}
