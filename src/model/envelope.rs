//! Request payload encoding and response unwrapping for the backend gateway
//!
//! Every backend call carries a JSON object `{ action, accessToken, ...fields }`
//! percent-encoded into the `q` query parameter, and every answer is a JSON
//! object `{ ok, content?, error? }`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::GatewayError;

/// The four backend actions and their operation-specific fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action<'a> {
    GetPlaylistIds,
    GetPlaylist {
        playlist_id: &'a str,
    },
    NewPlaylist {
        playlist_id: &'a str,
    },
    AddSongRequest {
        playlist_id: &'a str,
        artist: &'a str,
        title: &'a str,
    },
}

impl Action<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetPlaylistIds => "getPlaylistIds",
            Action::GetPlaylist { .. } => "getPlaylist",
            Action::NewPlaylist { .. } => "newPlaylist",
            Action::AddSongRequest { .. } => "addSongRequest",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    #[serde(flatten)]
    action: &'a Action<'a>,
    access_token: &'a str,
}

/// JSON-encode and percent-escape a request, ready to be used as the `q` value
pub fn wrap(action: &Action<'_>, access_token: &str) -> Result<String, GatewayError> {
    let json = serde_json::to_string(&Payload {
        action,
        access_token,
    })
    .map_err(|e| GatewayError::MalformedResponse(format!("could not encode request: {e}")))?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Apply the `{ ok, content, error }` rule to a parsed response body
pub fn unwrap(response: Value) -> Result<Value, GatewayError> {
    let mut fields = match response {
        Value::Object(fields) => fields,
        other => {
            return Err(GatewayError::MalformedResponse(format!(
                "expected an object, got '{other}'"
            )));
        }
    };

    let ok = fields.get("ok").and_then(Value::as_bool);
    match ok {
        Some(true) => Ok(fields.remove("content").unwrap_or(Value::Null)),
        Some(false) => {
            let message = match fields.remove("error") {
                Some(Value::String(message)) => message,
                Some(Value::Null) | None => "unknown error".to_string(),
                Some(other) => other.to_string(),
            };
            Err(GatewayError::Remote(message))
        }
        None => Err(GatewayError::MalformedResponse(format!(
            "missing 'ok' flag in '{}'",
            Value::Object(fields)
        ))),
    }
}

/// Parse a raw body, unwrap the envelope and decode its content
pub fn unwrap_body<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        GatewayError::MalformedResponse(format!("response is not JSON ({e})"))
    })?;
    let content = unwrap(value)?;
    serde_json::from_value(content)
        .map_err(|e| GatewayError::MalformedResponse(format!("unexpected content ({e})")))
}
