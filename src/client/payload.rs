use serde_json::Value;

use super::{ClientError, ClientResult};
use crate::domain::HistoryPage;

/// Decodes a history response body. The page object may be the body itself
/// or sit one level down under `data`, depending on the API gateway in
/// front of the service.
pub fn decode_history_page(body: Value) -> ClientResult<HistoryPage> {
    let page = unwrap_envelope(body)?;
    serde_json::from_value(page).map_err(|e| ClientError::ParseError(e.to_string()))
}

fn unwrap_envelope(body: Value) -> ClientResult<Value> {
    let Value::Object(mut map) = body else {
        return Err(ClientError::ParseError(
            "history response is not an object".to_string(),
        ));
    };

    if map.contains_key("records") {
        return Ok(Value::Object(map));
    }

    match map.remove("data") {
        Some(inner @ Value::Object(_)) => Ok(inner),
        Some(_) => Err(ClientError::ParseError(
            "history response `data` is not an object".to_string(),
        )),
        None => Err(ClientError::ParseError(
            "history response has no records".to_string(),
        )),
    }
}
