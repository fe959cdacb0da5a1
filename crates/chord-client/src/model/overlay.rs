// Ring topology snapshot entries

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

/// One ring member as reported by the `overlay` call.
///
/// Key-range bounds are kept as exact decimal strings; they routinely exceed
/// 64 bits and are only ever reformatted for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayEntry {
    #[serde(rename = "url")]
    pub address: String,
    #[serde(rename = "predecessor_url")]
    pub predecessor_address: String,
    #[serde(rename = "successor_url")]
    pub successor_address: String,
    #[serde(rename = "keys_start", deserialize_with = "decimal_string")]
    pub key_range_start: String,
    #[serde(rename = "keys_end", deserialize_with = "decimal_string")]
    pub key_range_end: String,
}

/// Accept a key-space position sent either as a JSON string or a JSON number
fn decimal_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a decimal key-space position, got {}",
            other
        ))),
    }
}
