//! Lenient serde adapters for loosely typed vendor fields.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::records::Side;

/// Scalar rendered as text: strings pass through, numbers and booleans are
/// stringified, `null` and empty strings become `None`.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		Some(Value::String(s)) if s.trim().is_empty() => None,
		Some(Value::String(s)) => Some(s),
		Some(Value::Number(n)) => Some(n.to_string()),
		Some(Value::Bool(b)) => Some(b.to_string()),
		_ => None,
	})
}

/// Boolean encoded as `true`/`false`, `0`/`1` or their string forms.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		Some(Value::Bool(b)) => Some(b),
		Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0),
		Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
			"true" | "1" => Some(true),
			"false" | "0" => Some(false),
			_ => None,
		},
		_ => None,
	})
}

/// Maps the vendor `IsBuy` flag into a [`Side`]; anything falsy is a sell.
pub fn side<'de, D>(deserializer: D) -> Result<Side, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(if flag(deserializer)?.unwrap_or(false) { Side::Buy } else { Side::Sell })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Deserialize)]
	struct Row {
		#[serde(default, deserialize_with = "text")]
		label: Option<String>,
		#[serde(default, deserialize_with = "flag")]
		on: Option<bool>,
		#[serde(default, deserialize_with = "side")]
		side: Side,
	}

	#[test]
	fn scalars_become_text() {
		let row: Row = serde_json::from_str(r#"{"label": 12.5}"#).unwrap();
		assert_eq!(row.label.as_deref(), Some("12.5"));
		let row: Row = serde_json::from_str(r#"{"label": "  "}"#).unwrap();
		assert_eq!(row.label, None);
	}

	#[test]
	fn flags_and_sides() {
		let row: Row = serde_json::from_str(r#"{"on": 1, "side": true}"#).unwrap();
		assert_eq!(row.on, Some(true));
		assert_eq!(row.side, Side::Buy);

		let row: Row = serde_json::from_str(r#"{"on": "False", "side": null}"#).unwrap();
		assert_eq!(row.on, Some(false));
		assert_eq!(row.side, Side::Sell);
		assert_eq!(serde_json::to_value(Side::Buy).unwrap(), "B");
	}
}
