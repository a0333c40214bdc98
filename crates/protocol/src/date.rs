//! Vendor timestamp decoding.
//!
//! The portal mixes three encodings: ASP.NET JSON dates (`/Date(1718593735000)/`,
//! milliseconds, optionally followed by an offset), epoch seconds (price
//! history), and naive date strings in portal local time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Portal local time (Indochina Time, UTC+7).
pub const PORTAL_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// `/Date(-62135596800000)/`: .NET `DateTime.MinValue`, used for "no date".
const DOTNET_MIN_MILLIS: i64 = -62_135_596_800_000;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

pub fn portal_offset() -> FixedOffset {
	FixedOffset::east_opt(PORTAL_UTC_OFFSET_SECS).unwrap_or(Utc.fix())
}

/// Today's date on the portal's calendar.
pub fn portal_today() -> NaiveDate {
	Utc::now().with_timezone(&portal_offset()).date_naive()
}

/// Formats a date the way form fields expect it (`YYYY-MM-DD`).
pub fn format_day(date: NaiveDate) -> String {
	date.format("%Y-%m-%d").to_string()
}

pub fn from_epoch_seconds(secs: i64) -> Option<DateTime<Utc>> {
	Utc.timestamp_opt(secs, 0).single()
}

pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
	if millis <= DOTNET_MIN_MILLIS {
		return None;
	}
	Utc.timestamp_millis_opt(millis).single()
}

/// Decodes any of the portal's textual date encodings.
pub fn parse_vendor_date(raw: &str) -> Option<DateTime<Utc>> {
	let raw = raw.trim();
	if raw.is_empty() {
		return None;
	}

	if let Some(inner) = raw.strip_prefix("/Date(").and_then(|rest| rest.strip_suffix(")/")) {
		let digits_end = inner
			.char_indices()
			.find(|&(idx, ch)| !(ch.is_ascii_digit() || (idx == 0 && ch == '-')))
			.map_or(inner.len(), |(idx, _)| idx);
		return inner[..digits_end].parse().ok().and_then(from_epoch_millis);
	}

	if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
		return Some(parsed.with_timezone(&Utc));
	}

	let offset = portal_offset();
	let naive = NAIVE_FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
		.or_else(|| {
			DATE_FORMATS
				.iter()
				.find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
				.and_then(|date| date.and_hms_opt(0, 0, 0))
		})?;
	offset.from_local_datetime(&naive).single().map(|local| local.with_timezone(&Utc))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
	Text(String),
	Millis(i64),
	Float(f64),
}

/// Serde adapter for optional vendor date fields.
///
/// Numbers are milliseconds, strings go through [`parse_vendor_date`].
/// Undecodable values become `None` rather than failing the whole record.
pub fn vendor_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<RawDate>::deserialize(deserializer)? {
		None => None,
		Some(RawDate::Text(text)) => parse_vendor_date(&text),
		Some(RawDate::Millis(millis)) => from_epoch_millis(millis),
		Some(RawDate::Float(millis)) => from_epoch_millis(millis as i64),
	})
}
