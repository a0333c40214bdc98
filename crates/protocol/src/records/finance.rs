//! Financial statement metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de;

/// Reporting period header from `*_GetListReportData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportPeriodInfo {
	#[serde(rename(deserialize = "RowNumber"))]
	pub row_number: Option<i64>,
	#[serde(rename(deserialize = "ReportDataID"))]
	pub report_data_id: Option<i64>,
	#[serde(rename(deserialize = "YearPeriod"))]
	pub year_period: Option<i64>,
	#[serde(rename(deserialize = "ReportTermID"))]
	pub report_term_id: Option<i64>,
	#[serde(rename(deserialize = "YKienKiemToan"), deserialize_with = "de::text")]
	pub audit_opinion: Option<String>,
	#[serde(rename(deserialize = "CtyKiemToan"), deserialize_with = "de::text")]
	pub audit_firm: Option<String>,
	#[serde(rename(deserialize = "IsUnited"), deserialize_with = "de::flag")]
	pub is_united: Option<bool>,
	#[serde(rename(deserialize = "UnitedName"), deserialize_with = "de::text")]
	pub united_name: Option<String>,
	#[serde(rename(deserialize = "AuditStatusID"))]
	pub audit_status_id: Option<i64>,
	#[serde(rename(deserialize = "AuditStatusName"), deserialize_with = "de::text")]
	pub audit_status_name: Option<String>,
	#[serde(rename(deserialize = "PeriodBegin"), deserialize_with = "de::text")]
	pub period_begin: Option<String>,
	#[serde(rename(deserialize = "PeriodEnd"), deserialize_with = "de::text")]
	pub period_end: Option<String>,
	#[serde(rename(deserialize = "BasePeriodBegin"), deserialize_with = "de::text")]
	pub base_period_begin: Option<String>,
	#[serde(rename(deserialize = "BasePeriodEnd"), deserialize_with = "de::text")]
	pub base_period_end: Option<String>,
	#[serde(rename(deserialize = "IsShowData_Permission"), deserialize_with = "de::flag")]
	pub show_data_permitted: Option<bool>,
}

impl ReportPeriodInfo {
	/// Year/quarter pair; quarter is 0 for yearly reports.
	pub fn period(&self) -> Option<ReportPeriod> {
		Some(ReportPeriod {
			year: self.year_period?,
			quarter: self.report_term_id.unwrap_or(1) - 1,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
	pub year: i64,
	pub quarter: i64,
}

/// Line item of a report template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportNorm {
	#[serde(rename = "ReportNormId")]
	pub id: i64,
	#[serde(rename = "ReportNormName")]
	pub name: String,
}

/// `{"data": ..., "error": ...}` wrapper used by the financial endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataEnvelope {
	pub data: Value,
	pub error: Option<Value>,
}

impl DataEnvelope {
	/// Report norms arrive either as a list or grouped under arbitrary keys.
	pub fn report_norms(&self) -> Result<Vec<ReportNorm>, serde_json::Error> {
		let mut rows = Vec::new();
		match &self.data {
			Value::Array(items) => rows.extend(items.iter().cloned()),
			Value::Object(groups) => {
				for value in groups.values() {
					match value {
						Value::Array(items) => rows.extend(items.iter().cloned()),
						other => rows.push(other.clone()),
					}
				}
			}
			_ => {}
		}
		rows.into_iter().map(serde_json::from_value).collect()
	}

	/// Period rows, either as a flat list or nested under `data[0].data`.
	pub fn report_periods(&self) -> Result<Vec<ReportPeriodInfo>, serde_json::Error> {
		let rows = match &self.data {
			Value::Array(items) => match items.first().and_then(|first| first.get("data")) {
				Some(Value::Array(nested)) => nested.clone(),
				_ => items.clone(),
			},
			_ => Vec::new(),
		};
		rows.into_iter().map(serde_json::from_value).collect()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn nested_report_rows() {
		let envelope: DataEnvelope = serde_json::from_value(json!({
			"data": [{ "data": [
				{ "RowNumber": 1, "YearPeriod": 2023, "ReportTermID": 5, "IsUnited": 1, "CtyKiemToan": "KPMG" },
				{ "RowNumber": 2, "YearPeriod": 2024, "ReportTermID": 2, "IsShowData_Permission": true },
			]}]
		}))
		.unwrap();

		let rows = envelope.report_periods().unwrap();
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].audit_firm.as_deref(), Some("KPMG"));
		assert_eq!(rows[0].is_united, Some(true));
		assert_eq!(rows[1].period(), Some(ReportPeriod { year: 2024, quarter: 1 }));
	}

	#[test]
	fn flat_report_rows() {
		let envelope: DataEnvelope = serde_json::from_value(json!({ "data": [{ "YearPeriod": 2022, "ReportTermID": 1 }] })).unwrap();
		let rows = envelope.report_periods().unwrap();
		assert_eq!(rows[0].period(), Some(ReportPeriod { year: 2022, quarter: 0 }));
	}

	#[test]
	fn grouped_norms_flatten() {
		let envelope: DataEnvelope = serde_json::from_value(json!({
			"data": {
				"assets": [{ "ReportNormId": 2, "ReportNormName": "1. Tiền" }],
				"single": { "ReportNormId": 3, "ReportNormName": "Nợ" },
			}
		}))
		.unwrap();
		let mut norms = envelope.report_norms().unwrap();
		norms.sort_by_key(|n| n.id);
		assert_eq!(norms.len(), 2);
		assert_eq!(norms[0].name, "1. Tiền");
	}
}
