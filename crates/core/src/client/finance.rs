use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::error;
use vietstock_protocol::{DataEnvelope, FinancialPeriod, FinancialReportType, ReportPeriod, ReportPeriodInfo};

use super::{Form, VietstockClient};
use crate::error::{Error, Result};

/// Outline numbering such as `1.` or `12.` in norm names.
static NORM_NUMBERING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.").expect("NORM_NUMBERING should compile"));

/// Figures are requested in billions of VND.
const REPORT_UNIT: u64 = 1_000_000_000;
const RECENT_PERIODS: usize = 5;

impl VietstockClient {
	/// Income statement period headers for `symbol`, oldest first.
	pub async fn income_statement(&self, symbol: &str, period: FinancialPeriod) -> Result<Vec<ReportPeriodInfo>> {
		let path = FinancialReportType::IncomeStatement.period_path();
		let form = report_form("StockCode", symbol, period, false);
		let envelope = self.envelope(path, form).await?;
		decoded(path, envelope.report_periods())
	}

	/// Line items of `report_type`, keyed by norm id, with outline numbering removed.
	pub async fn report_norms(&self, report_type: FinancialReportType, symbol: Option<&str>) -> Result<BTreeMap<i64, String>> {
		let path = report_type.norm_path();
		let mut form = Form::new();
		if let Some(symbol) = symbol {
			form = form.field("stockCode", symbol);
		}
		let envelope = self.envelope(path, form).await?;
		let norms = decoded(path, envelope.report_norms())?;
		Ok(norms
			.into_iter()
			.map(|norm| (norm.id, clean_norm_name(&norm.name)))
			.collect())
	}

	/// The five most recent periods `report_type` has data for.
	///
	/// `fiscal_year` selects fiscal rather than calendar years.
	pub async fn report_periods(&self, report_type: FinancialReportType, symbol: &str, period: FinancialPeriod, fiscal_year: bool) -> Result<Vec<ReportPeriod>> {
		let path = report_type.period_path();
		let form = report_form("stockCode", symbol, period, !fiscal_year);
		let envelope = self.envelope(path, form).await?;
		let rows = decoded(path, envelope.report_periods())?;
		let skip = rows.len().saturating_sub(RECENT_PERIODS);
		Ok(rows[skip..].iter().filter_map(ReportPeriodInfo::period).collect())
	}

	async fn envelope(&self, path: &str, form: Form) -> Result<DataEnvelope> {
		let envelope: DataEnvelope = self.post(path, form).await?;
		match &envelope.error {
			Some(reported) if !reported.is_null() => {
				error!(target = "vietstock.client", endpoint = path, error = %reported, "portal reported an error");
				Err(Error::UnexpectedResponse {
					endpoint: path.to_string(),
					message: reported.to_string(),
				})
			}
			_ => Ok(envelope),
		}
	}
}

fn report_form(code_field: &str, symbol: &str, period: FinancialPeriod, calendar_year: bool) -> Form {
	Form::new()
		.field(code_field, symbol)
		.field("UnitedId", -1)
		.field("AuditedStatusId", -1)
		.field("Unit", REPORT_UNIT)
		.field("IsNamDuongLich", calendar_year)
		.field("PeriodType", period.as_str())
		.field("SortTimeType", "Time_ASC")
}

fn decoded<T>(path: &str, rows: std::result::Result<T, serde_json::Error>) -> Result<T> {
	rows.map_err(|source| Error::Decode {
		endpoint: path.to_string(),
		source,
	})
}

fn clean_norm_name(name: &str) -> String {
	NORM_NUMBERING.replace_all(name, "").trim().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn norm_numbering_is_stripped() {
		assert_eq!(clean_norm_name("1. Tiền và tương đương tiền"), "Tiền và tương đương tiền");
		assert_eq!(clean_norm_name("  12.Doanh thu thuần "), "Doanh thu thuần");
		assert_eq!(clean_norm_name("Lợi nhuận"), "Lợi nhuận");
	}

	#[test]
	fn income_statement_form_uses_calendar_flag() {
		let pairs = report_form("StockCode", "FPT", FinancialPeriod::Yearly, false).into_pairs();
		assert!(pairs.contains(&("IsNamDuongLich".to_string(), "false".to_string())));
		assert!(pairs.contains(&("PeriodType".to_string(), "NAM".to_string())));
		assert!(pairs.contains(&("Unit".to_string(), "1000000000".to_string())));
	}
}
