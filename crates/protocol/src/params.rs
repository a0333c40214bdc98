//! Request parameter vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Candle resolution for `tvnew/history`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
	#[serde(rename = "1")]
	OneMinute,
	#[serde(rename = "3")]
	ThreeMinutes,
	#[serde(rename = "5")]
	FiveMinutes,
	#[serde(rename = "15")]
	FifteenMinutes,
	#[serde(rename = "30")]
	ThirtyMinutes,
	#[serde(rename = "45")]
	FortyFiveMinutes,
	#[serde(rename = "60")]
	OneHour,
	#[default]
	#[serde(rename = "1D")]
	OneDay,
	#[serde(rename = "1W")]
	OneWeek,
	#[serde(rename = "1M")]
	OneMonth,
}

impl Resolution {
	pub fn as_str(self) -> &'static str {
		match self {
			Resolution::OneMinute => "1",
			Resolution::ThreeMinutes => "3",
			Resolution::FiveMinutes => "5",
			Resolution::FifteenMinutes => "15",
			Resolution::ThirtyMinutes => "30",
			Resolution::FortyFiveMinutes => "45",
			Resolution::OneHour => "60",
			Resolution::OneDay => "1D",
			Resolution::OneWeek => "1W",
			Resolution::OneMonth => "1M",
		}
	}
}

impl fmt::Display for Resolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Resolution {
	type Err = String;

	/// Accepts the wire values plus the shorthand `5m`, `1h`, `1d`, `1w`.
	/// Upper-case `M` is months, lower-case `m` is minutes.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		let normalized = match trimmed.strip_suffix('m') {
			Some(minutes) => minutes.to_string(),
			None => match trimmed {
				"1h" | "1H" => "60".to_string(),
				"1d" => "1D".to_string(),
				"1w" => "1W".to_string(),
				other => other.to_string(),
			},
		};
		match normalized.as_str() {
			"1" => Ok(Resolution::OneMinute),
			"3" => Ok(Resolution::ThreeMinutes),
			"5" => Ok(Resolution::FiveMinutes),
			"15" => Ok(Resolution::FifteenMinutes),
			"30" => Ok(Resolution::ThirtyMinutes),
			"45" => Ok(Resolution::FortyFiveMinutes),
			"60" => Ok(Resolution::OneHour),
			"1D" | "D" => Ok(Resolution::OneDay),
			"1W" | "W" => Ok(Resolution::OneWeek),
			"1M" | "M" => Ok(Resolution::OneMonth),
			_ => Err(format!("unknown resolution: {s}")),
		}
	}
}

/// Aggregation window for `StatisticByPeriod`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
	#[serde(rename = "D")]
	Day,
	#[default]
	#[serde(rename = "W")]
	Week,
	#[serde(rename = "M")]
	Month,
	#[serde(rename = "Q")]
	Quarter,
	#[serde(rename = "Y")]
	Year,
}

impl Period {
	pub fn as_str(self) -> &'static str {
		match self {
			Period::Day => "D",
			Period::Week => "W",
			Period::Month => "M",
			Period::Quarter => "Q",
			Period::Year => "Y",
		}
	}
}

impl FromStr for Period {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"D" | "DAY" => Ok(Period::Day),
			"W" | "WEEK" => Ok(Period::Week),
			"M" | "MONTH" => Ok(Period::Month),
			"Q" | "QUARTER" => Ok(Period::Quarter),
			"Y" | "YEAR" => Ok(Period::Year),
			_ => Err(format!("unknown period: {s}")),
		}
	}
}

/// Company document categories (`getdocument` `type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
	FinancialStatement,
	AnnualReport,
	Prospectus,
	ShareholderResolution,
	ShareholdersMeeting,
	Regulations,
	FinancialStatementExplanation,
	CorporateGovernance,
	LiquidityRatio,
	BoardOfManagement,
}

impl DocumentType {
	pub fn id(self) -> u32 {
		match self {
			DocumentType::FinancialStatement => 1,
			DocumentType::AnnualReport => 2,
			DocumentType::Prospectus => 3,
			DocumentType::ShareholderResolution => 4,
			DocumentType::ShareholdersMeeting => 5,
			DocumentType::Regulations => 6,
			DocumentType::FinancialStatementExplanation => 8,
			DocumentType::CorporateGovernance => 9,
			DocumentType::LiquidityRatio => 10,
			DocumentType::BoardOfManagement => 23,
		}
	}
}

impl FromStr for DocumentType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let kind = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
			"financial_statement" | "1" => DocumentType::FinancialStatement,
			"annual_report" | "2" => DocumentType::AnnualReport,
			"prospectus" | "3" => DocumentType::Prospectus,
			"shareholder_resolution" | "4" => DocumentType::ShareholderResolution,
			"shareholders_meeting" | "5" => DocumentType::ShareholdersMeeting,
			"regulations" | "6" => DocumentType::Regulations,
			"financial_statement_explanation" | "8" => DocumentType::FinancialStatementExplanation,
			"corporate_governance" | "9" => DocumentType::CorporateGovernance,
			"liquidity_ratio" | "10" => DocumentType::LiquidityRatio,
			"board_of_management" | "23" => DocumentType::BoardOfManagement,
			_ => return Err(format!("unknown document type: {s}")),
		};
		Ok(kind)
	}
}

/// Reporting cadence for financial statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancialPeriod {
	#[default]
	#[serde(rename = "QUY")]
	Quarterly,
	#[serde(rename = "NAM")]
	Yearly,
}

impl FinancialPeriod {
	pub fn as_str(self) -> &'static str {
		match self {
			FinancialPeriod::Quarterly => "QUY",
			FinancialPeriod::Yearly => "NAM",
		}
	}
}

impl FromStr for FinancialPeriod {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"QUY" | "Q" | "QUARTER" | "QUARTERLY" => Ok(FinancialPeriod::Quarterly),
			"NAM" | "Y" | "YEAR" | "YEARLY" => Ok(FinancialPeriod::Yearly),
			_ => Err(format!("unknown financial period: {s}")),
		}
	}
}

/// Financial report families, each with its own norm and period endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialReportType {
	FinancialSummary,
	BalanceSheet,
	IncomeStatement,
	CashFlowStatement,
	FinancialRatios,
	FinancialPlan,
}

impl FinancialReportType {
	/// Path of the endpoint listing the report's line items.
	pub fn norm_path(self) -> &'static str {
		match self {
			FinancialReportType::FinancialSummary => "/data/GetListReportNorm_BCTT_ByStockCode",
			FinancialReportType::BalanceSheet => "/data/GetListReportNormByStockCode",
			FinancialReportType::IncomeStatement => "/data/GetListReportNorm_KQKD_ByStockCode",
			FinancialReportType::CashFlowStatement => "/data/GetListReportNorm_LCTT_ByStockCode",
			FinancialReportType::FinancialRatios => "/data/GetListReportNorm_CSTC_ByStockCode",
			FinancialReportType::FinancialPlan => "/data/GetListReportNorm_CTKH",
		}
	}

	/// Path of the endpoint listing the report's available periods.
	pub fn period_path(self) -> &'static str {
		match self {
			FinancialReportType::FinancialSummary => "/data/BCTT_GetListReportData",
			FinancialReportType::BalanceSheet => "/data/CDKT_GetListReportData",
			FinancialReportType::IncomeStatement => "/data/KQKD_GetListReportData",
			FinancialReportType::CashFlowStatement => "/data/LCTT_GetListReportData_Quarter_VSTTinh",
			FinancialReportType::FinancialRatios => "/data/CSTC_GetListTerms",
			FinancialReportType::FinancialPlan => "/data/CTKH_GetListYearPeriods",
		}
	}
}

impl FromStr for FinancialReportType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let kind = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
			"financial_summary" | "bctt" => FinancialReportType::FinancialSummary,
			"balance_sheet" | "cdkt" => FinancialReportType::BalanceSheet,
			"income_statement" | "kqkd" => FinancialReportType::IncomeStatement,
			"cash_flow_statement" | "cash_flow" | "lctt" => FinancialReportType::CashFlowStatement,
			"financial_ratios" | "cstc" => FinancialReportType::FinancialRatios,
			"financial_plan" | "ctkh" => FinancialReportType::FinancialPlan,
			_ => return Err(format!("unknown report type: {s}")),
		};
		Ok(kind)
	}
}

/// Sort direction for paged listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDir {
	Asc,
	#[default]
	Desc,
}

impl OrderDir {
	pub fn as_str(self) -> &'static str {
		match self {
			OrderDir::Asc => "ASC",
			OrderDir::Desc => "DESC",
		}
	}
}

impl FromStr for OrderDir {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"ASC" => Ok(OrderDir::Asc),
			"DESC" => Ok(OrderDir::Desc),
			_ => Err(format!("unknown order direction: {s}")),
		}
	}
}

/// Portal-wide "any" sentinel for category filters.
pub const ALL_CATEGORIES: i32 = -1;

/// Event categories queried by the event calendars.
pub const DEFAULT_EVENT_TYPES: &[i32] = &[1, 2, 3, 4, 5];

/// News categories requested by `getnewsbycode`.
pub const NEWS_BY_CODE_TYPES: &[i32] = &[-1, 3, 4, 5, 6, 7];
