
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use vietstock_protocol::{DocumentType, FinancialPeriod, FinancialReportType, OrderDir, Period, Resolution};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Command-line client for the Vietstock finance portal.
#[derive(Parser, Debug)]
#[command(name = "vietstock")]
#[command(about = "Vietstock finance portal client - acquire a session, query one endpoint")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	#[command(flatten)]
	pub global: GlobalArgs,

	#[command(subcommand)]
	pub command: Commands,
}

/// Settings shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
	/// JSON config file; missing keys keep their defaults
	#[arg(long, global = true, value_name = "FILE", env = "VIETSTOCK_CONFIG")]
	pub config: Option<PathBuf>,

	/// Session cache file (overrides `cachePath`)
	#[arg(long, global = true, value_name = "PATH")]
	pub cache: Option<PathBuf>,

	/// Show the browser window while acquiring a session
	#[arg(long, global = true)]
	pub headful: bool,

	/// Chrome/Chromium binary; auto-detected when omitted
	#[arg(long, global = true, value_name = "PATH", env = "VIETSTOCK_CHROME")]
	pub chrome: Option<PathBuf>,

	/// Portal account for form login
	#[arg(long, global = true, env = "VIETSTOCK_USERNAME", requires = "password")]
	pub username: Option<String>,

	#[arg(long, global = true, env = "VIETSTOCK_PASSWORD", hide_env_values = true, requires = "username")]
	pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Acquire a session and cache it.
	Login {
		/// Ignore the cached session and run the browser again
		#[arg(long)]
		refresh: bool,
	},
	/// Delete the cached session.
	Logout,
	/// OHLCV price history (anonymous).
	History(HistoryArgs),
	/// Current trading snapshot for a symbol.
	TradingInfo(SymbolArgs),
	/// Index snapshot of the whole market.
	MarketPrices,
	/// Intraday matched deals.
	Deals(SymbolArgs),
	/// Aggregated trading statistics.
	Stats(StatsArgs),
	/// Parent, subsidiary and associated companies.
	Relations(PagedArgs),
	/// Published company documents.
	Documents(DocumentArgs),
	/// Front-page headlines.
	HeaderNews {
		#[arg(long, default_value_t = 10)]
		page_size: u32,
	},
	/// Insider and major-shareholder transfers.
	Transfers(TransferArgs),
	/// Bonds issued by a company.
	Bonds(BondArgs),
	/// Articles tagged with a symbol.
	News(NewsArgs),
	/// Articles from one news channel.
	ChannelNews(ChannelNewsArgs),
	/// Corporate events for a symbol.
	Events(EventArgs),
	/// Corporate events across the symbol's industry.
	IndustryEvents(EventArgs),
	/// Income statement period headers.
	IncomeStatement(ReportArgs),
	/// Line item names of a financial report.
	ReportNorms(NormArgs),
	/// The five most recent periods a report has data for.
	ReportPeriods(PeriodArgs),
}

impl Commands {
	/// Name as typed on the command line.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Login { .. } => "login",
			Commands::Logout => "logout",
			Commands::History(_) => "history",
			Commands::TradingInfo(_) => "trading-info",
			Commands::MarketPrices => "market-prices",
			Commands::Deals(_) => "deals",
			Commands::Stats(_) => "stats",
			Commands::Relations(_) => "relations",
			Commands::Documents(_) => "documents",
			Commands::HeaderNews { .. } => "header-news",
			Commands::Transfers(_) => "transfers",
			Commands::Bonds(_) => "bonds",
			Commands::News(_) => "news",
			Commands::ChannelNews(_) => "channel-news",
			Commands::Events(_) => "events",
			Commands::IndustryEvents(_) => "industry-events",
			Commands::IncomeStatement(_) => "income-statement",
			Commands::ReportNorms(_) => "report-norms",
			Commands::ReportPeriods(_) => "report-periods",
		}
	}

	/// Whether the command needs an authenticated session.
	pub fn needs_session(&self) -> bool {
		!matches!(self, Commands::Logout | Commands::History(_))
	}
}

#[derive(Args, Debug, Clone)]
pub struct SymbolArgs {
	/// Ticker symbol (e.g. FPT)
	pub symbol: String,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
	pub symbol: String,

	/// Bar size: 1, 3, 5, 15, 30, 45, 60, 1D, 1W, 1M
	#[arg(short, long, default_value = "1D")]
	pub resolution: Resolution,

	/// First day (portal time); defaults to a year before --to
	#[arg(long, value_name = "YYYY-MM-DD")]
	pub from: Option<NaiveDate>,

	/// Last day (portal time); defaults to now
	#[arg(long, value_name = "YYYY-MM-DD")]
	pub to: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
	pub symbol: String,

	/// Aggregate by period (D, W, M, Q, Y) instead of a date range
	#[arg(long, conflicts_with_all = ["from", "to"])]
	pub period: Option<Period>,

	/// Defaults to a week before --to
	#[arg(long, value_name = "YYYY-MM-DD")]
	pub from: Option<NaiveDate>,

	/// Defaults to today
	#[arg(long, value_name = "YYYY-MM-DD")]
	pub to: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct PagedArgs {
	pub symbol: String,

	#[arg(long, default_value_t = 1)]
	pub page: u32,

	#[arg(long, default_value_t = 20)]
	pub page_size: u32,
}

#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
	pub symbol: String,

	#[arg(long, default_value_t = 1)]
	pub page: u32,

	/// Document category (e.g. annual_report, prospectus, or its numeric id)
	#[arg(long = "type", value_name = "TYPE")]
	pub document_type: Option<DocumentType>,
}

#[derive(Args, Debug, Clone)]
pub struct TransferArgs {
	pub symbol: String,

	/// Defaults to 90 days before --to
	#[arg(long, value_name = "YYYY-MM-DD")]
	pub from: Option<NaiveDate>,

	/// Defaults to today
	#[arg(long, value_name = "YYYY-MM-DD")]
	pub to: Option<NaiveDate>,

	#[arg(long, default_value_t = 1)]
	pub page: u32,

	#[arg(long, default_value_t = 20)]
	pub page_size: u32,

	#[arg(long, default_value = "DESC")]
	pub order_dir: OrderDir,

	/// Transfer category id; all categories when omitted
	#[arg(long, value_name = "ID", allow_negative_numbers = true)]
	pub transfer_type: Option<i32>,
}

#[derive(Args, Debug, Clone)]
pub struct BondArgs {
	pub symbol: String,

	#[arg(long, default_value = "DESC")]
	pub order_dir: OrderDir,

	#[arg(long, default_value_t = 1)]
	pub page: u32,

	#[arg(long, default_value_t = 20)]
	pub page_size: u32,
}

#[derive(Args, Debug, Clone)]
pub struct NewsArgs {
	pub symbol: String,

	#[arg(long, default_value_t = 1)]
	pub page: u32,

	#[arg(long, default_value_t = 5)]
	pub page_size: u32,
}

#[derive(Args, Debug, Clone)]
pub struct ChannelNewsArgs {
	pub symbol: String,

	/// Channel id
	#[arg(long = "type", value_name = "ID", default_value_t = 1, allow_negative_numbers = true)]
	pub news_type: i32,

	#[arg(long, default_value_t = 1)]
	pub page: u32,

	#[arg(long, default_value_t = 10)]
	pub page_size: u32,
}

#[derive(Args, Debug, Clone)]
pub struct EventArgs {
	pub symbol: String,

	#[arg(long, value_name = "YYYY-MM-DD")]
	pub from: Option<NaiveDate>,

	#[arg(long, value_name = "YYYY-MM-DD")]
	pub to: Option<NaiveDate>,

	#[arg(long, default_value_t = 1)]
	pub page: u32,

	#[arg(long, default_value_t = 5)]
	pub page_size: u32,

	#[arg(long, default_value = "DESC")]
	pub order_dir: OrderDir,

	/// Event categories to query, comma separated (default 1,2,3,4,5)
	#[arg(long, value_delimiter = ',', value_name = "IDS")]
	pub types: Vec<i32>,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
	pub symbol: String,

	/// QUY (quarterly) or NAM (yearly)
	#[arg(long, default_value = "QUY")]
	pub period: FinancialPeriod,
}

#[derive(Args, Debug, Clone)]
pub struct NormArgs {
	/// balance_sheet, income_statement, cash_flow, financial_ratios, financial_summary, financial_plan
	pub report_type: FinancialReportType,

	/// Restrict line items to those the symbol reports
	#[arg(long)]
	pub symbol: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
	pub report_type: FinancialReportType,

	pub symbol: String,

	#[arg(long, default_value = "QUY")]
	pub period: FinancialPeriod,

	/// Use fiscal rather than calendar years
	#[arg(long)]
	pub fiscal_year: bool,
}
