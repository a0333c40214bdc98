use chrono::{Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use vietstock_protocol::date::{format_day, portal_today};
use vietstock_protocol::params::{ALL_CATEGORIES, DEFAULT_EVENT_TYPES};
use vietstock_protocol::{BondRelated, CompanyEvent, CompanyRelation, Document, DocumentType, IndustryEvent, OrderDir, TransferEvent};

use super::{Form, VietstockClient, first_group};
use crate::error::Result;

const DEFAULT_TRANSFER_SPAN: Duration = Duration::days(90);

/// Filters for insider and major-holder transfer filings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferQuery {
	pub symbol: String,
	/// Defaults to 90 days before `to`.
	pub from: Option<NaiveDate>,
	/// Defaults to today in portal time.
	pub to: Option<NaiveDate>,
	pub page: u32,
	pub page_size: u32,
	pub order_by: String,
	pub order_dir: OrderDir,
	/// `None` asks for every transfer type.
	pub transfer_type: Option<i32>,
}

impl TransferQuery {
	pub fn new(symbol: impl Into<String>) -> Self {
		Self {
			symbol: symbol.into(),
			from: None,
			to: None,
			page: 1,
			page_size: 20,
			order_by: "EventID".to_string(),
			order_dir: OrderDir::Desc,
			transfer_type: None,
		}
	}
}

/// Filters for the corporate event calendars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
	pub symbol: String,
	pub from: Option<NaiveDate>,
	pub to: Option<NaiveDate>,
	pub page: u32,
	pub page_size: u32,
	pub order_by: String,
	pub order_dir: OrderDir,
	/// One request is made per type; results are concatenated in this order.
	pub event_types: Vec<i32>,
}

impl EventQuery {
	pub fn new(symbol: impl Into<String>) -> Self {
		Self {
			symbol: symbol.into(),
			from: None,
			to: None,
			page: 1,
			page_size: 5,
			order_by: "Date1".to_string(),
			order_dir: OrderDir::Desc,
			event_types: DEFAULT_EVENT_TYPES.to_vec(),
		}
	}

	fn form(&self, event_type: i32) -> Form {
		Form::new()
			.field("eventTypeID", event_type)
			.field("channelID", 0)
			.field("code", &self.symbol)
			.field("catID", ALL_CATEGORIES)
			.field("fDate", self.from.map(format_day).unwrap_or_default())
			.field("tDate", self.to.map(format_day).unwrap_or_default())
			.field("page", self.page)
			.field("pageSize", self.page_size)
			.field("orderBy", &self.order_by)
			.field("orderDir", self.order_dir.as_str())
	}
}

impl VietstockClient {
	/// Companies the portal lists as related to `symbol`.
	pub async fn company_relations(&self, symbol: &str, page: u32, page_size: u32) -> Result<Vec<CompanyRelation>> {
		let form = Form::new().field("Code", symbol).field("Page", page).field("PageSize", page_size);
		self.post("/company/GetCompanyRelationFilter", form).await
	}

	/// Published filings, optionally narrowed to one document type.
	pub async fn documents(&self, symbol: &str, page: u32, document_type: Option<DocumentType>) -> Result<Vec<Document>> {
		let mut form = Form::new().field("code", symbol).field("page", page);
		if let Some(document_type) = document_type {
			form = form.field("type", document_type.id());
		}
		self.post("/data/getdocument", form).await
	}

	pub async fn transfer_events(&self, query: &TransferQuery) -> Result<Vec<TransferEvent>> {
		let to = query.to.unwrap_or_else(portal_today);
		let from = query.from.unwrap_or(to - DEFAULT_TRANSFER_SPAN);
		let form = Form::new()
			.field("transferTypeID", query.transfer_type.unwrap_or(ALL_CATEGORIES))
			.field("stockCode", &query.symbol)
			.field("fDate", format_day(from))
			.field("tDate", format_day(to))
			.field("page", query.page)
			.field("pageSize", query.page_size)
			.field("orderBy", &query.order_by)
			.field("orderDir", query.order_dir.as_str());
		self.post("/data/eventstransferdata", form).await
	}

	/// Bonds issued by or linked to `symbol`, ordered by release date.
	pub async fn bonds(&self, symbol: &str, order_dir: OrderDir, page: u32, page_size: u32) -> Result<Vec<BondRelated>> {
		let form = Form::new()
			.field("code", symbol)
			.field("orderBy", "ReleaseDate")
			.field("orderDir", order_dir.as_str())
			.field("page", page)
			.field("pageSize", page_size);
		self.post("/Data/GetBondRelated", form).await
	}

	/// Events of `query.symbol`, across every requested event type.
	pub async fn events_by_type(&self, query: &EventQuery) -> Result<Vec<CompanyEvent>> {
		self.collect_events("/data/eventstypedata", query).await
	}

	/// Events of companies in the same industry as `query.symbol`.
	pub async fn events_same_industry(&self, query: &EventQuery) -> Result<Vec<IndustryEvent>> {
		self.collect_events("/data/eventstypedatasameindustry", query).await
	}

	async fn collect_events<T: DeserializeOwned>(&self, path: &str, query: &EventQuery) -> Result<Vec<T>> {
		let mut events = Vec::new();
		for &event_type in &query.event_types {
			let reply: Value = self.post(path, query.form(event_type)).await?;
			let rows: Vec<T> = first_group(path, reply)?;
			debug!(target = "vietstock.client", endpoint = path, event_type, rows = rows.len(), "events page");
			events.extend(rows);
		}
		Ok(events)
	}
}
