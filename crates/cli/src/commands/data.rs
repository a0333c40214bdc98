use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::{Value, json};
use vietstock::{EventQuery, TransferQuery, VietstockClient};
use vietstock_protocol::date::portal_offset;
use vietstock_protocol::params::DEFAULT_EVENT_TYPES;

use super::records;
use crate::cli::{Commands, EventArgs, HistoryArgs};
use crate::output::{CommandInputs, ResultBuilder};

pub(super) async fn history(client: &VietstockClient, args: HistoryArgs) -> Result<ResultBuilder<Value>> {
	let from = args.from.map(portal_day_start).transpose()?;
	let to = args.to.map(portal_day_end).transpose()?;
	let bars = client
		.historical_data(&args.symbol, args.resolution, from, to)
		.await
		.with_context(|| format!("fetching {} history for {}", args.resolution, args.symbol))?;
	let inputs = CommandInputs::symbol(&args.symbol).with_extra(json!({
		"resolution": args.resolution.as_str(),
		"from": from,
		"to": to,
	}));
	records("history", Some(inputs), bars)
}

/// Runs one authenticated data command.
pub(super) async fn run(client: &VietstockClient, command: Commands) -> Result<ResultBuilder<Value>> {
	let name = command.name();
	let fetching = |symbol: &str| format!("fetching {name} for {symbol}");

	match command {
		Commands::TradingInfo(args) => {
			let info = client.trading_info(&args.symbol).await.with_context(|| fetching(&args.symbol))?;
			records(name, Some(CommandInputs::symbol(&args.symbol)), info)
		}
		Commands::MarketPrices => {
			let prices = client.market_prices().await.context("fetching market prices")?;
			records(name, None, prices)
		}
		Commands::Deals(args) => {
			let deals = client.stock_deals(&args.symbol).await.with_context(|| fetching(&args.symbol))?;
			records(name, Some(CommandInputs::symbol(&args.symbol)), deals)
		}
		Commands::Stats(args) => {
			let stats = match args.period {
				Some(period) => client.statistics_by_period(&args.symbol, period).await,
				None => client.statistics_by_date_range(&args.symbol, args.from, args.to).await,
			}
			.with_context(|| fetching(&args.symbol))?;
			let inputs = CommandInputs::symbol(&args.symbol).with_extra(json!({
				"period": args.period.map(|period| period.as_str()),
				"from": args.from,
				"to": args.to,
			}));
			records(name, Some(inputs), stats)
		}
		Commands::Relations(args) => {
			let relations = client
				.company_relations(&args.symbol, args.page, args.page_size)
				.await
				.with_context(|| fetching(&args.symbol))?;
			records(name, Some(paged(&args.symbol, args.page, args.page_size)), relations)
		}
		Commands::Documents(args) => {
			let documents = client
				.documents(&args.symbol, args.page, args.document_type)
				.await
				.with_context(|| fetching(&args.symbol))?;
			let inputs = CommandInputs::symbol(&args.symbol).with_extra(json!({
				"page": args.page,
				"type": args.document_type.map(|kind| kind.id()),
			}));
			records(name, Some(inputs), documents)
		}
		Commands::HeaderNews { page_size } => {
			let news = client.header_news(page_size).await.context("fetching header news")?;
			records(name, Some(CommandInputs::default().with_extra(json!({ "pageSize": page_size }))), news)
		}
		Commands::Transfers(args) => {
			let query = TransferQuery {
				from: args.from,
				to: args.to,
				page: args.page,
				page_size: args.page_size,
				order_dir: args.order_dir,
				transfer_type: args.transfer_type,
				..TransferQuery::new(&args.symbol)
			};
			let transfers = client.transfer_events(&query).await.with_context(|| fetching(&args.symbol))?;
			records(name, Some(paged(&args.symbol, args.page, args.page_size)), transfers)
		}
		Commands::Bonds(args) => {
			let bonds = client
				.bonds(&args.symbol, args.order_dir, args.page, args.page_size)
				.await
				.with_context(|| fetching(&args.symbol))?;
			records(name, Some(paged(&args.symbol, args.page, args.page_size)), bonds)
		}
		Commands::News(args) => {
			let news = client
				.news_by_code(&args.symbol, args.page, args.page_size)
				.await
				.with_context(|| fetching(&args.symbol))?;
			records(name, Some(paged(&args.symbol, args.page, args.page_size)), news)
		}
		Commands::ChannelNews(args) => {
			let news = client
				.news_by_channel(&args.symbol, args.news_type, args.page, args.page_size)
				.await
				.with_context(|| fetching(&args.symbol))?;
			let inputs = paged(&args.symbol, args.page, args.page_size);
			records(name, Some(inputs), news)
		}
		Commands::Events(args) => {
			let query = event_query(&args);
			let events = client.events_by_type(&query).await.with_context(|| fetching(&args.symbol))?;
			records(name, Some(event_inputs(&query)), events)
		}
		Commands::IndustryEvents(args) => {
			let query = event_query(&args);
			let events = client.events_same_industry(&query).await.with_context(|| fetching(&args.symbol))?;
			records(name, Some(event_inputs(&query)), events)
		}
		Commands::IncomeStatement(args) => {
			let periods = client
				.income_statement(&args.symbol, args.period)
				.await
				.with_context(|| fetching(&args.symbol))?;
			let inputs = CommandInputs::symbol(&args.symbol).with_extra(json!({ "period": args.period.as_str() }));
			records(name, Some(inputs), periods)
		}
		Commands::ReportNorms(args) => {
			let norms = client
				.report_norms(args.report_type, args.symbol.as_deref())
				.await
				.with_context(|| format!("fetching {name} for {:?}", args.report_type))?;
			let inputs = CommandInputs {
				symbol: args.symbol.clone(),
				extra: None,
			};
			records(name, Some(inputs), norms)
		}
		Commands::ReportPeriods(args) => {
			let periods = client
				.report_periods(args.report_type, &args.symbol, args.period, args.fiscal_year)
				.await
				.with_context(|| fetching(&args.symbol))?;
			let inputs = CommandInputs::symbol(&args.symbol).with_extra(json!({
				"period": args.period.as_str(),
				"fiscalYear": args.fiscal_year,
			}));
			records(name, Some(inputs), periods)
		}
		Commands::Login { .. } | Commands::Logout | Commands::History(_) => bail!("{name} does not query the portal session"),
	}
}

fn paged(symbol: &str, page: u32, page_size: u32) -> CommandInputs {
	CommandInputs::symbol(symbol).with_extra(json!({ "page": page, "pageSize": page_size }))
}

fn event_query(args: &EventArgs) -> EventQuery {
	let event_types = if args.types.is_empty() {
		DEFAULT_EVENT_TYPES.to_vec()
	} else {
		args.types.clone()
	};
	EventQuery {
		from: args.from,
		to: args.to,
		page: args.page,
		page_size: args.page_size,
		order_dir: args.order_dir,
		event_types,
		..EventQuery::new(&args.symbol)
	}
}

fn event_inputs(query: &EventQuery) -> CommandInputs {
	CommandInputs::symbol(&query.symbol).with_extra(json!({
		"eventTypes": query.event_types,
		"page": query.page,
		"pageSize": query.page_size,
	}))
}

/// Midnight of `day` in portal time.
fn portal_day_start(day: NaiveDate) -> Result<DateTime<Utc>> {
	portal_instant(day, NaiveTime::MIN)
}

/// Last second of `day` in portal time.
fn portal_day_end(day: NaiveDate) -> Result<DateTime<Utc>> {
	let end = NaiveTime::from_hms_opt(23, 59, 59).context("invalid end-of-day time")?;
	portal_instant(day, end)
}

fn portal_instant(day: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
	day.and_time(time)
		.and_local_timezone(portal_offset())
		.single()
		.map(|instant| instant.with_timezone(&Utc))
		.with_context(|| format!("{day} has no single instant in portal time"))
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;

	use super::*;

	#[test]
	fn portal_days_are_utc_plus_seven() {
		let day = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
		assert_eq!(portal_day_start(day).unwrap(), Utc.with_ymd_and_hms(2024, 6, 16, 17, 0, 0).unwrap());
		assert_eq!(portal_day_end(day).unwrap(), Utc.with_ymd_and_hms(2024, 6, 17, 16, 59, 59).unwrap());
	}

	#[test]
	fn empty_type_list_uses_defaults() {
		let args = EventArgs {
			symbol: "FPT".into(),
			from: None,
			to: None,
			page: 2,
			page_size: 5,
			order_dir: vietstock_protocol::OrderDir::Asc,
			types: Vec::new(),
		};
		let query = event_query(&args);
		assert_eq!(query.event_types, DEFAULT_EVENT_TYPES);
		assert_eq!(query.page, 2);
		assert_eq!(query.order_by, "Date1");

		let query = event_query(&EventArgs { types: vec![3], ..args });
		assert_eq!(query.event_types, vec![3]);
	}
}
