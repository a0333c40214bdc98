use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;
use vietstock_protocol::date::{format_day, portal_today};
use vietstock_protocol::{HistoricalBar, HistoryReply, MarketPrice, Period, PeriodStatistics, Resolution, StatisticsByDateReply, StockDeal, TradingInfo};

use super::{Form, HistoryKey, VietstockClient};
use crate::error::Result;

/// History window used when no start is given.
const DEFAULT_HISTORY_SPAN: Duration = Duration::days(365);
const DEFAULT_STATISTICS_SPAN: Duration = Duration::days(7);

impl VietstockClient {
	/// OHLCV bars from the public chart API.
	///
	/// `to` defaults to now and `from` to a year before `to`. Identical
	/// requests within the memo TTL are answered from memory.
	pub async fn historical_data(&self, symbol: &str, resolution: Resolution, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<Vec<HistoricalBar>> {
		let to = to.unwrap_or_else(Utc::now);
		let from = from.unwrap_or(to - DEFAULT_HISTORY_SPAN);
		let key = HistoryKey {
			symbol: symbol.to_string(),
			resolution,
			from: from.timestamp(),
			to: to.timestamp(),
		};
		if let Some(bars) = self.history.get(&key) {
			debug!(target = "vietstock.client", symbol, %resolution, "history served from memo");
			return Ok(bars);
		}

		let query = [
			("symbol", symbol.to_string()),
			("resolution", resolution.as_str().to_string()),
			("from", key.from.to_string()),
			("to", key.to.to_string()),
		];
		let reply: HistoryReply = self.get_anonymous("/tvnew/history", &query).await?;
		let bars = reply.into_bars();
		self.history.insert(key, bars.clone());
		Ok(bars)
	}

	pub async fn trading_info(&self, symbol: &str) -> Result<Option<TradingInfo>> {
		let form = Form::new().field("code", symbol).field("s", 1);
		self.post("/company/tradinginfo", form).await
	}

	/// Indices, futures and commodities shown in the portal's ticker bar.
	pub async fn market_prices(&self) -> Result<Vec<MarketPrice>> {
		self.post("/data/getmarketprice", Form::new()).await
	}

	/// Matched deals of the current trading day.
	pub async fn stock_deals(&self, symbol: &str) -> Result<Vec<StockDeal>> {
		let form = Form::new().field("code", symbol).field("seq", 0);
		self.post("/data/getstockdealdetail", form).await
	}

	/// Price and volume statistics between two days, the last week by default.
	///
	/// The portal only serves ranges within the past year.
	pub async fn statistics_by_date_range(&self, symbol: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Option<PeriodStatistics>> {
		let to = to.unwrap_or_else(portal_today);
		let from = from.unwrap_or(to - DEFAULT_STATISTICS_SPAN);
		let form = Form::new()
			.field("code", symbol)
			.field("fromDate", format_day(from))
			.field("toDate", format_day(to));
		let reply: Option<StatisticsByDateReply> = self.post("/data/StatisticByDate", form).await?;
		Ok(reply.and_then(|reply| reply.data.into_iter().next()))
	}

	pub async fn statistics_by_period(&self, symbol: &str, period: Period) -> Result<Option<PeriodStatistics>> {
		let form = Form::new().field("code", symbol).field("type", period.as_str());
		let rows: Option<Vec<PeriodStatistics>> = self.post("/data/StatisticByPeriod", form).await?;
		Ok(rows.and_then(|rows| rows.into_iter().next()))
	}
}
