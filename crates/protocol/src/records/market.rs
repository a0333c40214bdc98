//! Prices, quotes and trading statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::{from_epoch_seconds, vendor_date};
use crate::de;

/// Column-oriented reply of `tvnew/history` (TradingView UDF shape).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryReply {
	/// `ok` or `no_data`.
	pub s: Option<String>,
	pub t: Vec<i64>,
	pub o: Vec<f64>,
	pub h: Vec<f64>,
	pub l: Vec<f64>,
	pub c: Vec<f64>,
	pub v: Vec<f64>,
}

impl HistoryReply {
	/// Zips the columns into bars, truncating to the shortest column.
	pub fn into_bars(self) -> Vec<HistoricalBar> {
		let HistoryReply { t, o, h, l, c, v, .. } = self;
		t.into_iter()
			.zip(o)
			.zip(h)
			.zip(l)
			.zip(c)
			.zip(v)
			.filter_map(|(((((t, open), high), low), close), volume)| {
				Some(HistoricalBar {
					time: from_epoch_seconds(t)?,
					open,
					high,
					low,
					close,
					volume,
				})
			})
			.collect()
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
	pub time: DateTime<Utc>,
	pub open: f64,
	pub high: f64,
	pub low: f64,
	pub close: f64,
	pub volume: f64,
}

/// Snapshot from `company/tradinginfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingInfo {
	#[serde(rename(deserialize = "TradingDate"), deserialize_with = "vendor_date")]
	pub time: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "StockCode"))]
	pub symbol: String,
	/// Listed shares (KLCPLH).
	#[serde(rename(deserialize = "KLCPLH"))]
	pub listed_shares: Option<f64>,
	/// Outstanding shares (KLCPNY).
	#[serde(rename(deserialize = "KLCPNY"))]
	pub outstanding_shares: Option<f64>,
	#[serde(rename(deserialize = "PriorClosePrice"))]
	pub prior_close_price: Option<f64>,
	#[serde(rename(deserialize = "CeilingPrice"))]
	pub ceiling_price: Option<f64>,
	#[serde(rename(deserialize = "FloorPrice"))]
	pub floor_price: Option<f64>,
	#[serde(rename(deserialize = "TotalVol"))]
	pub total_vol: Option<f64>,
	#[serde(rename(deserialize = "TotalVal"))]
	pub total_val: Option<f64>,
	#[serde(rename(deserialize = "MarketCapital"))]
	pub market_capital: Option<f64>,
	#[serde(rename(deserialize = "HighestPrice"))]
	pub highest_price: Option<f64>,
	#[serde(rename(deserialize = "LowestPrice"))]
	pub lowest_price: Option<f64>,
	#[serde(rename(deserialize = "OpenPrice"))]
	pub open_price: Option<f64>,
	#[serde(rename(deserialize = "LastPrice"))]
	pub last_price: Option<f64>,
	#[serde(rename(deserialize = "AvrPrice"))]
	pub avg_price: Option<f64>,
	#[serde(rename(deserialize = "Change"))]
	pub change: Option<f64>,
	#[serde(rename(deserialize = "PerChange"))]
	pub per_change: Option<f64>,
	#[serde(rename(deserialize = "Min52W"))]
	pub min_52w: Option<f64>,
	#[serde(rename(deserialize = "Max52W"))]
	pub max_52w: Option<f64>,
	#[serde(rename(deserialize = "Vol52W"))]
	pub vol_52w: Option<f64>,
	#[serde(rename(deserialize = "OutstandingBuy"))]
	pub outstanding_buy: Option<f64>,
	#[serde(rename(deserialize = "OutstandingSell"))]
	pub outstanding_sell: Option<f64>,
	#[serde(rename(deserialize = "OwnedRatio"))]
	pub owned_ratio: Option<f64>,
	#[serde(rename(deserialize = "Dividend"))]
	pub dividend: Option<f64>,
	#[serde(rename(deserialize = "Yield"))]
	pub dividend_yield: Option<f64>,
	#[serde(rename(deserialize = "Beta"))]
	pub beta: Option<f64>,
	#[serde(rename(deserialize = "EPS"))]
	pub eps: Option<f64>,
	#[serde(rename(deserialize = "PE"))]
	pub pe: Option<f64>,
	#[serde(rename(deserialize = "FEPS"))]
	pub feps: Option<f64>,
	#[serde(rename(deserialize = "BVPS"))]
	pub bvps: Option<f64>,
	#[serde(rename(deserialize = "PB"))]
	pub pb: Option<f64>,
	#[serde(rename(deserialize = "TotalRoom"))]
	pub total_room: Option<f64>,
	#[serde(rename(deserialize = "CurrRoom"))]
	pub curr_room: Option<f64>,
	#[serde(rename(deserialize = "RemainRoom"))]
	pub remain_room: Option<f64>,
	#[serde(rename(deserialize = "F_BuyVol"))]
	pub foreign_buy_vol: Option<f64>,
	#[serde(rename(deserialize = "F_BuyVal"))]
	pub foreign_buy_val: Option<f64>,
	#[serde(rename(deserialize = "F_SellVol"))]
	pub foreign_sell_vol: Option<f64>,
	#[serde(rename(deserialize = "F_SellVal"))]
	pub foreign_sell_val: Option<f64>,
	#[serde(rename(deserialize = "F_BuyPutVol"))]
	pub foreign_buy_put_vol: Option<f64>,
	#[serde(rename(deserialize = "F_BuyPutVal"))]
	pub foreign_buy_put_val: Option<f64>,
	#[serde(rename(deserialize = "F_SellPutVol"))]
	pub foreign_sell_put_vol: Option<f64>,
	#[serde(rename(deserialize = "F_SellPutVal"))]
	pub foreign_sell_put_val: Option<f64>,
	#[serde(rename(deserialize = "MarketStatus"), deserialize_with = "de::text")]
	pub market_status: Option<String>,
	#[serde(rename(deserialize = "ColorId"))]
	pub color_id: Option<i64>,
	#[serde(rename(deserialize = "StatusName"), deserialize_with = "de::text")]
	pub status_name: Option<String>,
	#[serde(rename(deserialize = "StockStatus"), deserialize_with = "de::text")]
	pub stock_status: Option<String>,
}

/// One row of `data/getmarketprice`: indices, futures, commodities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketPrice {
	#[serde(rename(deserialize = "TradingDate"), deserialize_with = "vendor_date")]
	pub time: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "Code"))]
	pub symbol: String,
	#[serde(rename(deserialize = "Name"))]
	pub name: String,
	#[serde(rename(deserialize = "Price"))]
	pub price: Option<f64>,
	#[serde(rename(deserialize = "Change"))]
	pub change: Option<f64>,
	#[serde(rename(deserialize = "PerChange"))]
	pub per_change: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
	#[serde(rename = "B")]
	Buy,
	#[default]
	#[serde(rename = "S")]
	Sell,
}

/// Intraday matched deal from `data/getstockdealdetail`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockDeal {
	#[serde(rename(deserialize = "TradingDate"), deserialize_with = "vendor_date")]
	pub time: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "Stockcode"))]
	pub symbol: String,
	#[serde(rename(deserialize = "Package"), deserialize_with = "de::text")]
	pub package: Option<String>,
	#[serde(rename(deserialize = "Price"))]
	pub price: Option<f64>,
	#[serde(rename(deserialize = "Vol"))]
	pub vol: Option<f64>,
	#[serde(rename(deserialize = "TotalVol"))]
	pub total_vol: Option<f64>,
	#[serde(rename(deserialize = "TotalVal"))]
	pub total_val: Option<f64>,
	#[serde(rename(deserialize = "Change"))]
	pub change: Option<f64>,
	#[serde(rename(deserialize = "IsBuy"), deserialize_with = "de::side")]
	pub side: Side,
	#[serde(rename(deserialize = "PerChange"))]
	pub per_change: Option<f64>,
}

/// Price and volume summary over a window (`StatisticByDate`, `StatisticByPeriod`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodStatistics {
	#[serde(rename(deserialize = "F_Date"), deserialize_with = "vendor_date")]
	pub from_date: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "T_Date"), deserialize_with = "vendor_date")]
	pub to_date: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "F_LastPrice"))]
	pub from_last_price: Option<f64>,
	#[serde(rename(deserialize = "F_TotalVol"))]
	pub from_total_vol: Option<f64>,
	#[serde(rename(deserialize = "T_LastPrice"))]
	pub to_last_price: Option<f64>,
	#[serde(rename(deserialize = "T_TotalVol"))]
	pub to_total_vol: Option<f64>,
	#[serde(rename(deserialize = "NoTr"))]
	pub trading_days: Option<i64>,
	#[serde(rename(deserialize = "Change"))]
	pub change: Option<f64>,
	#[serde(rename(deserialize = "PerChange"))]
	pub per_change: Option<f64>,
	#[serde(rename(deserialize = "MaxPrice"))]
	pub max_price: Option<f64>,
	#[serde(rename(deserialize = "MinPrice"))]
	pub min_price: Option<f64>,
	#[serde(rename(deserialize = "AvgVol"))]
	pub avg_vol: Option<f64>,
	#[serde(rename(deserialize = "MaxVol"))]
	pub max_vol: Option<f64>,
	#[serde(rename(deserialize = "MinVol"))]
	pub min_vol: Option<f64>,
	#[serde(rename(deserialize = "DateMaxPrice"), deserialize_with = "vendor_date")]
	pub date_max_price: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "DateMinPrice"), deserialize_with = "vendor_date")]
	pub date_min_price: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "DateMaxVol"), deserialize_with = "vendor_date")]
	pub date_max_vol: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "DateMinVol"), deserialize_with = "vendor_date")]
	pub date_min_vol: Option<DateTime<Utc>>,
}

/// `StatisticByDate` wraps its rows in `{"Data": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatisticsByDateReply {
	#[serde(rename = "Data")]
	pub data: Vec<PeriodStatistics>,
}
