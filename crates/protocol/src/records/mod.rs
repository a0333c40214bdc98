//! Typed records for portal JSON payloads.
//!
//! Field names serialize in snake_case; vendor column names are accepted on
//! deserialization only. Every record tolerates missing and `null` columns.

mod company;
mod finance;
mod market;
mod news;

pub use company::{BondRelated, CompanyEvent, CompanyRelation, Document, IndustryEvent, TransferEvent};
pub use finance::{DataEnvelope, ReportNorm, ReportPeriod, ReportPeriodInfo};
pub use market::{HistoricalBar, HistoryReply, MarketPrice, PeriodStatistics, Side, StatisticsByDateReply, StockDeal, TradingInfo};
pub use news::{ChannelNewsArticle, HeaderNews, NewsArticle};
