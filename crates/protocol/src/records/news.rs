use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::vendor_date;
use crate::de;

/// Headline from `data/headernews`. `url` is site-relative on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderNews {
	#[serde(rename(deserialize = "Title"))]
	pub title: String,
	#[serde(rename(deserialize = "URL"))]
	pub url: String,
	#[serde(rename(deserialize = "PublishTime"), deserialize_with = "vendor_date")]
	pub publish_time: Option<DateTime<Utc>>,
}

/// Article tagged with a stock code (`data/getnewsbycode`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsArticle {
	#[serde(rename(deserialize = "StockCode"), deserialize_with = "de::text")]
	pub symbol: Option<String>,
	#[serde(rename(deserialize = "ChannelID"))]
	pub channel_id: Option<i64>,
	#[serde(rename(deserialize = "Head"), deserialize_with = "de::text")]
	pub head: Option<String>,
	#[serde(rename(deserialize = "ArticleID"))]
	pub article_id: Option<i64>,
	#[serde(rename(deserialize = "Title"), deserialize_with = "de::text")]
	pub title: Option<String>,
	#[serde(rename(deserialize = "PublishTime"), deserialize_with = "vendor_date")]
	pub publish_time: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "Content"), deserialize_with = "de::text")]
	pub content: Option<String>,
	#[serde(rename(deserialize = "URL"), deserialize_with = "de::text")]
	pub url: Option<String>,
	#[serde(rename(deserialize = "TotalRow"))]
	pub total_row: Option<i64>,
}

/// Article from a news channel feed (`data/getnewsbychannel3`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelNewsArticle {
	#[serde(rename(deserialize = "ArticleID"))]
	pub article_id: Option<i64>,
	#[serde(rename(deserialize = "Title"), deserialize_with = "de::text")]
	pub title: Option<String>,
	#[serde(rename(deserialize = "Head"), deserialize_with = "de::text")]
	pub head: Option<String>,
	#[serde(rename(deserialize = "HeadImageUrl"), deserialize_with = "de::text")]
	pub head_image_url: Option<String>,
	#[serde(rename(deserialize = "PublishTime"), deserialize_with = "vendor_date")]
	pub publish_time: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "ChannelID"))]
	pub channel_id: Option<i64>,
	#[serde(rename(deserialize = "URL"), deserialize_with = "de::text")]
	pub url: Option<String>,
	#[serde(rename(deserialize = "Row"))]
	pub row: Option<i64>,
	#[serde(rename(deserialize = "TotalRow"))]
	pub total_row: Option<i64>,
}
