//! Company-level listings: peers, filings, bonds, insider transfers, events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::vendor_date;
use crate::de;

/// Peer company from `company/GetCompanyRelationFilter`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRelation {
	#[serde(rename(deserialize = "StockCode"))]
	pub symbol: String,
	#[serde(rename(deserialize = "CatID"))]
	pub cat_id: Option<i64>,
	#[serde(rename(deserialize = "LastPrice"))]
	pub last_price: Option<f64>,
	#[serde(rename(deserialize = "Change"))]
	pub change: Option<f64>,
	#[serde(rename(deserialize = "PerChange"))]
	pub per_change: Option<f64>,
	#[serde(rename(deserialize = "HighestPrice"))]
	pub highest_price: Option<f64>,
	#[serde(rename(deserialize = "LowestPrice"))]
	pub lowest_price: Option<f64>,
	#[serde(rename(deserialize = "TotalVol"))]
	pub total_vol: Option<f64>,
	#[serde(rename(deserialize = "TotalVal"))]
	pub total_val: Option<f64>,
	#[serde(rename(deserialize = "ForeignBuyVol"))]
	pub foreign_buy_vol: Option<f64>,
	#[serde(rename(deserialize = "ForeignSellVol"))]
	pub foreign_sell_vol: Option<f64>,
	#[serde(rename(deserialize = "MarketCapital"))]
	pub market_capital: Option<f64>,
	#[serde(rename(deserialize = "PE"))]
	pub pe: Option<f64>,
	#[serde(rename(deserialize = "PB"))]
	pub pb: Option<f64>,
	#[serde(rename(deserialize = "Url"))]
	pub url: String,
}

/// Filing from `data/getdocument`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
	#[serde(rename(deserialize = "FileExt"))]
	pub file_ext: String,
	#[serde(rename(deserialize = "UpdateTime"), deserialize_with = "vendor_date")]
	pub update_time: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "TotalRow"))]
	pub total_row: Option<i64>,
	#[serde(rename(deserialize = "FileInfoID"))]
	pub file_info_id: Option<i64>,
	#[serde(rename(deserialize = "Url"))]
	pub url: String,
	#[serde(rename(deserialize = "Title"))]
	pub title: String,
	#[serde(rename(deserialize = "FullName"))]
	pub full_name: String,
	#[serde(rename(deserialize = "LastUpdate"), deserialize_with = "vendor_date")]
	pub last_update: Option<DateTime<Utc>>,
}

/// Bond issued by or related to a company (`Data/GetBondRelated`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondRelated {
	#[serde(rename(deserialize = "KeyCode"))]
	pub key_code: String,
	#[serde(rename(deserialize = "StockCode"))]
	pub stock_code: String,
	#[serde(rename(deserialize = "BondCode"))]
	pub bond_code: String,
	#[serde(rename(deserialize = "ReleaseDate"), deserialize_with = "vendor_date")]
	pub release_date: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "DueDate"), deserialize_with = "vendor_date")]
	pub due_date: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "FaceValue"))]
	pub face_value: Option<f64>,
	#[serde(rename(deserialize = "IssueRate"))]
	pub issue_rate: Option<f64>,
	/// Spelled `IssuaVolume` on the wire.
	#[serde(rename(deserialize = "IssuaVolume"))]
	pub issue_volume: Option<f64>,
	#[serde(rename(deserialize = "OutstandingShares"))]
	pub outstanding_shares: Option<f64>,
	#[serde(rename(deserialize = "CompanyCode"), deserialize_with = "de::text")]
	pub company_code: Option<String>,
	#[serde(rename(deserialize = "CompanyName"), deserialize_with = "de::text")]
	pub company_name: Option<String>,
	#[serde(rename(deserialize = "CompanyURL"), deserialize_with = "de::text")]
	pub company_url: Option<String>,
	#[serde(rename(deserialize = "InterestRateType"), deserialize_with = "de::text")]
	pub interest_rate_type: Option<String>,
	#[serde(rename(deserialize = "InterestPeriod"), deserialize_with = "de::text")]
	pub interest_period: Option<String>,
	#[serde(rename(deserialize = "TotalRecord"))]
	pub total_record: Option<i64>,
}

/// Insider or major-shareholder transfer (`data/eventstransferdata`).
///
/// The abbreviated vendor columns are kept as-is: `dtthcd` (trading party),
/// `dtthlq`/`dtlqlq` (related parties), `nvth`, and the `ndd*` fields
/// describing the authorised representative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferEvent {
	#[serde(rename(deserialize = "EventID"))]
	pub event_id: Option<i64>,
	#[serde(rename(deserialize = "StockCode"))]
	pub symbol: String,
	#[serde(rename(deserialize = "FinanceURL"), deserialize_with = "de::text")]
	pub finance_url: Option<String>,
	#[serde(rename(deserialize = "Content"), deserialize_with = "de::text")]
	pub content: Option<String>,
	#[serde(rename(deserialize = "Title"), deserialize_with = "de::text")]
	pub title: Option<String>,
	#[serde(rename(deserialize = "FileUrl"), deserialize_with = "de::text")]
	pub file_url: Option<String>,
	#[serde(rename(deserialize = "TypeName"), deserialize_with = "de::text")]
	pub type_name: Option<String>,
	#[serde(rename(deserialize = "TransferTypeID"))]
	pub transfer_type_id: Option<i64>,
	#[serde(rename(deserialize = "PositionCD"), deserialize_with = "de::text")]
	pub position_cd: Option<String>,
	#[serde(rename(deserialize = "ExtraPositionNLQ"), deserialize_with = "de::text")]
	pub extra_position_nlq: Option<String>,
	#[serde(rename(deserialize = "ExtraPositionNLQEx"), deserialize_with = "de::text")]
	pub extra_position_nlq_ex: Option<String>,
	#[serde(rename(deserialize = "ExtraPositionNN"), deserialize_with = "de::text")]
	pub extra_position_nn: Option<String>,
	#[serde(rename(deserialize = "RelationShipType"), deserialize_with = "de::text")]
	pub relationship_type: Option<String>,
	#[serde(rename(deserialize = "DTTHCD"), deserialize_with = "de::text")]
	pub dtthcd: Option<String>,
	#[serde(rename(deserialize = "DTTHLQ"), deserialize_with = "de::text")]
	pub dtthlq: Option<String>,
	#[serde(rename(deserialize = "DTLQLQ"), deserialize_with = "de::text")]
	pub dtlqlq: Option<String>,
	#[serde(rename(deserialize = "NVTH"), deserialize_with = "de::text")]
	pub nvth: Option<String>,
	#[serde(rename(deserialize = "RegisterBuyVolume"))]
	pub register_buy_volume: Option<f64>,
	#[serde(rename(deserialize = "BuyVolume"))]
	pub buy_volume: Option<f64>,
	#[serde(rename(deserialize = "RegisterSellVolume"))]
	pub register_sell_volume: Option<f64>,
	#[serde(rename(deserialize = "SellVolume"))]
	pub sell_volume: Option<f64>,
	#[serde(rename(deserialize = "RegisterVolumeBefore"))]
	pub register_volume_before: Option<f64>,
	#[serde(rename(deserialize = "RegisterVolumeAfter"))]
	pub register_volume_after: Option<f64>,
	#[serde(rename(deserialize = "VolumeBefore"))]
	pub volume_before: Option<f64>,
	#[serde(rename(deserialize = "VolumeAfter"))]
	pub volume_after: Option<f64>,
	#[serde(rename(deserialize = "DateBuyExpected"), deserialize_with = "vendor_date")]
	pub date_buy_expected: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "DateSellExpected"), deserialize_with = "vendor_date")]
	pub date_sell_expected: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "DateActionTo"), deserialize_with = "vendor_date")]
	pub date_action_to: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "PositionCDEx"), deserialize_with = "de::text")]
	pub position_cd_ex: Option<String>,
	#[serde(rename(deserialize = "ExtraPositionIDNNEx"))]
	pub extra_position_id_nn_ex: Option<i64>,
	#[serde(rename(deserialize = "DateActionFrom"), deserialize_with = "vendor_date")]
	pub date_action_from: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "NDDTitle"))]
	pub ndd_title: Option<i64>,
	#[serde(rename(deserialize = "NDDTH"), deserialize_with = "de::text")]
	pub nddth: Option<String>,
	#[serde(rename(deserialize = "NDDPosition"))]
	pub ndd_position: Option<i64>,
	#[serde(rename(deserialize = "NDDExtraPosition"))]
	pub ndd_extra_position: Option<i64>,
	#[serde(rename(deserialize = "TransferTitleTypeID"))]
	pub transfer_title_type_id: Option<i64>,
	#[serde(rename(deserialize = "RegisterBuyVolumePercent"))]
	pub register_buy_volume_percent: Option<f64>,
	#[serde(rename(deserialize = "BuyVolumePercent"))]
	pub buy_volume_percent: Option<f64>,
	#[serde(rename(deserialize = "RegisterSellVolumePercent"))]
	pub register_sell_volume_percent: Option<f64>,
	#[serde(rename(deserialize = "SellVolumePercent"))]
	pub sell_volume_percent: Option<f64>,
	#[serde(rename(deserialize = "RegisterVolumeBeforePercent"))]
	pub register_volume_before_percent: Option<f64>,
	#[serde(rename(deserialize = "RegisterVolumeAfterPercent"))]
	pub register_volume_after_percent: Option<f64>,
	#[serde(rename(deserialize = "VolumeBeforePercent"))]
	pub volume_before_percent: Option<f64>,
	#[serde(rename(deserialize = "VolumeAfterPercent"))]
	pub volume_after_percent: Option<f64>,
	#[serde(rename(deserialize = "StatusName"), deserialize_with = "de::text")]
	pub status_name: Option<String>,
	#[serde(rename(deserialize = "TotalRecord"))]
	pub total_record: Option<i64>,
	#[serde(rename(deserialize = "Row"))]
	pub row: Option<i64>,
}

/// Corporate calendar entry (`data/eventstypedata`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyEvent {
	#[serde(rename(deserialize = "Code"))]
	pub symbol: String,
	#[serde(rename(deserialize = "EventID"))]
	pub event_id: Option<i64>,
	#[serde(rename(deserialize = "EventTypeID"))]
	pub event_type_id: Option<i64>,
	#[serde(rename(deserialize = "ChannelID"))]
	pub channel_id: Option<i64>,
	#[serde(rename(deserialize = "CompanyName"), deserialize_with = "de::text")]
	pub company_name: Option<String>,
	#[serde(rename(deserialize = "CatID"))]
	pub cat_id: Option<i64>,
	/// Ex-rights date (GDKHQ).
	#[serde(rename(deserialize = "GDKHQDate"), deserialize_with = "vendor_date")]
	pub ex_rights_date: Option<DateTime<Utc>>,
	/// Record date (NDKCC).
	#[serde(rename(deserialize = "NDKCCDate"), deserialize_with = "vendor_date")]
	pub record_date: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "Time"), deserialize_with = "vendor_date")]
	pub event_time: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "Note"), deserialize_with = "de::text")]
	pub note: Option<String>,
	#[serde(rename(deserialize = "Name"), deserialize_with = "de::text")]
	pub name: Option<String>,
	#[serde(rename(deserialize = "Exchange"), deserialize_with = "de::text")]
	pub exchange: Option<String>,
	#[serde(rename(deserialize = "Title"), deserialize_with = "de::text")]
	pub title: Option<String>,
	#[serde(rename(deserialize = "Content"), deserialize_with = "de::text")]
	pub content: Option<String>,
	#[serde(rename(deserialize = "FileUrl"), deserialize_with = "de::text")]
	pub file_url: Option<String>,
	#[serde(rename(deserialize = "DateOrder"), deserialize_with = "vendor_date")]
	pub date_order: Option<DateTime<Utc>>,
	#[serde(rename(deserialize = "Row"))]
	pub row: Option<i64>,
}

/// Calendar entry of a same-industry peer (`data/eventstypedatasameindustry`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryEvent {
	#[serde(flatten)]
	pub event: CompanyEvent,
	#[serde(rename(deserialize = "Place"), deserialize_with = "de::text")]
	pub place: Option<String>,
	#[serde(rename(deserialize = "TimeAction"), deserialize_with = "de::text")]
	pub time_action: Option<String>,
	#[serde(rename(deserialize = "FromDate"), deserialize_with = "vendor_date")]
	pub from_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn bond_volume_uses_vendor_spelling() {
		let bond: BondRelated = serde_json::from_value(json!({
			"BondCode": "VNM12401",
			"IssuaVolume": 5000,
			"ReleaseDate": "/Date(1704067200000)/",
			"CompanyName": null,
		}))
		.unwrap();
		assert_eq!(bond.issue_volume, Some(5000.0));
		assert!(bond.release_date.is_some());
		assert_eq!(bond.company_name, None);
	}

	#[test]
	fn industry_event_flattens_common_fields() {
		let event: IndustryEvent = serde_json::from_value(json!({
			"Code": "MSN",
			"EventID": 991,
			"GDKHQDate": "/Date(1718593735000)/",
			"Place": "Hà Nội",
			"TimeAction": "08:30",
		}))
		.unwrap();
		assert_eq!(event.event.symbol, "MSN");
		assert_eq!(event.event.event_id, Some(991));
		assert!(event.event.ex_rights_date.is_some());
		assert_eq!(event.place.as_deref(), Some("Hà Nội"));

		let out = serde_json::to_value(&event).unwrap();
		assert_eq!(out["symbol"], "MSN");
		assert_eq!(out["time_action"], "08:30");
	}

	#[test]
	fn transfer_event_tolerates_missing_columns() {
		let transfer: TransferEvent = serde_json::from_value(json!({
			"EventID": 7,
			"StockCode": "HPG",
			"RegisterBuyVolume": 1000000,
			"DateActionFrom": "/Date(1718593735000)/",
			"DTTHCD": "Nguyễn Văn A",
		}))
		.unwrap();
		assert_eq!(transfer.symbol, "HPG");
		assert_eq!(transfer.register_buy_volume, Some(1_000_000.0));
		assert_eq!(transfer.dtthcd.as_deref(), Some("Nguyễn Văn A"));
		assert_eq!(transfer.sell_volume, None);
	}
}
