use vietstock_protocol::params::NEWS_BY_CODE_TYPES;
use vietstock_protocol::{ChannelNewsArticle, HeaderNews, NewsArticle};

use super::{Form, VietstockClient};
use crate::error::Result;

impl VietstockClient {
	/// Front-page headlines. URLs are made absolute against the finance host.
	pub async fn header_news(&self, page_size: u32) -> Result<Vec<HeaderNews>> {
		let query = [("type", "1".to_string()), ("pageSize", page_size.to_string())];
		let mut news: Vec<HeaderNews> = self.post_with_query("/data/headernews", &query, Form::new()).await?;
		for item in &mut news {
			if item.url.starts_with("http") {
				continue;
			}
			item.url = if item.url.starts_with('/') {
				self.finance_url(&item.url)
			} else {
				self.finance_url(&format!("/{}", item.url))
			};
		}
		Ok(news)
	}

	/// Articles tagged with `symbol`. The portal groups them by category;
	/// groups are flattened in reply order.
	pub async fn news_by_code(&self, symbol: &str, page: u32, page_size: u32) -> Result<Vec<NewsArticle>> {
		let form = Form::new()
			.field("code", symbol)
			.repeated("types[]", NEWS_BY_CODE_TYPES)
			.field("page", page)
			.field("pageSize", page_size);
		let groups: Vec<Vec<NewsArticle>> = self.post("/data/getnewsbycode", form).await?;
		Ok(groups.into_iter().flatten().collect())
	}

	pub async fn news_by_channel(&self, symbol: &str, news_type: i32, page: u32, page_size: u32) -> Result<Vec<ChannelNewsArticle>> {
		let form = Form::new()
			.field("code", symbol)
			.field("type", news_type)
			.field("page", page)
			.field("pageSize", page_size);
		self.post("/data/getnewsbychannel3", form).await
	}
}
