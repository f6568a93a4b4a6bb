//! System news shown next to the login form.

// self
use crate::_prelude::*;

/// Single news entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
	/// Headline.
	pub title: String,
	/// Body, already sanitized for display by whoever produced it.
	pub content: String,
	/// Publication instant, if known.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub date: Option<OffsetDateTime>,
}

/// Collaborator that supplies persisted news items, newest first.
pub trait NewsSource
where
	Self: Send + Sync,
{
	/// Returns the news items to display.
	fn news(&self) -> Vec<NewsItem>;
}

/// Merges configured items with the source's items; configured items come first.
pub fn collect_news(configured: &[NewsItem], source: Option<&dyn NewsSource>) -> Vec<NewsItem> {
	let mut items = configured.to_vec();

	if let Some(source) = source {
		items.extend(source.news());
	}

	items
}
