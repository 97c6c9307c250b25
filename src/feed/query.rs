use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::MediaKind;

/// Content category; each has its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedTab {
    #[default]
    Gif,
    Sticker,
    Clip,
}

impl FeedTab {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Gif => "gifs",
            Self::Sticker => "stickers",
            Self::Clip => "clips",
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Gif | Self::Sticker => MediaKind::Image,
            Self::Clip => MediaKind::Video,
        }
    }
}

impl FromStr for FeedTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gif" | "gifs" => Ok(Self::Gif),
            "sticker" | "stickers" => Ok(Self::Sticker),
            "clip" | "clips" => Ok(Self::Clip),
            other => Err(format!("unknown tab '{other}' (expected gif, sticker or clip)")),
        }
    }
}

impl fmt::Display for FeedTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Which list to page through: trending for a tab, or a search within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FeedQuery {
    pub tab: FeedTab,
    pub search: Option<String>,
}

impl FeedQuery {
    pub fn trending(tab: FeedTab) -> Self {
        Self { tab, search: None }
    }

    /// A blank search string means trending.
    pub fn search(tab: FeedTab, text: &str) -> Self {
        let text = text.trim();
        Self {
            tab,
            search: (!text.is_empty()).then(|| text.to_string()),
        }
    }

    /// Path and query string for a 1-based page, relative to the tab endpoint.
    pub fn page_path(&self, page: u32, per_page: usize) -> String {
        match &self.search {
            Some(q) => format!(
                "search/?page={page}&per_page={per_page}&q={}",
                urlencoding::encode(q)
            ),
            None => format!("trending?page={page}&per_page={per_page}"),
        }
    }

    pub fn page_url(&self, base_url: &str, page: u32, per_page: usize) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.tab.endpoint(),
            self.page_path(page, per_page)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_parsing() {
        assert_eq!("GIF".parse::<FeedTab>(), Ok(FeedTab::Gif));
        assert_eq!("stickers".parse::<FeedTab>(), Ok(FeedTab::Sticker));
        assert_eq!("clip".parse::<FeedTab>(), Ok(FeedTab::Clip));
        assert!("memes".parse::<FeedTab>().is_err());
    }

    #[test]
    fn test_tab_kind() {
        assert_eq!(FeedTab::Clip.kind(), MediaKind::Video);
        assert_eq!(FeedTab::Sticker.kind(), MediaKind::Image);
    }

    #[test]
    fn test_trending_path() {
        let q = FeedQuery::trending(FeedTab::Gif);
        assert_eq!(q.page_path(1, 50), "trending?page=1&per_page=50");
    }

    #[test]
    fn test_search_path_is_encoded() {
        let q = FeedQuery::search(FeedTab::Clip, "  happy cat & dog ");
        assert_eq!(
            q.page_path(3, 50),
            "search/?page=3&per_page=50&q=happy%20cat%20%26%20dog"
        );
    }

    #[test]
    fn test_blank_search_is_trending() {
        assert_eq!(
            FeedQuery::search(FeedTab::Sticker, "   "),
            FeedQuery::trending(FeedTab::Sticker)
        );
    }

    #[test]
    fn test_page_url() {
        let q = FeedQuery::trending(FeedTab::Sticker);
        assert_eq!(
            q.page_url("https://api.example.com/v1/", 2, 50),
            "https://api.example.com/v1/stickers/trending?page=2&per_page=50"
        );
    }
}
