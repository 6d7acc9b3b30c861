use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fields we read from a meme API response. Everything else is ignored.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ApiMeme {
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "postLink")]
    pub post_link: Option<String>,
    pub subreddit: Option<String>,
}

/// One entry of a daily collection, as persisted to `memes/<date>.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MemeRecord {
    pub title: Option<String>,
    pub url: String,
    #[serde(rename = "postLink")]
    pub post_link: Option<String>,
    pub subreddit: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl MemeRecord {
    /// Builds a record from an API response. Returns `None` when the response has no `url`.
    pub fn from_api(meme: ApiMeme, fetched_at: DateTime<Utc>) -> Option<Self> {
        let url = meme.url.filter(|u| !u.is_empty())?;
        Some(MemeRecord {
            title: meme.title,
            url,
            post_link: meme.post_link,
            subreddit: meme.subreddit,
            timestamp: fetched_at,
        })
    }
}
