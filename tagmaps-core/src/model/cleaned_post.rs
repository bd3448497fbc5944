use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// a WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }

    /// (latitude, longitude) in radians
    pub fn to_radians(&self) -> [f64; 2] {
        [self.lat.to_radians(), self.lng.to_radians()]
    }
}

/// one merged record per user and location (a "UPL"). all posts by the same user at the
/// same location have their words, hashtags and emoji merged into deduplicated sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedPost {
    pub origin_id: String,
    /// both latitude and longitude, or neither
    pub location: Option<LatLng>,
    pub guid: String,
    pub user_guid: String,
    pub post_create_date: Option<NaiveDateTime>,
    pub post_publish_date: Option<NaiveDateTime>,
    pub post_body: BTreeSet<String>,
    pub hashtags: BTreeSet<String>,
    pub emoji: BTreeSet<String>,
    pub post_views_count: u64,
    pub post_like_count: u64,
    /// either "lat:lng" or an id provided by the source
    pub loc_id: String,
    pub loc_name: Option<String>,
}

impl CleanedPost {
    /// creates a post with only the fields required for clustering. the location id
    /// is derived from the coordinate.
    pub fn new(guid: &str, user_guid: &str, location: LatLng) -> CleanedPost {
        CleanedPost {
            origin_id: String::from("0"),
            location: Some(location),
            guid: guid.to_string(),
            user_guid: user_guid.to_string(),
            post_create_date: None,
            post_publish_date: None,
            post_body: BTreeSet::new(),
            hashtags: BTreeSet::new(),
            emoji: BTreeSet::new(),
            post_views_count: 0,
            post_like_count: 0,
            loc_id: CleanedPost::location_key(&location),
            loc_name: None,
        }
    }

    pub fn with_hashtags<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> CleanedPost {
        self.hashtags.extend(tags.into_iter().map(String::from));
        self
    }

    pub fn with_emoji<'a>(mut self, emoji: impl IntoIterator<Item = &'a str>) -> CleanedPost {
        self.emoji.extend(emoji.into_iter().map(String::from));
        self
    }

    pub fn with_body<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> CleanedPost {
        self.post_body.extend(words.into_iter().map(String::from));
        self
    }

    pub fn with_views(mut self, views: u64) -> CleanedPost {
        self.post_views_count = views;
        self
    }

    /// the "lat:lng" key used when a source has no location identifier
    pub fn location_key(location: &LatLng) -> String {
        format!("{}:{}", location.lat, location.lng)
    }
}
