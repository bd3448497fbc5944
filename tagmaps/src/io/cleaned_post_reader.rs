use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use kdam::tqdm;
use serde::{Deserialize, Serialize};
use tagmaps_core::model::{CleanedPost, LatLng};

use crate::model::TagMapsCliError;

/// separator of the values in the body, hashtag and emoji columns
pub const SET_SEPARATOR: char = ';';

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// one row of a cleaned post CSV file: one merged record per user and location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedPostRow {
    #[serde(default)]
    pub origin_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub guid: String,
    pub user_guid: String,
    #[serde(default)]
    pub post_create_date: Option<String>,
    #[serde(default)]
    pub post_publish_date: Option<String>,
    #[serde(default)]
    pub post_body: String,
    #[serde(default)]
    pub hashtags: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub post_views_count: Option<u64>,
    #[serde(default)]
    pub post_like_count: Option<u64>,
    #[serde(default)]
    pub loc_id: Option<String>,
    #[serde(default)]
    pub loc_name: Option<String>,
}

impl TryFrom<CleanedPostRow> for CleanedPost {
    type Error = TagMapsCliError;

    fn try_from(row: CleanedPostRow) -> Result<Self, Self::Error> {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            (None, None) => None,
            _ => {
                log::warn!(
                    "post '{}' has only one of latitude and longitude, treating it as unlocated",
                    row.guid
                );
                None
            }
        };
        let loc_id = match (row.loc_id.filter(|s| !s.is_empty()), &location) {
            (Some(id), _) => id,
            (None, Some(l)) => CleanedPost::location_key(l),
            (None, None) => String::new(),
        };
        Ok(CleanedPost {
            origin_id: row.origin_id,
            location,
            post_create_date: parse_date(&row.guid, row.post_create_date.as_deref())?,
            post_publish_date: parse_date(&row.guid, row.post_publish_date.as_deref())?,
            guid: row.guid,
            user_guid: row.user_guid,
            post_body: split_set(&row.post_body),
            hashtags: split_set(&row.hashtags),
            emoji: split_set(&row.emoji),
            post_views_count: row.post_views_count.unwrap_or_default(),
            post_like_count: row.post_like_count.unwrap_or_default(),
            loc_id,
            loc_name: row.loc_name.filter(|s| !s.is_empty()),
        })
    }
}

/// reads a cleaned post CSV file with a header row
pub fn read_cleaned_posts(path: &Path) -> Result<Vec<CleanedPost>, TagMapsCliError> {
    let file = std::fs::File::open(path).map_err(|e| {
        TagMapsCliError::InputError(format!("failure opening {}: {e}", path.display()))
    })?;
    read_cleaned_posts_from(file)
}

pub fn read_cleaned_posts_from<R: Read>(source: R) -> Result<Vec<CleanedPost>, TagMapsCliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let rows = tqdm!(reader.deserialize::<CleanedPostRow>(), desc = "read cleaned posts");
    let mut posts = vec![];
    for (idx, row) in rows.enumerate() {
        let row = row.map_err(|e| TagMapsCliError::InputError(format!("row {idx}: {e}")))?;
        posts.push(CleanedPost::try_from(row)?);
    }
    eprintln!();
    log::info!("read {} cleaned posts", posts.len());
    Ok(posts)
}

fn split_set(value: &str) -> BTreeSet<String> {
    value
        .split(SET_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_date(guid: &str, value: Option<&str>) -> Result<Option<NaiveDateTime>, TagMapsCliError> {
    let Some(value) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(Some)
        .ok_or_else(|| {
            TagMapsCliError::InputError(format!("post '{guid}' has an invalid date '{value}'"))
        })
}
