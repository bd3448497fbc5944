use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::PostStore;

/// global counters of a run, reported alongside the compiled shapes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_posts: usize,
    pub distinct_users: usize,
    pub distinct_tags: usize,
    pub distinct_emoji: usize,
    pub distinct_locations: usize,
    pub processed_items: usize,
    pub saturation_excluded_items: usize,
    pub total_shapes: usize,
}

impl RunSummary {
    pub fn from_posts(store: &PostStore) -> RunSummary {
        let mut users = HashSet::new();
        let mut tags = HashSet::new();
        let mut emoji = HashSet::new();
        let mut locations = HashSet::new();
        for post in store.iter() {
            users.insert(post.user_guid.as_str());
            tags.extend(post.hashtags.iter().map(|t| t.as_str()));
            emoji.extend(post.emoji.iter().map(|e| e.as_str()));
            if post.location.is_some() {
                locations.insert(post.loc_id.as_str());
            }
        }
        RunSummary {
            total_posts: store.len(),
            distinct_users: users.len(),
            distinct_tags: tags.len(),
            distinct_emoji: emoji.len(),
            distinct_locations: locations.len(),
            ..Default::default()
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} posts by {} users at {} locations, {} distinct tags, {} distinct emoji; {} items processed, {} excluded by local saturation, {} shapes",
            self.total_posts,
            self.distinct_users,
            self.distinct_locations,
            self.distinct_tags,
            self.distinct_emoji,
            self.processed_items,
            self.saturation_excluded_items,
            self.total_shapes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CleanedPost, LatLng};

    #[test]
    fn test_unlocated_posts_are_not_a_location() {
        let located = CleanedPost::new("a", "u1", LatLng::new(52.5, 13.4)).with_hashtags(["spree"]);
        let shared = CleanedPost::new("b", "u2", LatLng::new(52.5, 13.4)).with_emoji(["🐻"]);
        let unlocated = CleanedPost {
            location: None,
            loc_id: String::new(),
            ..CleanedPost::new("c", "u3", LatLng::new(0.0, 0.0)).with_hashtags(["berlin"])
        };
        let summary = RunSummary::from_posts(&PostStore::new(vec![located, shared, unlocated]));
        assert_eq!(summary.total_posts, 3);
        assert_eq!(summary.distinct_users, 3);
        assert_eq!(summary.distinct_locations, 1);
        assert_eq!(summary.distinct_tags, 2);
        assert_eq!(summary.distinct_emoji, 1);
    }
}
