use std::collections::HashMap;

use super::{AnalysisBounds, CleanedPost, TagMapsError, ZeroCoordinatePolicy};

/// immutable collection of cleaned posts for one run, indexed by post guid.
/// iteration order is the insertion order.
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<CleanedPost>,
    index: HashMap<String, usize>,
}

impl PostStore {
    /// builds the store. if two posts share a guid, the later one replaces the earlier.
    pub fn new(posts: Vec<CleanedPost>) -> PostStore {
        let mut store = PostStore {
            posts: Vec::with_capacity(posts.len()),
            index: HashMap::with_capacity(posts.len()),
        };
        for post in posts.into_iter() {
            match store.index.get(&post.guid).copied() {
                Some(idx) => {
                    log::warn!("duplicate post guid '{}', keeping the last record", post.guid);
                    store.posts[idx] = post;
                }
                None => {
                    store.index.insert(post.guid.clone(), store.posts.len());
                    store.posts.push(post);
                }
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanedPost> {
        self.posts.iter()
    }

    /// looks up a post that some upstream step claims exists. a miss means ids were
    /// paired incorrectly and is reported as [`TagMapsError::MissingPost`].
    pub fn get(&self, guid: &str) -> Result<&CleanedPost, TagMapsError> {
        self.index
            .get(guid)
            .and_then(|idx| self.posts.get(*idx))
            .ok_or_else(|| TagMapsError::MissingPost(guid.to_string()))
    }

    /// the rectangle over all post coordinates under the given zero-coordinate policy
    pub fn bounds(&self, policy: ZeroCoordinatePolicy) -> AnalysisBounds {
        let mut bounds = AnalysisBounds::new(policy);
        for location in self.posts.iter().filter_map(|p| p.location.as_ref()) {
            bounds.update(location);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatLng;

    #[test]
    fn test_get_missing_post() {
        let store = PostStore::new(vec![CleanedPost::new("a", "u", LatLng::new(1.0, 2.0))]);
        assert!(store.get("a").is_ok());
        match store.get("b") {
            Err(TagMapsError::MissingPost(id)) => assert_eq!(id, "b"),
            other => panic!("expected MissingPost, found {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_guid_replaced() {
        let store = PostStore::new(vec![
            CleanedPost::new("a", "u1", LatLng::new(1.0, 2.0)),
            CleanedPost::new("a", "u2", LatLng::new(3.0, 4.0)),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().user_guid, "u2");
    }
}
