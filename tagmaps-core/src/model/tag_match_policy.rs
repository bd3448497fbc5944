use serde::{Deserialize, Serialize};

use super::CleanedPost;

/// how a post is matched to a tag item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagMatchPolicy {
    /// tag must be in the hashtag set
    #[default]
    HashtagOnly,
    /// tag is in the hashtag set or in the set of body words
    HashtagOrBody,
}

impl TagMatchPolicy {
    pub fn matches(&self, post: &CleanedPost, tag: &str) -> bool {
        match self {
            TagMatchPolicy::HashtagOnly => post.hashtags.contains(tag),
            TagMatchPolicy::HashtagOrBody => {
                post.hashtags.contains(tag) || post.post_body.contains(tag)
            }
        }
    }
}
