use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::{Item, ItemType, PostStore, TagMatchPolicy};

/// filters applied to the ranked item list before clustering, in field order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRanking {
    /// long tail cut for tags. emoji use half of it, at least 1.
    pub long_tail_min_users: Option<usize>,
    pub max_items: Option<usize>,
    pub excluded_items: Vec<String>,
}

impl ItemRanking {
    /// minimum number of distinct users an item of this type needs to be kept
    pub fn min_users(&self, item_type: ItemType) -> Option<usize> {
        self.long_tail_min_users.map(|n| match item_type {
            ItemType::Emoji => (n / 2).max(1),
            _ => n,
        })
    }
}

/// number of distinct users per tag or emoji, counted over the hashtag and emoji sets
/// of posts with a location. a user counts once per item however many posts they made.
pub fn item_user_counts(store: &PostStore, item_type: ItemType) -> HashMap<String, usize> {
    let mut users: HashMap<&str, HashSet<&str>> = HashMap::new();
    for post in store.iter().filter(|p| p.location.is_some()) {
        let names = match item_type {
            ItemType::Tags => &post.hashtags,
            ItemType::Emoji => &post.emoji,
            ItemType::Locations => continue,
        };
        for name in names.iter() {
            users
                .entry(name.as_str())
                .or_default()
                .insert(post.user_guid.as_str());
        }
    }
    users
        .into_iter()
        .map(|(name, u)| (name.to_string(), u.len()))
        .collect()
}

/// ranks the items of one type by distinct user count, descending, ties broken by name.
/// long tail removal, the exclusion list and the top-N cut are applied in that order.
/// the locations type yields the single pseudo-item covering every located post.
pub fn rank_items(store: &PostStore, item_type: ItemType, ranking: &ItemRanking) -> Vec<Item> {
    if item_type == ItemType::Locations {
        let users = store
            .iter()
            .filter(|p| p.location.is_some())
            .map(|p| p.user_guid.as_str())
            .unique()
            .count();
        return if users > 0 {
            vec![Item::locations(users)]
        } else {
            vec![]
        };
    }

    let counts = item_user_counts(store, item_type);
    let total = counts.len();
    let min_users = ranking.min_users(item_type).unwrap_or(0);
    let excluded = ranking
        .excluded_items
        .iter()
        .map(|s| s.to_lowercase())
        .collect::<HashSet<_>>();

    let mut ranked = counts
        .into_iter()
        .filter(|(_, users)| *users >= min_users)
        .filter(|(name, _)| !excluded.contains(&name.to_lowercase()))
        .sorted_by(|(a_name, a), (b_name, b)| b.cmp(a).then_with(|| a_name.cmp(b_name)))
        .map(|(name, users)| Item::new(&name, item_type, users))
        .collect_vec();
    if let Some(n) = ranking.max_items {
        ranked.truncate(n);
    }
    log::debug!("kept {} of {} {item_type} after ranking", ranked.len(), total);
    ranked
}

/// guids of the located posts that reference the item, in store order
pub fn select_post_guids<'a>(
    store: &'a PostStore,
    item: &Item,
    policy: TagMatchPolicy,
) -> Vec<&'a str> {
    store
        .iter()
        .filter(|p| p.location.is_some())
        .filter(|p| match item.item_type {
            ItemType::Tags => policy.matches(p, &item.name),
            ItemType::Emoji => p.emoji.contains(&item.name),
            ItemType::Locations => true,
        })
        .map(|p| p.guid.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CleanedPost, LatLng};

    fn store() -> PostStore {
        let at = LatLng::new(51.0, 13.7);
        PostStore::new(vec![
            CleanedPost::new("p1", "u1", at).with_hashtags(["elbe", "bridge"]),
            CleanedPost::new("p2", "u2", at).with_hashtags(["elbe"]).with_emoji(["🌅"]),
            CleanedPost::new("p3", "u3", at)
                .with_hashtags(["elbe", "bridge"])
                .with_emoji(["🌅"]),
            CleanedPost::new("p4", "u1", at).with_hashtags(["bridge", "altstadt"]),
            CleanedPost::new("p5", "u4", at).with_body(["altstadt"]),
        ])
    }

    #[test]
    fn test_user_counts_ignore_repeat_users() {
        let counts = item_user_counts(&store(), ItemType::Tags);
        assert_eq!(counts.get("elbe"), Some(&3));
        // u1 tagged bridge twice
        assert_eq!(counts.get("bridge"), Some(&2));
        assert_eq!(counts.get("altstadt"), Some(&1));
    }

    #[test]
    fn test_rank_order_and_ties() {
        let ranked = rank_items(&store(), ItemType::Tags, &ItemRanking::default());
        let names = ranked.iter().map(|i| i.name.as_str()).collect_vec();
        assert_eq!(names, vec!["elbe", "bridge", "altstadt"]);
    }

    #[test]
    fn test_long_tail_exclusion_and_top_n() {
        let ranking = ItemRanking {
            long_tail_min_users: Some(2),
            max_items: Some(1),
            excluded_items: vec![String::from("ELBE")],
        };
        let ranked = rank_items(&store(), ItemType::Tags, &ranking);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "bridge");

        // emoji use half of the tag threshold
        let emoji_ranking = ItemRanking {
            long_tail_min_users: Some(4),
            ..Default::default()
        };
        assert_eq!(emoji_ranking.min_users(ItemType::Emoji), Some(2));
        let emoji = rank_items(&store(), ItemType::Emoji, &emoji_ranking);
        assert_eq!(emoji.len(), 1);
        assert!(emoji[0].is_emoji());
    }

    #[test]
    fn test_locations_pseudo_item() {
        let s = store();
        let ranked = rank_items(&s, ItemType::Locations, &ItemRanking::default());
        assert_eq!(ranked, vec![Item::locations(4)]);
        let guids = select_post_guids(&s, &ranked[0], TagMatchPolicy::HashtagOnly);
        assert_eq!(guids.len(), 5);
    }

    #[test]
    fn test_selection_follows_match_policy() {
        let s = store();
        let item = Item::new("altstadt", ItemType::Tags, 1);
        assert_eq!(
            select_post_guids(&s, &item, TagMatchPolicy::HashtagOnly),
            vec!["p4"]
        );
        assert_eq!(
            select_post_guids(&s, &item, TagMatchPolicy::HashtagOrBody),
            vec!["p4", "p5"]
        );
    }
}
