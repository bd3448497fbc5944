use serde::{Deserialize, Serialize};

/// name of the pseudo-item used when clustering all locations at once
pub const LOCATIONS_ITEM_NAME: &str = "_locations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Tags,
    Emoji,
    Locations,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Tags => write!(f, "tags"),
            ItemType::Emoji => write!(f, "emoji"),
            ItemType::Locations => write!(f, "locations"),
        }
    }
}

/// a clustering unit: a tag, an emoji, or the locations pseudo-item. `user_count` is the
/// number of distinct users who used the item anywhere and drives ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub item_type: ItemType,
    pub user_count: usize,
}

impl Item {
    pub fn new(name: &str, item_type: ItemType, user_count: usize) -> Item {
        Item {
            name: name.to_string(),
            item_type,
            user_count,
        }
    }

    pub fn locations(user_count: usize) -> Item {
        Item::new(LOCATIONS_ITEM_NAME, ItemType::Locations, user_count)
    }

    pub fn is_emoji(&self) -> bool {
        self.item_type == ItemType::Emoji
    }
}
