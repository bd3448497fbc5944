use serde::{Deserialize, Serialize};

use crate::algorithm::clustering::ClusterEngineParameters;
use crate::compiler::ItemRanking;
use crate::model::{ItemType, TagMapsError, TagMatchPolicy, ZeroCoordinatePolicy};

/// defines the behavior of a tag maps run. every field has a default so a configuration
/// file only needs to list what it changes.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct TagMapsConfiguration {
    /// cut distance in meters. unset or 0 derives a distance from the analysis bounds.
    pub cluster_distance: Option<f64>,
    /// use excess-of-mass cluster selection instead of cutting at the cluster distance
    pub auto_select_clusters: bool,
    /// log a minimum spanning tree summary per item
    pub create_min_spanning_tree: bool,
    pub min_samples: usize,
    /// EPSG code of a WGS84 UTM zone, otherwise chosen from the center of the bounds
    pub crs_override: Option<u32>,
    pub local_saturation_check: bool,
    /// drop tags used by fewer users than this. emoji use half the value.
    pub long_tail_min_users: Option<usize>,
    /// keep only the top ranked items of each item type
    pub max_items: Option<usize>,
    pub cluster_tags: bool,
    pub cluster_emoji: bool,
    pub cluster_locations: bool,
    pub tag_match_policy: TagMatchPolicy,
    pub zero_coordinate_policy: ZeroCoordinatePolicy,
    pub excluded_items: Vec<String>,
    pub parallelize: bool,
    /// write polygons as WGS84 instead of projected UTM coordinates
    pub output_wgs84: bool,
}

impl Default for TagMapsConfiguration {
    fn default() -> Self {
        Self {
            cluster_distance: None,
            auto_select_clusters: false,
            create_min_spanning_tree: false,
            min_samples: 1,
            crs_override: None,
            local_saturation_check: false,
            long_tail_min_users: None,
            max_items: None,
            cluster_tags: true,
            cluster_emoji: true,
            cluster_locations: false,
            tag_match_policy: TagMatchPolicy::default(),
            zero_coordinate_policy: ZeroCoordinatePolicy::default(),
            excluded_items: vec![],
            parallelize: true,
            output_wgs84: true,
        }
    }
}

impl TagMapsConfiguration {
    /// the configured cut distance if it is a usable value
    pub fn fixed_cluster_distance(&self) -> Option<f64> {
        self.cluster_distance.filter(|d| d.is_finite() && *d > 0.0)
    }

    /// item types enabled for clustering, in processing order
    pub fn item_types(&self) -> Vec<ItemType> {
        [
            (self.cluster_tags, ItemType::Tags),
            (self.cluster_emoji, ItemType::Emoji),
            (self.cluster_locations, ItemType::Locations),
        ]
        .into_iter()
        .filter_map(|(enabled, item_type)| enabled.then_some(item_type))
        .collect()
    }

    pub fn item_ranking(&self) -> ItemRanking {
        ItemRanking {
            long_tail_min_users: self.long_tail_min_users,
            max_items: self.max_items,
            excluded_items: self.excluded_items.clone(),
        }
    }

    /// cluster engine settings for a run with the given cut distance
    pub fn engine_parameters(&self, cut_distance: f64) -> ClusterEngineParameters {
        let mut parameters = if self.auto_select_clusters {
            ClusterEngineParameters::automatic()
        } else {
            ClusterEngineParameters::manual(cut_distance)
        };
        parameters.min_samples = self.min_samples.max(1);
        parameters.keep_spanning_tree = self.create_min_spanning_tree;
        parameters
    }

    /// checks values that serde accepts but a run cannot use
    pub fn validate(&self) -> Result<(), TagMapsError> {
        if let Some(d) = self.cluster_distance {
            if !d.is_finite() || d < 0.0 {
                return Err(TagMapsError::ConfigurationError(format!(
                    "cluster_distance must be a non-negative number of meters, found {d}"
                )));
            }
        }
        if self.min_samples == 0 {
            return Err(TagMapsError::ConfigurationError(String::from(
                "min_samples must be at least 1",
            )));
        }
        if let Some(code) = self.crs_override {
            if !(32601..=32660).contains(&code) && !(32701..=32760).contains(&code) {
                return Err(TagMapsError::InvalidCrs(code));
            }
        }
        if self.item_types().is_empty() {
            return Err(TagMapsError::ConfigurationError(String::from(
                "at least one of cluster_tags, cluster_emoji or cluster_locations must be enabled",
            )));
        }
        Ok(())
    }
}

impl TryFrom<&String> for TagMapsConfiguration {
    type Error = TagMapsError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let conf: TagMapsConfiguration = if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                TagMapsError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                TagMapsError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                TagMapsError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                TagMapsError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(TagMapsError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.validate()?;
        Ok(conf)
    }
}
