use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;

use super::select_post_guids;
use crate::algorithm::alpha_shape::cluster_polygon;
use crate::algorithm::clustering::{cluster_points, ClusterEngineParameters};
use crate::model::{
    CleanedPost, ClusterShape, ClusterWeights, Item, LatLng, PostStore, TagMapsError,
    TagMatchPolicy,
};
use crate::util::UtmProjection;

/// turns the posts of one item into cluster shapes: selection, clustering, one polygon
/// and weight set per cluster, and one disk per noise post.
pub struct ClusterShapeCompiler<'a> {
    store: &'a PostStore,
    projection: UtmProjection,
    cut_distance: f64,
    engine: ClusterEngineParameters,
    match_policy: TagMatchPolicy,
}

impl<'a> ClusterShapeCompiler<'a> {
    pub fn new(
        store: &'a PostStore,
        projection: UtmProjection,
        cut_distance: f64,
        engine: ClusterEngineParameters,
        match_policy: TagMatchPolicy,
    ) -> Result<ClusterShapeCompiler<'a>, TagMapsError> {
        if !(cut_distance.is_finite() && cut_distance > 0.0) {
            return Err(TagMapsError::InvalidCutDistance(cut_distance));
        }
        Ok(ClusterShapeCompiler {
            store,
            projection,
            cut_distance,
            engine,
            match_policy,
        })
    }

    pub fn cut_distance(&self) -> f64 {
        self.cut_distance
    }

    pub fn projection(&self) -> &UtmProjection {
        &self.projection
    }

    /// all shapes of one item, clusters largest first, followed by noise singletons
    pub fn compile_item(&self, item: &Item) -> Result<Vec<ClusterShape>, TagMapsError> {
        let guids = select_post_guids(self.store, item, self.match_policy);
        self.compile_selection(item, &guids)
    }

    /// compiles shapes for an explicit selection of post guids. every guid must exist in
    /// the store and have a location.
    pub fn compile_selection(
        &self,
        item: &Item,
        guids: &[&str],
    ) -> Result<Vec<ClusterShape>, TagMapsError> {
        let posts = guids
            .iter()
            .map(|guid| self.store.get(guid))
            .collect::<Result<Vec<_>, _>>()?;
        let locations = posts
            .iter()
            .map(|p| located(p))
            .collect::<Result<Vec<_>, _>>()?;

        match posts.len() {
            0 => Ok(vec![]),
            1 => Ok(vec![self.build_shape(item, &posts, ClusterWeights::sentinel())?]),
            _ => {
                let fit = cluster_points(&locations, &self.engine)?;
                let mut shapes = Vec::with_capacity(fit.partition.n_clusters());
                for members in fit.partition.clusters_by_size() {
                    let cluster = members.iter().map(|idx| posts[*idx]).collect_vec();
                    let users = distinct_users(&cluster);
                    let weights = ClusterWeights::from_counts(cluster.len(), users);
                    shapes.push(self.build_shape(item, &cluster, weights)?);
                }
                for idx in fit.partition.noise_indices() {
                    shapes.push(self.build_shape(
                        item,
                        &[posts[idx]],
                        ClusterWeights::sentinel(),
                    )?);
                }
                log::debug!(
                    "{} '{}': {} posts, {} clusters, {} shapes",
                    item.item_type,
                    item.name,
                    posts.len(),
                    fit.partition.n_clusters(),
                    shapes.len()
                );
                Ok(shapes)
            }
        }
    }

    fn build_shape(
        &self,
        item: &Item,
        posts: &[&CleanedPost],
        weights: ClusterWeights,
    ) -> Result<ClusterShape, TagMapsError> {
        // distinct locations keyed by location id, many posts share one location
        let mut distinct: BTreeMap<&str, LatLng> = BTreeMap::new();
        for post in posts.iter() {
            distinct.entry(post.loc_id.as_str()).or_insert(located(post)?);
        }
        let coords = distinct
            .values()
            .map(|l| self.projection.project(l))
            .collect_vec();
        let (polygon, strategy) = cluster_polygon(&coords, self.cut_distance)?;

        Ok(ClusterShape {
            polygon,
            post_count: posts.len(),
            views: posts.iter().map(|p| p.post_views_count).sum(),
            user_count: distinct_users(posts),
            item_name: item.name.clone(),
            item_type: item.item_type,
            item_global_count: item.user_count,
            weights,
            strategy,
            post_guids: posts.iter().map(|p| p.guid.clone()).collect(),
        })
    }
}

fn located(post: &CleanedPost) -> Result<LatLng, TagMapsError> {
    post.location.ok_or_else(|| {
        TagMapsError::InternalError(format!("post '{}' has no location", post.guid))
    })
}

fn distinct_users(posts: &[&CleanedPost]) -> usize {
    posts
        .iter()
        .map(|p| p.user_guid.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemType, ShapeStrategy};

    fn compiler(store: &PostStore) -> ClusterShapeCompiler<'_> {
        ClusterShapeCompiler::new(
            store,
            UtmProjection::from_epsg(32631).unwrap(),
            100.0,
            ClusterEngineParameters::manual(100.0),
            TagMatchPolicy::HashtagOnly,
        )
        .unwrap()
    }

    fn tagged(guid: &str, user: &str, lat: f64, lng: f64) -> CleanedPost {
        CleanedPost::new(guid, user, LatLng::new(lat, lng)).with_hashtags(["pier"])
    }

    #[test]
    fn test_pair_and_outlier() {
        let store = PostStore::new(vec![
            tagged("a", "u1", 0.0, 0.0),
            tagged("b", "u2", 0.0001, 0.0001),
            tagged("c", "u3", 50.0, 50.0),
        ]);
        let shapes = compiler(&store)
            .compile_item(&Item::new("pier", ItemType::Tags, 3))
            .unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].strategy, ShapeStrategy::BufferedHull);
        assert_eq!(shapes[0].strategy.to_string(), "between 2 and 5 points");
        assert_eq!(shapes[0].post_count, 2);
        assert_eq!(shapes[0].user_count, 2);
        assert_eq!(shapes[0].weights, ClusterWeights::from_counts(2, 2));
        assert_eq!(shapes[1].strategy, ShapeStrategy::SinglePoint);
        assert_eq!(shapes[1].post_guids, vec!["c".to_string()]);
        assert_eq!(shapes[1].weights, ClusterWeights::sentinel());
        for shape in shapes.iter() {
            assert!(shape.area() > 0.0);
        }
    }

    #[test]
    fn test_single_post_skips_clustering() {
        let store = PostStore::new(vec![tagged("a", "u1", 10.0, 2.0)]);
        let shapes = compiler(&store)
            .compile_item(&Item::new("pier", ItemType::Tags, 1))
            .unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].strategy.to_string(), "1 point cluster");
        assert_eq!(shapes[0].weights, ClusterWeights::sentinel());
    }

    #[test]
    fn test_unused_item_gives_no_shapes() {
        let store = PostStore::new(vec![tagged("a", "u1", 10.0, 2.0)]);
        let shapes = compiler(&store)
            .compile_item(&Item::new("harbor", ItemType::Tags, 0))
            .unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_every_selected_post_is_covered() {
        let mut posts = vec![];
        for i in 0..30 {
            // a dense block of 20 posts and 10 scattered ones
            let (lat, lng) = if i < 20 {
                (48.0 + (i % 5) as f64 * 0.0002, 2.0 + (i / 5) as f64 * 0.0002)
            } else {
                (48.0 + i as f64 * 0.05, 2.5 + i as f64 * 0.03)
            };
            posts.push(tagged(&format!("p{i}"), &format!("u{}", i % 7), lat, lng));
        }
        let store = PostStore::new(posts);
        let shapes = compiler(&store)
            .compile_item(&Item::new("pier", ItemType::Tags, 7))
            .unwrap();
        let covered = shapes
            .iter()
            .flat_map(|s| s.post_guids.iter().cloned())
            .sorted()
            .collect_vec();
        let expected = (0..30).map(|i| format!("p{i}")).sorted().collect_vec();
        assert_eq!(covered, expected);
        // largest cluster first
        assert_eq!(shapes[0].post_count, 20);
        assert_eq!(shapes[0].strategy, ShapeStrategy::AlphaShape);
    }

    #[test]
    fn test_shared_location_counts_once() {
        let store = PostStore::new(vec![
            tagged("a", "u1", 52.0, 4.0),
            tagged("b", "u2", 52.0, 4.0),
            tagged("c", "u3", 52.0, 4.0),
        ]);
        let shapes = compiler(&store)
            .compile_item(&Item::new("pier", ItemType::Tags, 3))
            .unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].post_count, 3);
        assert_eq!(shapes[0].strategy, ShapeStrategy::SinglePoint);
    }

    #[test]
    fn test_missing_post_is_an_error() {
        let store = PostStore::new(vec![tagged("a", "u1", 10.0, 2.0)]);
        let result = compiler(&store)
            .compile_selection(&Item::new("pier", ItemType::Tags, 1), &["a", "zz"]);
        assert!(matches!(result, Err(TagMapsError::MissingPost(id)) if id == "zz"));
    }
}
