use super::{cluster_colors, ClusterWorker, Rgb};
use crate::algorithm::clustering::ClusterPartition;
use crate::compiler::{select_post_guids, ClusterShapeCompiler, TagMapsRun};
use crate::config::TagMapsConfiguration;
use crate::model::{ClusterShape, Item, LatLng, PostStore, TagMapsError};
use crate::util::UtmProjection;

/// clustering result of one item, ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPreview {
    pub points: Vec<LatLng>,
    pub labels: Vec<i32>,
    pub colors: Vec<Rgb>,
}

impl ClusterPreview {
    pub fn n_clusters(&self) -> usize {
        ClusterPartition::new(self.labels.clone()).n_clusters()
    }
}

/// state owned by an interactive front end while it tunes the cut distance. each call
/// recomputes from the post store and the current settings, nothing carries over
/// between calls except the cut distance.
pub struct ClusterSession<'a> {
    store: &'a PostStore,
    configuration: TagMapsConfiguration,
    projection: UtmProjection,
    cut_distance: f64,
    worker: ClusterWorker,
}

impl<'a> ClusterSession<'a> {
    pub fn new(
        store: &'a PostStore,
        configuration: TagMapsConfiguration,
    ) -> Result<ClusterSession<'a>, TagMapsError> {
        configuration.validate()?;
        let bounds = store.bounds(configuration.zero_coordinate_policy);
        let projection = TagMapsRun::resolve_projection(&configuration, &bounds)?;
        let cut_distance = TagMapsRun::resolve_cut_distance(&configuration, &bounds)?;
        Ok(ClusterSession {
            store,
            configuration,
            projection,
            cut_distance,
            worker: ClusterWorker::new()?,
        })
    }

    pub fn cut_distance(&self) -> f64 {
        self.cut_distance
    }

    pub fn projection(&self) -> &UtmProjection {
        &self.projection
    }

    pub fn set_cut_distance(&mut self, cut_distance: f64) -> Result<(), TagMapsError> {
        if !(cut_distance.is_finite() && cut_distance > 0.0) {
            return Err(TagMapsError::InvalidCutDistance(cut_distance));
        }
        self.cut_distance = cut_distance;
        Ok(())
    }

    /// the coordinates of the posts that reference the item, without clustering
    pub fn preview_selection(&self, item: &Item) -> Vec<LatLng> {
        select_post_guids(self.store, item, self.configuration.tag_match_policy)
            .into_iter()
            .filter_map(|guid| self.store.get(guid).ok())
            .filter_map(|p| p.location)
            .collect()
    }

    /// clusters the item at the current cut distance on the worker thread and blocks
    /// until the labels are available. selections of fewer than two posts are all noise.
    pub fn preview_clusters(&self, item: &Item) -> Result<ClusterPreview, TagMapsError> {
        let points = self.preview_selection(item);
        let partition = if points.len() < 2 {
            ClusterPartition::all_noise(points.len())
        } else {
            let parameters = self.configuration.engine_parameters(self.cut_distance);
            self.worker
                .fit_blocking(points.clone(), parameters)?
                .partition
        };
        let labels = partition.labels().to_vec();
        Ok(ClusterPreview {
            colors: cluster_colors(&labels),
            points,
            labels,
        })
    }

    /// the shapes the item would produce at the current cut distance
    pub fn preview_shapes(&self, item: &Item) -> Result<Vec<ClusterShape>, TagMapsError> {
        let compiler = ClusterShapeCompiler::new(
            self.store,
            self.projection,
            self.cut_distance,
            self.configuration.engine_parameters(self.cut_distance),
            self.configuration.tag_match_policy,
        )?;
        compiler.compile_item(item)
    }
}
