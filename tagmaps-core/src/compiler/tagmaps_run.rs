use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use itertools::Itertools;
use kdam::{Bar, BarExt};
use rayon::prelude::*;

use super::{compile_output, rank_items, ClusterShapeCompiler, LocalSaturationFilter, OutputShape};
use crate::config::TagMapsConfiguration;
use crate::model::{AnalysisBounds, ClusterShape, Item, ItemType, PostStore, RunSummary, TagMapsError};
use crate::session::AbortHandle;
use crate::util::{geo_utils, UtmProjection};

/// everything a writer needs from a completed run
#[derive(Debug, Clone)]
pub struct TagMapsOutput {
    pub shapes: Vec<OutputShape>,
    pub summary: RunSummary,
    pub projection: UtmProjection,
    pub cut_distance: f64,
    /// true if the run stopped early through its abort handle
    pub aborted: bool,
}

/// batch execution of the tag maps pipeline over one post store
pub struct TagMapsRun {
    configuration: TagMapsConfiguration,
    abort: AbortHandle,
}

impl TagMapsRun {
    pub fn new(configuration: TagMapsConfiguration) -> Result<TagMapsRun, TagMapsError> {
        configuration.validate()?;
        Ok(TagMapsRun {
            configuration,
            abort: AbortHandle::new(),
        })
    }

    pub fn configuration(&self) -> &TagMapsConfiguration {
        &self.configuration
    }

    /// a handle that stops the run before the next item is clustered
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// the configured UTM zone, otherwise the zone containing the center of the bounds
    pub fn resolve_projection(
        configuration: &TagMapsConfiguration,
        bounds: &AnalysisBounds,
    ) -> Result<UtmProjection, TagMapsError> {
        match configuration.crs_override {
            Some(code) => UtmProjection::from_epsg(code),
            None => {
                let center = bounds.center().ok_or(TagMapsError::EmptyBounds)?;
                UtmProjection::for_location(&center)
            }
        }
    }

    /// the configured cut distance, otherwise one derived from the size of the bounds
    pub fn resolve_cut_distance(
        configuration: &TagMapsConfiguration,
        bounds: &AnalysisBounds,
    ) -> Result<f64, TagMapsError> {
        match configuration.fixed_cluster_distance() {
            Some(d) => Ok(d),
            None => geo_utils::auto_cluster_distance(bounds).ok_or(TagMapsError::EmptyBounds),
        }
    }

    /// runs item ranking, per-item clustering and shape generation, local saturation and
    /// output compilation.
    ///
    /// # Arguments
    ///
    /// * `store` - the cleaned posts of this run
    ///
    /// # Returns
    ///
    /// the normalized shapes in rank order with run counters, or an error when the posts
    /// have no coordinates, no item survives ranking, or a post referenced by a cluster
    /// is missing.
    pub fn run(&self, store: &PostStore) -> Result<TagMapsOutput, TagMapsError> {
        let conf = &self.configuration;
        let bounds = store.bounds(conf.zero_coordinate_policy);
        if bounds.is_empty() {
            return Err(TagMapsError::EmptyBounds);
        }
        let projection = TagMapsRun::resolve_projection(conf, &bounds)?;
        let cut_distance = TagMapsRun::resolve_cut_distance(conf, &bounds)?;
        log::info!(
            "bounds lat [{:.5}, {:.5}] lng [{:.5}, {:.5}], projection {}, cut distance {:.1}m",
            bounds.lat_min,
            bounds.lat_max,
            bounds.lng_min,
            bounds.lng_max,
            projection,
            cut_distance
        );

        let ranking = conf.item_ranking();
        let items = conf
            .item_types()
            .into_iter()
            .flat_map(|item_type| rank_items(store, item_type, &ranking))
            .collect_vec();
        if items.is_empty() {
            return Err(TagMapsError::NothingToCluster);
        }
        log::info!("clustering {} items", items.len());

        let compiler = ClusterShapeCompiler::new(
            store,
            projection,
            cut_distance,
            conf.engine_parameters(cut_distance),
            conf.tag_match_policy,
        )?;
        let bar = Bar::builder()
            .desc("cluster items")
            .total(items.len())
            .build()
            .map_err(|e| TagMapsError::InternalError(format!("failed to build progress bar: {e}")))?;
        let bar = Arc::new(Mutex::new(bar));
        let compile = |item: &Item| -> Result<Option<Vec<ClusterShape>>, TagMapsError> {
            if self.abort.is_aborted() {
                return Ok(None);
            }
            let shapes = compiler.compile_item(item)?;
            if let Ok(mut bar) = bar.lock() {
                let _ = bar.update(1);
            }
            Ok(Some(shapes))
        };
        let compiled = if conf.parallelize {
            items
                .par_iter()
                .map(compile)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            items.iter().map(compile).collect::<Result<Vec<_>, _>>()?
        };
        eprintln!();

        let mut filters: HashMap<ItemType, LocalSaturationFilter> = HashMap::new();
        let mut kept: Vec<ClusterShape> = vec![];
        let mut processed = 0;
        let mut aborted = false;
        for (item, result) in items.iter().zip(compiled) {
            let Some(shapes) = result else {
                aborted = true;
                continue;
            };
            processed += 1;
            if shapes.is_empty() {
                continue;
            }
            if conf.local_saturation_check && item.item_type != ItemType::Locations {
                let filter = filters.entry(item.item_type).or_default();
                if !filter.admit(item, &shapes) {
                    continue;
                }
            }
            kept.extend(shapes);
        }
        if aborted {
            log::warn!(
                "run aborted after {processed} of {} items, writing partial results",
                items.len()
            );
        }

        let shapes = compile_output(kept);
        let summary = RunSummary {
            processed_items: processed,
            saturation_excluded_items: filters.values().map(|f| f.excluded_count()).sum(),
            total_shapes: shapes.len(),
            ..RunSummary::from_posts(store)
        };
        log::info!("{summary}");
        Ok(TagMapsOutput {
            shapes,
            summary,
            projection,
            cut_distance,
            aborted,
        })
    }
}
