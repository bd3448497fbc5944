use crate::model::{ClusterShape, Item};

/// share of the reference item's area above which an item counts as saturated
pub const LOCAL_SATURATION_THRESHOLD: f64 = 0.6;

/// drops items whose shapes cover a large share of the area covered by the top ranked
/// item. such items (e.g. "travel") are everywhere at the chosen map scale and do not
/// discriminate places. items must be offered in rank order, one filter per item type.
#[derive(Debug, Clone)]
pub struct LocalSaturationFilter {
    threshold: f64,
    reference: Option<(String, f64)>,
    excluded: usize,
}

impl Default for LocalSaturationFilter {
    fn default() -> Self {
        LocalSaturationFilter::new(LOCAL_SATURATION_THRESHOLD)
    }
}

impl LocalSaturationFilter {
    pub fn new(threshold: f64) -> LocalSaturationFilter {
        LocalSaturationFilter {
            threshold,
            reference: None,
            excluded: 0,
        }
    }

    /// area of the first item with shapes, the reference for all later items
    pub fn reference_area(&self) -> Option<f64> {
        self.reference.as_ref().map(|(_, area)| *area)
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded
    }

    /// true if the item's shapes are kept. the first item with a positive total area is
    /// always kept and becomes the reference.
    pub fn admit(&mut self, item: &Item, shapes: &[ClusterShape]) -> bool {
        let area = shapes.iter().map(|s| s.area()).sum::<f64>();
        let Some((reference_name, reference_area)) = self.reference.clone() else {
            if area > 0.0 {
                self.reference = Some((item.name.clone(), area));
            }
            return true;
        };
        if area > self.threshold * reference_area {
            log::info!(
                "excluding '{}' by local saturation: {:.0}m² is {:.0}% of '{}'",
                item.name,
                area,
                100.0 * area / reference_area,
                reference_name
            );
            self.excluded += 1;
            false
        } else {
            true
        }
    }
}
