use serde::{Deserialize, Serialize};

/// weight assigned to shapes that carry no real measurement (single posts). normalization
/// passes it through unchanged.
pub const SENTINEL_WEIGHT: f64 = 1.0;

/// three importance lenses for one cluster.
///
/// * `v1` - penalizes clusters dominated by few users strongly (cubed post/user ratio)
/// * `v2` - penalizes user dominance moderately (squared ratio)
/// * `v3` - ignores user diversity, grows with post count only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterWeights {
    pub v1: f64,
    pub v2: f64,
    pub v3: f64,
}

impl ClusterWeights {
    pub fn sentinel() -> ClusterWeights {
        ClusterWeights {
            v1: SENTINEL_WEIGHT,
            v2: SENTINEL_WEIGHT,
            v3: SENTINEL_WEIGHT,
        }
    }

    /// computes the weights for a cluster with `post_count` posts by `user_count` distinct users.
    /// the +1 on the user count avoids a jump between one and two users.
    pub fn from_counts(post_count: usize, user_count: usize) -> ClusterWeights {
        let posts = post_count as f64;
        let ratio = posts / (user_count as f64 + 1.0);
        let v1 = posts * (1.0 / ratio.powi(3)).sqrt();
        let v2 = posts * (1.0 / ratio.powi(2)).sqrt();
        let v3 = ((posts + 2.0 * posts.sqrt()) * 2.0).sqrt();
        ClusterWeights { v1, v2, v3 }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.v1, self.v2, self.v3]
    }
}
