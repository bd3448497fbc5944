mod abort_handle;
mod cluster_session;
mod cluster_worker;
mod color;

pub use abort_handle::AbortHandle;
pub use cluster_session::{ClusterPreview, ClusterSession};
pub use cluster_worker::{ClusterWorker, PendingFit};
pub use color::{cluster_colors, Rgb, NOISE_COLOR};
