use std::sync::mpsc::{self, Receiver, TryRecvError};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::algorithm::clustering::{cluster_points, ClusterEngineParameters, ClusterFit};
use crate::model::{LatLng, TagMapsError};

/// a single background thread that runs clustering fits so a caller driving an
/// interactive view stays responsive. fits run one at a time in submission order.
pub struct ClusterWorker {
    pool: ThreadPool,
}

/// handle to a fit submitted to a [`ClusterWorker`]
pub struct PendingFit {
    receiver: Receiver<Result<ClusterFit, TagMapsError>>,
}

impl ClusterWorker {
    pub fn new() -> Result<ClusterWorker, TagMapsError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(1)
            .thread_name(|idx| format!("tagmaps-cluster-{idx}"))
            .build()
            .map_err(|e| TagMapsError::WorkerError(format!("failed to start worker: {e}")))?;
        Ok(ClusterWorker { pool })
    }

    /// queues a fit and returns immediately
    pub fn submit(&self, points: Vec<LatLng>, parameters: ClusterEngineParameters) -> PendingFit {
        let (sender, receiver) = mpsc::channel();
        self.pool.spawn(move || {
            let result = cluster_points(&points, &parameters);
            // the receiver may have been dropped by a caller that lost interest
            let _ = sender.send(result);
        });
        PendingFit { receiver }
    }

    /// submits a fit and blocks until it completes
    pub fn fit_blocking(
        &self,
        points: Vec<LatLng>,
        parameters: ClusterEngineParameters,
    ) -> Result<ClusterFit, TagMapsError> {
        self.submit(points, parameters).wait()
    }
}

impl PendingFit {
    /// blocks until the fit completes
    pub fn wait(self) -> Result<ClusterFit, TagMapsError> {
        self.receiver.recv().map_err(|e| {
            TagMapsError::WorkerError(format!("worker stopped before returning a fit: {e}"))
        })?
    }

    /// the result if the fit has completed, `None` while it is still running
    pub fn try_result(&self) -> Option<Result<ClusterFit, TagMapsError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TagMapsError::WorkerError(
                String::from("worker stopped before returning a fit"),
            ))),
        }
    }
}
