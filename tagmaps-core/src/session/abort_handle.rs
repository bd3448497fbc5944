use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// shared flag that asks a run to stop before its next item. items already being
/// clustered finish normally.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> AbortHandle {
        AbortHandle::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_flag() {
        let handle = AbortHandle::new();
        let other = handle.clone();
        assert!(!other.is_aborted());
        handle.abort();
        assert!(other.is_aborted());
        other.reset();
        assert!(!handle.is_aborted());
    }
}
