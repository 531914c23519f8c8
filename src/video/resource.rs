use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ResourceTag(u64);

impl ResourceTag {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Shared counter naming the resource currently on the timeline.
///
/// Work started for a resource keeps its tag and compares it against the
/// tracker when it completes; anything started before a replacement is stale.
#[derive(Clone, Debug, Default)]
pub struct ResourceTracker {
    current: Arc<AtomicU64>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self) -> ResourceTag {
        ResourceTag(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn current(&self) -> ResourceTag {
        ResourceTag(self.current.load(Ordering::Acquire))
    }

    pub fn is_current(&self, tag: ResourceTag) -> bool {
        self.current() == tag
    }
}
