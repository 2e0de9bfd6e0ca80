use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use resource_registry::{CloseError, CloseableResource, ResourceRef};

/// Shared ordered record of close invocations across a set of probes.
pub type CloseLog = Arc<Mutex<Vec<String>>>;

pub fn close_log() -> CloseLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Test resource that counts close invocations and optionally fails.
pub struct ProbeResource {
    label: String,
    fail: bool,
    closes: AtomicUsize,
    log: Option<CloseLog>,
}

impl ProbeResource {
    pub fn new(label: &str) -> Arc<Self> {
        Self::build(label, false, None)
    }

    pub fn failing(label: &str) -> Arc<Self> {
        Self::build(label, true, None)
    }

    pub fn with_log(label: &str, log: &CloseLog) -> Arc<Self> {
        Self::build(label, false, Some(Arc::clone(log)))
    }

    pub fn failing_with_log(label: &str, log: &CloseLog) -> Arc<Self> {
        Self::build(label, true, Some(Arc::clone(log)))
    }

    fn build(label: &str, fail: bool, log: Option<CloseLog>) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            fail,
            closes: AtomicUsize::new(0),
            log,
        })
    }

    /// Handle suitable for registration; identity is shared with `self`.
    pub fn handle(self: &Arc<Self>) -> ResourceRef {
        Arc::clone(self) as ResourceRef
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl CloseableResource for ProbeResource {
    fn close(&self) -> Result<(), CloseError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.label.clone());
        }
        if self.fail {
            Err(format!("{} failed to close", self.label).into())
        } else {
            Ok(())
        }
    }

    fn describe(&self) -> &str {
        &self.label
    }
}
