//! Last-writer-wins inputs shared between the sensor producers and the control tick.
//!
//! Producers may run on other threads; each write and each snapshot holds the
//! lock for the duration of a clone, so the tick never observes a torn sample.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::perception::{PoseSample, ScanSample};

/// Latest samples as seen at a tick boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub pose: Option<PoseSample>,
    pub scan: Option<ScanSample>,
}

/// Cloneable handle to the latest pose and scan
#[derive(Debug, Clone, Default)]
pub struct SharedInputs {
    inner: Arc<Mutex<InputSnapshot>>,
}

impl SharedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest pose sample
    pub fn set_pose(&self, sample: PoseSample) {
        self.inner.lock().pose = Some(sample);
    }

    /// Replace the latest scan sample
    pub fn set_scan(&self, sample: ScanSample) {
        self.inner.lock().scan = Some(sample);
    }

    /// Copy of both samples taken under one lock
    pub fn snapshot(&self) -> InputSnapshot {
        self.inner.lock().clone()
    }

    pub fn clear(&self) {
        *self.inner.lock() = InputSnapshot::default();
    }
}
