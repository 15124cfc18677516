//! Per-keyframe in-flight guard.
//!
//! Two overlapping generate calls for the same (project, shot, role)
//! would race each other's status transitions. The guard check-and-sets
//! an in-progress marker before the first transition; a second call for
//! the same keyframe is refused with a conflict until the first resolves.
//! The marker is released on drop, so every exit path (success, failure,
//! early `?`) releases it.

use std::collections::HashSet;
use std::sync::Mutex;

use shotflow_core::camera::FrameRole;
use shotflow_core::error::CoreError;
use shotflow_core::types::{EntityId, ProjectId};

type FrameKey = (ProjectId, EntityId, FrameRole);

/// Tracks keyframes with a generation call in flight.
#[derive(Debug, Default)]
pub struct InflightGuard {
    inflight: Mutex<HashSet<FrameKey>>,
}

impl InflightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-set the in-progress marker for one keyframe.
    ///
    /// Fails with [`CoreError::Conflict`] when a generation call for the
    /// same keyframe is already in flight.
    pub fn acquire(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        role: FrameRole,
    ) -> Result<InflightToken<'_>, CoreError> {
        let key = (project_id, shot_id.to_string(), role);
        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        if !inflight.insert(key.clone()) {
            return Err(CoreError::Conflict(format!(
                "A generation call for the {role} frame of shot {shot_id} is already in flight"
            )));
        }
        Ok(InflightToken { guard: self, key })
    }

    fn release(&self, key: &FrameKey) {
        self.inflight
            .lock()
            .expect("inflight lock poisoned")
            .remove(key);
    }
}

/// Marker held for the duration of one generation call.
#[must_use = "dropping the token releases the in-flight marker"]
pub struct InflightToken<'a> {
    guard: &'a InflightGuard,
    key: FrameKey,
}

impl Drop for InflightToken<'_> {
    fn drop(&mut self) {
        self.guard.release(&self.key);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
