//! In-process progress bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ProgressBus`] is the live-subscriber side of observability: render
//! events and batch progress are published here as they happen, while
//! the durable copy of render events lives in the project's log.

use serde::{Deserialize, Serialize};
use shotflow_core::types::ProjectId;
use tokio::sync::broadcast;

use crate::record::RenderEvent;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// An event published to live subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A generation attempt finished (mirrors the render-log record).
    Render {
        project_id: ProjectId,
        event: RenderEvent,
    },
    /// Position report after each shot of a batch run.
    Batch {
        project_id: ProjectId,
        current: usize,
        total: usize,
        message: String,
    },
}

/// In-process fan-out bus for [`ProgressEvent`]s.
///
/// Shared via `Arc<ProgressBus>`; any number of subscribers independently
/// receive every published event. With zero subscribers, publishing is a
/// no-op.
pub struct ProgressBus {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ProgressBus {
    /// Create a bus with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ProgressEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
