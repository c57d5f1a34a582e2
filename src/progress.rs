//! Defines structures and types for progress reporting.

use std::sync::{Arc, Mutex};

/// Represents a snapshot of the progress during a long-running operation.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// A description of the current stage (e.g., "Downloading JMdict").
    pub stage_description: String,
    /// Number of items (or bytes) processed in the current stage.
    pub current_item: u64,
    /// Total number of items expected in the current stage (if known).
    pub total_items: Option<u64>,
    /// An optional message providing more context.
    pub message: Option<String>,
}

/// Type alias for the progress callback function.
///
/// The callback receives a `ProgressUpdate` and returns `true` to continue.
/// Returning `false` is currently ignored; stages always run to completion.
pub type ProgressCallback = Box<dyn FnMut(ProgressUpdate) -> bool + Send + Sync>;

/// Shared handle to a callback, cloned into each stage that reports.
pub type ProgressReporter = Arc<Mutex<ProgressCallback>>;

impl ProgressUpdate {
    pub fn new(
        stage_description: String,
        current_item: u64,
        total_items: Option<u64>,
        message: Option<String>,
    ) -> Self {
        ProgressUpdate {
            stage_description,
            current_item,
            total_items,
            message,
        }
    }

    /// Creates a new progress update for the start of a stage.
    pub fn new_stage(description: String, total_items: Option<u64>) -> Self {
        Self::new(description, 0, total_items, None)
    }
}

/// Wraps a callback so it can be shared between stages.
pub fn reporter(callback: ProgressCallback) -> ProgressReporter {
    Arc::new(Mutex::new(callback))
}

/// Sends `update` to the reporter. A poisoned lock drops the update.
pub fn report_progress(reporter: &ProgressReporter, update: ProgressUpdate) -> bool {
    match reporter.lock() {
        Ok(mut callback) => callback(update),
        Err(_) => {
            log::warn!("Progress reporter lock poisoned; dropping update.");
            true
        }
    }
}
