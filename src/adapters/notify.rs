//! Progress Adapter - Tracing-Backed Notifications
//!
//! Routes transient progress events to `tracing`. UI embedders replace this
//! with a sink that drives their own notification surface; the CLI and
//! tests are happy with log lines.

use tracing::info;

use crate::ports::notify::{ProgressSink, TxProgress};

/// `ProgressSink` that logs each stage at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn progress(&self, stage: TxProgress) {
        info!(stage = ?stage, "{stage}");
    }
}
