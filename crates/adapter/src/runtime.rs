//! Adapter runtime integration.
//!
//! Bridges the sync game loop with an async submission writer.

use anyhow::Context;
use log::{info, warn};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::channel::{stats_channel, ChannelStatsSink};
use crate::core::RunReport;
use crate::protocol::SubmissionPayload;

/// Adapter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Bounded submission queue size
    pub submit_capacity: usize,
    /// Drop every submission instead of forwarding it
    pub disabled: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            submit_capacity: 16,
            disabled: false,
        }
    }
}

impl AdapterConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let submit_capacity = env::var("TETRAVERSUS_SUBMIT_CAPACITY")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(16);

        let disabled = env::var("TETRAVERSUS_SUBMIT_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            submit_capacity,
            disabled,
        }
    }
}

/// Write every queued report to `writer` as a JSON line until all senders are gone
///
/// Returns the number of submissions written.
pub async fn forward_submissions<W>(mut rx: mpsc::Receiver<RunReport>, mut writer: W) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(report) = rx.recv().await {
        let line = SubmissionPayload::from(&report)
            .to_json_line()
            .context("encode submission")?;
        writer
            .write_all(&line)
            .await
            .with_context(|| format!("write submission for run {}", report.run_id))?;
        writer.flush().await.context("flush submissions")?;
        written += 1;
    }
    Ok(written)
}

/// Running submission forwarder.
///
/// Owns a tokio runtime with one forwarding task. The game loop keeps the
/// returned [`ChannelStatsSink`]; once every sink clone is dropped the task
/// drains the queue and [`SubmissionRuntime::finish`] returns.
pub struct SubmissionRuntime {
    rt: Runtime,
    task: JoinHandle<anyhow::Result<u64>>,
}

impl SubmissionRuntime {
    /// Start forwarding into `writer`
    pub fn start<W>(config: &AdapterConfig, writer: W) -> anyhow::Result<(Self, ChannelStatsSink)>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let rt = Runtime::new().context("create tokio runtime")?;
        let (sink, rx) = stats_channel(config.submit_capacity);
        let task = rt.spawn(forward_submissions(rx, writer));
        info!(
            "submission forwarder started (queue capacity {})",
            config.submit_capacity.max(1)
        );
        Ok((Self { rt, task }, sink))
    }

    /// Start forwarding to stdout from environment variables.
    ///
    /// Returns None if `TETRAVERSUS_SUBMIT_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<(Self, ChannelStatsSink)>> {
        let config = AdapterConfig::from_env();
        if config.disabled {
            warn!("submissions disabled");
            return Ok(None);
        }
        Self::start(&config, tokio::io::stdout()).map(Some)
    }

    /// Wait for the forwarder to drain; every sink must have been dropped
    pub fn finish(self) -> anyhow::Result<u64> {
        let written = self
            .rt
            .block_on(self.task)
            .context("submission task panicked")??;
        info!("forwarded {} submission(s)", written);
        Ok(written)
    }
}
