use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::application::services::HealthReporter;
use crate::domain::entities::{FrameCache, IngestLifecycle};
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{FrameSource, MetricsReporter};
use crate::domain::value_objects::{ConnectionState, RetryPolicy};

/// Application service running the ingestion loop: it owns the frame
/// source, drives the reconnect state machine and is the sole writer of
/// the frame cache and the published connection state.
pub struct IngestService {
    source: Box<dyn FrameSource>,
    lifecycle: IngestLifecycle,
    retry_policy: RetryPolicy,
    cache: Arc<FrameCache>,
    metrics: Arc<dyn MetricsReporter>,
    running: Arc<AtomicBool>,
    state_tx: watch::Sender<ConnectionState>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl IngestService {
    pub fn new(
        source: Box<dyn FrameSource>,
        retry_policy: RetryPolicy,
        cache: Arc<FrameCache>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        Self {
            source,
            lifecycle: IngestLifecycle::new(),
            retry_policy,
            cache,
            metrics,
            running: Arc::new(AtomicBool::new(false)),
            state_tx,
            state_rx,
        }
    }

    /// Shared stop flag; storing `false` makes the loop exit at its next
    /// safe point (after the in-flight connect or read returns)
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn current_state(&self) -> ConnectionState {
        self.lifecycle.current_state()
    }

    pub fn lifecycle(&self) -> &IngestLifecycle {
        &self.lifecycle
    }

    pub fn health_reporter(&self) -> HealthReporter {
        HealthReporter::new(self.state_rx.clone())
    }

    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Run ingestion with automatic reconnection until stopped or the
    /// reconnect budget is exhausted.
    ///
    /// Blocks on transport I/O; run it on a blocking task. Transport errors
    /// never escape here. The only error returned is the terminal
    /// `ReconnectBudgetExhausted`, and even that leaves the process alive
    /// with the last frame still cached.
    pub fn run_with_reconnect(&mut self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);

        while self.running.load(Ordering::SeqCst) {
            self.transition(|l| l.transition_to_connecting());

            // Tear down whatever transport the previous cycle left behind
            // before opening a fresh one; close is idempotent.
            self.source.close();

            match self.source.connect() {
                Ok(()) => {
                    tracing::info!(url = %self.source.config().url(), "connected to source");
                    self.transition(|l| l.transition_to_connected());
                    self.read_until_failure();
                }
                Err(e) => {
                    let failures = self.lifecycle.record_connect_failure();
                    self.metrics.report_reconnect_attempt();
                    tracing::warn!(attempt = failures, "connect failed: {}", e);

                    if self.retry_policy.budget_exhausted(failures) {
                        tracing::error!(
                            "reconnect budget exhausted after {} attempts, stopping ingestion",
                            failures
                        );
                        self.stop_with_reason(format!(
                            "reconnect budget exhausted after {} attempts",
                            failures
                        ));
                        self.source.close();
                        return Err(DomainError::ReconnectBudgetExhausted { attempts: failures });
                    }

                    self.transition(|l| l.transition_to_disconnected(Some(e.to_string())));
                    std::thread::sleep(self.retry_policy.retry_interval());
                }
            }
        }

        // Requested stop: release the transport, keep the cache intact for
        // any reader still polling.
        self.source.close();
        if !self.lifecycle.current_state().is_terminal() {
            self.stop_with_reason("shutdown requested".to_string());
        }
        tracing::info!("ingestion stopped");
        Ok(())
    }

    /// Pull frames into the cache until the transport fails or a stop is
    /// requested. A read failure only flips the state to `Disconnected`;
    /// the next cycle's connect is responsible for teardown-then-reopen.
    fn read_until_failure(&mut self) {
        let frame_interval = self.source.config().frame_interval();

        while self.running.load(Ordering::SeqCst) {
            match self.source.read_frame() {
                Ok(frame) => {
                    self.cache.write(frame);
                    self.metrics.report_frame_ingested();
                    if let Some(uptime) = self.lifecycle.uptime() {
                        self.metrics.report_uptime(uptime.as_secs_f64());
                    }
                    std::thread::sleep(frame_interval);
                }
                Err(e) => {
                    tracing::warn!("frame read failed: {}", e);
                    self.transition(|l| l.transition_to_disconnected(Some(e.to_string())));
                    return;
                }
            }
        }
    }

    /// Request the loop to stop at its next safe point
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn stop_with_reason(&mut self, reason: String) {
        self.running.store(false, Ordering::SeqCst);
        self.transition(|l| l.transition_to_stopped(Some(reason)));
    }

    fn transition(&mut self, apply: impl FnOnce(&mut IngestLifecycle)) {
        apply(&mut self.lifecycle);
        let state = self.lifecycle.current_state();
        self.state_tx.send_replace(state);
        self.metrics.report_state_change(&state);
    }
}
