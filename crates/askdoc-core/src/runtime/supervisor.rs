//! Model process lifecycle management
//!
//! Acquires the model (`pull`), launches the runtime (`run`) as a detached
//! child, waits for readiness, and terminates the child on shutdown. The
//! child handle is owned exclusively by the supervisor; no other component
//! signals or reaps it.

use crate::config::RuntimeConfig;
use crate::error::{AskDocError, Result};
use crate::llm::{ChatMessage, LlmClient};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};

/// Single-attempt model invocation.
///
/// The trait seam lets the pipeline run against a mock in tests; the real
/// implementor is [`ModelSupervisor`].
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send one single-turn prompt and return the generated text
    async fn invoke(&self, prompt: &str) -> Result<String>;
}

/// Lifecycle state of the supervised runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    NotStarted,
    Downloading,
    Starting,
    Ready,
    Terminated,
    Failed,
}

/// Supervises the local inference runtime process.
///
/// A `Terminated` or `Failed` supervisor can be started again; that spawns
/// a fresh child. The child is spawned with `kill_on_drop` so abnormal host
/// exit does not leak the process.
pub struct ModelSupervisor {
    config: RuntimeConfig,
    client: Arc<dyn LlmClient>,
    child: Option<Child>,
    state: ModelState,
}

impl ModelSupervisor {
    /// Create a supervisor for the configured runtime
    pub fn new(config: RuntimeConfig, client: Arc<dyn LlmClient>) -> Self {
        Self {
            config,
            client,
            child: None,
            state: ModelState::NotStarted,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Acquire the model and launch the runtime.
    ///
    /// Acquisition runs to completion first; the runtime is never launched
    /// for a model that failed to download. Stdio of the pull child is
    /// inherited so download progress stays visible.
    pub async fn start(&mut self) -> Result<()> {
        self.state = ModelState::Downloading;
        tracing::info!("Pulling model {}", self.config.model);

        let pull_status = Command::new(&self.config.bin)
            .arg("pull")
            .arg(&self.config.model)
            .status()
            .await;

        let pull_status = match pull_status {
            Ok(status) => status,
            Err(e) => {
                self.state = ModelState::Failed;
                return Err(AskDocError::AcquisitionFailed(format!(
                    "failed to run '{} pull {}': {e}",
                    self.config.bin, self.config.model
                )));
            }
        };

        if !pull_status.success() {
            self.state = ModelState::Failed;
            return Err(AskDocError::AcquisitionFailed(format!(
                "'{} pull {}' exited with {}",
                self.config.bin, self.config.model, pull_status
            )));
        }

        tracing::info!("Launching runtime for {}", self.config.model);
        let spawned = Command::new(&self.config.bin)
            .arg("run")
            .arg(&self.config.model)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                self.child = Some(child);
                self.state = ModelState::Starting;
                Ok(())
            }
            Err(e) => {
                self.state = ModelState::Failed;
                Err(AskDocError::AcquisitionFailed(format!(
                    "failed to launch '{} run {}': {e}",
                    self.config.bin, self.config.model
                )))
            }
        }
    }

    /// Wait until the runtime accepts requests.
    ///
    /// Polls the health endpoint until it answers or the configured timeout
    /// elapses. When probing is disabled, sleeps for the configured fixed
    /// delay instead; that path assumes readiness rather than observing it.
    pub async fn wait_ready(&mut self) -> Result<()> {
        let readiness = &self.config.readiness;

        if !readiness.probe {
            tracing::debug!(
                "Readiness probe disabled, waiting {}s",
                readiness.fixed_delay_secs
            );
            sleep(Duration::from_secs(readiness.fixed_delay_secs)).await;
            self.state = ModelState::Ready;
            return Ok(());
        }

        let deadline = Instant::now() + Duration::from_secs(readiness.timeout_secs);
        loop {
            if self.client.health().await.is_ok() {
                tracing::info!("Runtime is ready");
                self.state = ModelState::Ready;
                return Ok(());
            }

            if let Some(child) = self.child.as_mut() {
                if let Ok(Some(status)) = child.try_wait() {
                    // The launcher may hand off to an already-running daemon
                    // and exit; readiness is still decided by the probe.
                    tracing::debug!("Runtime launcher exited with {status} while waiting");
                    self.child = None;
                }
            }

            if Instant::now() >= deadline {
                self.state = ModelState::Failed;
                return Err(AskDocError::ReadinessTimeout(readiness.timeout_secs));
            }

            sleep(Duration::from_millis(readiness.poll_interval_ms)).await;
        }
    }

    /// Terminate the runtime process.
    ///
    /// Best-effort kill and reap; safe to call when the process already
    /// exited or was never launched.
    pub async fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::info!("Stopping runtime");
            if let Err(e) = child.kill().await {
                tracing::debug!("Runtime process already gone: {e}");
            }
            self.state = ModelState::Terminated;
            return;
        }

        match self.state {
            ModelState::NotStarted | ModelState::Terminated | ModelState::Failed => {}
            _ => self.state = ModelState::Terminated,
        }
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: ModelState) {
        self.state = state;
    }
}

#[async_trait]
impl ModelInvoker for ModelSupervisor {
    /// Send one single-turn request to the runtime.
    ///
    /// No automatic retry; every failure maps to `InvokeFailed` and the
    /// caller decides whether to retry, log, or abort.
    async fn invoke(&self, prompt: &str) -> Result<String> {
        if self.state != ModelState::Ready {
            return Err(AskDocError::InvokeFailed(format!(
                "runtime is not ready (state: {:?})",
                self.state
            )));
        }

        self.client.chat(vec![ChatMessage::user(prompt)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadinessConfig;
    use crate::llm::OllamaClient;
    use crate::config::{EmbeddingConfig, GenerationConfig};

    fn unreachable_config() -> RuntimeConfig {
        RuntimeConfig {
            bin: "/nonexistent/askdoc-test-runtime".to_string(),
            model: "no-such-model".to_string(),
            // Port 9 (discard) is not served on loopback
            url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            readiness: ReadinessConfig {
                probe: true,
                timeout_secs: 1,
                poll_interval_ms: 100,
                fixed_delay_secs: 0,
            },
        }
    }

    fn supervisor() -> ModelSupervisor {
        let config = unreachable_config();
        let client = OllamaClient::new(
            &config,
            &EmbeddingConfig::default(),
            &GenerationConfig::default(),
        )
        .unwrap();
        ModelSupervisor::new(config, Arc::new(client))
    }

    #[tokio::test]
    async fn test_start_with_unresolvable_binary_fails_acquisition() {
        let mut supervisor = supervisor();
        let result = supervisor.start().await;
        assert!(matches!(result, Err(AskDocError::AcquisitionFailed(_))));
        assert_eq!(supervisor.state(), ModelState::Failed);
    }

    #[tokio::test]
    async fn test_stop_after_failed_start_is_noop() {
        let mut supervisor = supervisor();
        let _ = supervisor.start().await;
        supervisor.stop().await;
        assert_eq!(supervisor.state(), ModelState::Failed);
        // A second stop is equally harmless
        supervisor.stop().await;
    }

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let mut supervisor = supervisor();
        supervisor.stop().await;
        assert_eq!(supervisor.state(), ModelState::NotStarted);
    }

    #[tokio::test]
    async fn test_wait_ready_times_out_against_dead_endpoint() {
        let mut supervisor = supervisor();
        supervisor.force_state(ModelState::Starting);
        let result = supervisor.wait_ready().await;
        assert!(matches!(result, Err(AskDocError::ReadinessTimeout(1))));
        assert_eq!(supervisor.state(), ModelState::Failed);
    }

    #[tokio::test]
    async fn test_fixed_delay_fallback_reports_ready() {
        let mut supervisor = supervisor();
        supervisor.config.readiness.probe = false;
        supervisor.force_state(ModelState::Starting);
        supervisor.wait_ready().await.unwrap();
        assert_eq!(supervisor.state(), ModelState::Ready);
    }

    #[tokio::test]
    async fn test_invoke_refused_unless_ready() {
        let supervisor = supervisor();
        let result = supervisor.invoke("question").await;
        assert!(matches!(result, Err(AskDocError::InvokeFailed(_))));
    }
}
