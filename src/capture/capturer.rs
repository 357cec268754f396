//! Page capturer: spawns the Playwright helper and parses its output.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::info;

use crate::types::PageRecord;
use crate::{Result, SpcError};

use super::script::{
    ensure_node_available, ensure_playwright_available, map_capture_error,
    map_capture_status_error, map_spawn_error, ScriptError, PAGE_STYLES_SCRIPT,
};

/// Default timeout for page navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for waiting for network idle state.
pub const DEFAULT_NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for the entire Playwright process.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(45);

/// Configuration options for capture sessions.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// The Node.js command to use (default: "node").
    pub node_command: String,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Timeout for page navigation.
    pub navigation_timeout: Duration,
    /// Timeout for waiting for network idle state.
    pub network_idle_timeout: Duration,
    /// Timeout for the entire Playwright process.
    pub process_timeout: Duration,
    /// Maximum number of concurrent capture sessions.
    pub max_concurrent_sessions: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            max_concurrent_sessions: 1,
        }
    }
}

/// Raw script output: computed styles per element.
#[derive(Debug, serde::Deserialize)]
struct CaptureResult {
    status: String,
    #[serde(default)]
    elements: Vec<PageRecord>,
}

/// Manages concurrent capture sessions with semaphore-based limiting.
#[derive(Debug, Clone)]
pub struct PageCapturer {
    options: CaptureOptions,
    semaphore: Arc<Semaphore>,
}

impl PageCapturer {
    /// Creates a new PageCapturer with the given options.
    pub fn new(options: CaptureOptions) -> Self {
        let permits = options.max_concurrent_sessions.max(1);
        Self {
            options,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Load a URL and collect computed styles for every element, or only for
    /// the given comma-separated selector list.
    pub async fn capture(&self, url: &str, selectors: Option<&str>) -> Result<Vec<PageRecord>> {
        // Fail fast if Node is missing to avoid spawning Playwright unnecessarily.
        ensure_node_available(&self.options.node_command).await?;
        ensure_playwright_available(&self.options.node_command).await?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SpcError::Browser("Page capturer unavailable".to_string()))?;

        self.run_script(url, selectors).await
    }

    async fn run_script(&self, url: &str, selectors: Option<&str>) -> Result<Vec<PageRecord>> {
        let mut cmd = Command::new(&self.options.node_command);
        cmd.arg("-e")
            .arg(PAGE_STYLES_SCRIPT)
            .arg(url)
            .arg(selectors.unwrap_or_default())
            .arg(self.options.navigation_timeout.as_millis().to_string())
            .arg(self.options.network_idle_timeout.as_millis().to_string())
            .arg(if self.options.headless { "1" } else { "0" })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|err| map_spawn_error(err, &self.options.node_command))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout_pipe {
                let _ = out.read_to_end(&mut buf).await;
            }
            buf
        });

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut err) = stderr_pipe {
                let _ = err.read_to_end(&mut buf).await;
            }
            buf
        });

        let status = match timeout(self.options.process_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(SpcError::Io(err)),
            Err(_) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                return Err(SpcError::Browser(format!(
                    "Playwright timed out after {:?}",
                    self.options.process_timeout
                )));
            }
        };

        let stdout = stdout_task.await.unwrap_or_else(|_| Vec::new());
        let stderr = stderr_task.await.unwrap_or_else(|_| Vec::new());

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(map_capture_error(status.to_string(), &stderr));
        }

        let stdout = String::from_utf8_lossy(&stdout);
        let result: CaptureResult = serde_json::from_str(&stdout).map_err(|e| {
            SpcError::Browser(format!(
                "Failed to parse Playwright output: {} - raw: {}",
                e,
                stdout.trim()
            ))
        })?;

        if result.status != "ok" {
            if let Ok(err) = serde_json::from_str::<ScriptError>(&stdout) {
                return Err(map_capture_status_error(&err.status, err.message));
            }
            return Err(SpcError::Browser(format!(
                "Playwright returned non-ok status: {}",
                result.status
            )));
        }

        info!(url, elements = result.elements.len(), "page captured");
        Ok(result.elements)
    }
}
