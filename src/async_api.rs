use std::time::Duration;

use crate::rendering::{RenderedCertificate, Renderer};
use crate::request::CertificateRequest;
use crate::{Error, RendererConfig, Result};

/// An async-friendly renderer.
///
/// Rendering is CPU bound, so each call runs on tokio's blocking pool and
/// the awaiting task only waits for the result. Calls are independent and
/// may run concurrently.
#[derive(Clone, Debug)]
pub struct AsyncRenderer {
    renderer: Renderer,
    timeout_ms: u64,
}

impl AsyncRenderer {
    pub fn new(config: &RendererConfig) -> Result<Self> {
        Ok(Self::from_renderer(Renderer::new(config)?, config.render_timeout_ms))
    }

    /// Wrap an existing renderer. `timeout_ms == 0` disables the guard.
    pub fn from_renderer(renderer: Renderer, timeout_ms: u64) -> Self {
        Self { renderer, timeout_ms }
    }

    pub async fn render(&self, request: CertificateRequest) -> Result<RenderedCertificate> {
        let renderer = self.renderer.clone();
        run_blocking(self.timeout_ms, move || renderer.render(&request)).await
    }
}

/// Run `job` on the blocking pool, giving up after `timeout_ms` (0 waits
/// forever).
async fn run_blocking<T, F>(timeout_ms: u64, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let job = tokio::task::spawn_blocking(job);

    let joined = if timeout_ms == 0 {
        job.await
    } else {
        // The blocking task keeps running to completion; only the caller
        // stops waiting for it.
        tokio::time::timeout(Duration::from_millis(timeout_ms), job)
            .await
            .map_err(|_| Error::Timeout(timeout_ms))?
    };

    joined.map_err(|e| Error::Other(format!("Render task failed: {}", e)))?
}
