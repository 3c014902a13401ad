//! certrender
//!
//! Renders completion certificates onto a fixed 1200x900 canvas and encodes
//! them as PNG. Two certificate variants share one layout engine:
//!
//! - **Assessment**: dealer/assessment certificate with a fixed issuing company
//! - **Course**: course certificate with issuer and optional message
//!
//! Validation happens before rendering (`Variant::parse`); the renderer
//! itself trusts its input and either fully succeeds or returns an error.
//! The optional `server` feature adds a small authenticated HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use certrender::{Renderer, RendererConfig, Variant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = Renderer::new(&RendererConfig::default())?;
//! let request = Variant::Course.parse(br#"{
//!     "recipientName": "Ann Lee",
//!     "courseName": "Systems Programming",
//!     "completionDate": "2024-05-01",
//!     "certificateId": "C-42"
//! }"#)?;
//! let certificate = renderer.render(&request)?;
//! std::fs::write("certificate.png", &certificate.png_data)?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod auth;
pub mod present;
pub mod rendering;
pub mod request;

// Async facade over the blocking renderer
pub mod async_api;

#[cfg(feature = "server")]
pub mod server;

pub use async_api::AsyncRenderer;
pub use rendering::{RenderedCertificate, Renderer};
pub use request::{AssessmentCertificate, CertificateRequest, CourseCertificate, Variant};

/// Renderer configuration
///
/// Defaults load the system fonts and ask for Arial, falling back through
/// common metric-compatible faces to any sans-serif.
///
/// # Examples
///
/// ```
/// let cfg = certrender::RendererConfig::default();
/// assert!(cfg.font_family.starts_with("Arial"));
/// assert!(cfg.load_system_fonts);
/// ```
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// CSS-style font family list used for every text run
    pub font_family: String,
    /// Whether to load fonts installed on the host
    pub load_system_fonts: bool,
    /// Additional directories scanned for font files
    pub font_dirs: Vec<PathBuf>,
    /// Upper bound for one async render in milliseconds (0 => no guard)
    pub render_timeout_ms: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial, 'Liberation Sans', 'DejaVu Sans', sans-serif".to_string(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            render_timeout_ms: 10_000,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub addr: String,
    /// Static bearer token; the server refuses to start without one
    pub token: Option<String>,
    /// Number of worker threads handling requests
    pub workers: usize,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    pub renderer: RendererConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".to_string(),
            token: None,
            workers: default_workers(),
            max_body_bytes: 100 * 1024,
            renderer: RendererConfig::default(),
        }
    }
}

#[cfg(feature = "server")]
fn default_workers() -> usize {
    num_cpus::get()
}

#[cfg(not(feature = "server"))]
fn default_workers() -> usize {
    1
}
