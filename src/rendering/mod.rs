//! Certificate rendering pipeline
//!
//! layout (request -> `LayoutSpec`) -> paint (`LayoutSpec` -> SVG scene) ->
//! raster (scene -> PNG). Only the font database is shared between calls and
//! it is never mutated after construction.

pub mod layout;
pub mod paint;
pub mod raster;

use std::sync::Arc;

use log::debug;
use resvg::usvg::fontdb::{Database, Family, Query};
use resvg::usvg::Options;
use sha2::{Digest, Sha256};

use crate::request::CertificateRequest;
use crate::{Error, RendererConfig, Result};

/// A finished certificate: PNG bytes plus the declared pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCertificate {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl RenderedCertificate {
    /// Hex SHA-256 of the PNG bytes.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png_data
    }
}

/// Stateless certificate renderer. Cheap to clone and safe to share across
/// threads.
#[derive(Clone)]
pub struct Renderer {
    fontdb: Arc<Database>,
    font_family: String,
}

impl Renderer {
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let mut db = Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            if !dir.is_dir() {
                return Err(Error::ConfigError(format!(
                    "font directory {} does not exist",
                    dir.display()
                )));
            }
            db.load_fonts_dir(dir);
        }
        // Without a matching face every text run would be dropped silently.
        if !resolves_family(&db, &config.font_family) {
            return Err(Error::ConfigError(format!(
                "none of the font families [{}] is available ({} faces loaded)",
                config.font_family,
                db.len()
            )));
        }
        debug!("Loaded {} font faces", db.len());

        Ok(Self {
            fontdb: Arc::new(db),
            font_family: config.font_family.clone(),
        })
    }

    /// Render a validated request to a 1200x900 PNG.
    pub fn render(&self, request: &CertificateRequest) -> Result<RenderedCertificate> {
        let spec = layout::layout_certificate(request);
        let svg = paint::paint_svg(&spec, &self.font_family);

        let mut options = Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        options.font_family = self.font_family.clone();

        let rendered = raster::rasterize(&svg, spec.width, spec.height, &options)?;
        debug!(
            "Rendered {} certificate ({} bytes)",
            request.variant(),
            rendered.png_data.len()
        );
        Ok(rendered)
    }

}

/// Whether any entry of a CSS-style family list matches a loaded face.
fn resolves_family(db: &Database, family_list: &str) -> bool {
    let families: Vec<Family<'_>> = family_list
        .split(',')
        .map(|f| f.trim().trim_matches(|c: char| c == '\'' || c == '"'))
        .filter(|f| !f.is_empty())
        .map(|f| match f.to_ascii_lowercase().as_str() {
            "serif" => Family::Serif,
            "sans-serif" => Family::SansSerif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            _ => Family::Name(f),
        })
        .collect();
    db.query(&Query {
        families: &families,
        ..Default::default()
    })
    .is_some()
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("fonts", &self.fontdb.len())
            .field("font_family", &self.font_family)
            .finish()
    }
}
