/// Rasterize an SVG scene into PNG bytes
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::rendering::RenderedCertificate;
use crate::{Error, Result};

pub fn rasterize(svg: &str, width: u32, height: u32, options: &Options) -> Result<RenderedCertificate> {
    let tree = Tree::from_str(svg, options).map_err(|e| Error::RenderError(e.to_string()))?;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        Error::RenderError(format!("failed to allocate {}x{} surface", width, height))
    })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let png_data = pixmap
        .encode_png()
        .map_err(|e| Error::EncodeError(e.to_string()))?;

    Ok(RenderedCertificate { width, height, png_data })
}
