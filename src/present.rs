//! Presentation of rendered certificates: attachment download or an HTML
//! page with the PNG embedded as a data URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::rendering::paint::escape_xml;
use crate::rendering::RenderedCertificate;
use crate::request::CertificateRequest;

/// Response format requested by the caller. Anything other than `png`
/// selects the HTML page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Png,
}

impl OutputFormat {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("png") => OutputFormat::Png,
            _ => OutputFormat::Html,
        }
    }
}

pub fn data_uri(certificate: &RenderedCertificate) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(&certificate.png_data))
}

/// `certificate-<id>.png`, with characters that would break a quoted
/// header value or a file path replaced by `_`.
pub fn attachment_filename(identifier: &str) -> String {
    let safe: String = identifier
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect();
    format!("certificate-{}.png", safe)
}

/// `Content-Disposition` value for raw-bytes downloads.
pub fn content_disposition(request: &CertificateRequest) -> String {
    format!(
        "attachment; filename=\"{}\"",
        attachment_filename(request.identifier())
    )
}

/// Server-rendered page showing the certificate image and its fields.
pub fn html_page(request: &CertificateRequest, certificate: &RenderedCertificate) -> String {
    let mut rows = String::new();
    for (label, value) in request.display_fields() {
        rows.push_str(&format!(
            "      <dt>{}</dt><dd>{}</dd>\n",
            escape_xml(label),
            escape_xml(value)
        ));
    }

    let title = format!("Certificate of Completion - {}", request.identifier());
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Arial, sans-serif; background: #fafafa; margin: 2rem; }}
    .certificate img {{ max-width: 100%; border: 1px solid #ddd; }}
    dl {{ display: grid; grid-template-columns: max-content auto; gap: .25rem 1rem; }}
    dt {{ font-weight: bold; }}
  </style>
</head>
<body>
  <main class="certificate">
    <img src="{src}" width="{width}" height="{height}" alt="{title}">
    <dl>
{rows}    </dl>
  </main>
</body>
</html>
"#,
        title = escape_xml(&title),
        src = data_uri(certificate),
        width = certificate.width,
        height = certificate.height,
        rows = rows,
    )
}
