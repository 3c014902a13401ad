/// Paint a `LayoutSpec` into an SVG scene
///
/// The scene is the hand-off between layout and rasterization: rectangles
/// map to `<rect>`, text runs to `<text>` anchored on their baseline.
use std::fmt::Write;

use crate::rendering::layout::{Align, DrawDirective, FontStyle, FontWeight, LayoutSpec};

pub fn paint_svg(spec: &LayoutSpec, font_family: &str) -> String {
    let mut svg = String::with_capacity(4096);
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = spec.width,
        h = spec.height
    );
    let family = escape_xml(font_family);

    for directive in &spec.directives {
        match directive {
            DrawDirective::FillRect { rect, color } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    color.to_hex()
                );
            }
            DrawDirective::StrokeRect { rect, line_width, color } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    color.to_hex(),
                    line_width
                );
            }
            DrawDirective::FillText { text, x, y, font, color, align } => {
                let anchor = match align {
                    Align::Left => "start",
                    Align::Center => "middle",
                    Align::Right => "end",
                };
                let weight = match font.weight {
                    FontWeight::Normal => "normal",
                    FontWeight::Bold => "bold",
                };
                let style = match font.style {
                    FontStyle::Normal => "normal",
                    FontStyle::Italic => "italic",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" text-anchor="{}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" fill="{}" xml:space="preserve">{}</text>"#,
                    x,
                    y,
                    anchor,
                    family,
                    font.size,
                    weight,
                    style,
                    color.to_hex(),
                    escape_xml(text)
                );
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Escape text for use in XML/HTML content and attribute values.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Not XML 1.0 characters: C0/C1 controls and the noncharacters
            // U+FFFE, U+FFFF.
            c if c.is_control() && c != '\t' && c != '\n' && c != '\r' => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
