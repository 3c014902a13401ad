/// Declarative certificate layouts
///
/// A `LayoutSpec` is an ordered list of draw directives on a fixed canvas.
/// Each variant contributes one spec built from its request fields; the
/// painter interprets every spec the same way.
use crate::request::{AssessmentCertificate, CertificateRequest, CourseCertificate};

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 900;

const CENTER_X: f32 = CANVAS_WIDTH as f32 / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const LIGHT_GRAY: Color = Color::rgb(0xf5, 0xf5, 0xf5);
    pub const GOLD: Color = Color::rgb(0xd4, 0xaf, 0x37);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontSpec {
    pub const fn regular(size: f32) -> Self {
        FontSpec { size, weight: FontWeight::Normal, style: FontStyle::Normal }
    }

    pub const fn bold(size: f32) -> Self {
        FontSpec { size, weight: FontWeight::Bold, style: FontStyle::Normal }
    }

    pub const fn italic(size: f32) -> Self {
        FontSpec { size, weight: FontWeight::Normal, style: FontStyle::Italic }
    }
}

/// Horizontal anchoring of a text run relative to its x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Rectangle inset by `inset` on every side of a `width`×`height` canvas.
    pub fn inset(width: u32, height: u32, inset: f32) -> Self {
        Rect {
            x: inset,
            y: inset,
            width: width as f32 - 2.0 * inset,
            height: height as f32 - 2.0 * inset,
        }
    }
}

/// One drawing step. `y` of text is the alphabetic baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawDirective {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        line_width: f32,
        color: Color,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        font: FontSpec,
        color: Color,
        align: Align,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSpec {
    pub width: u32,
    pub height: u32,
    pub directives: Vec<DrawDirective>,
}

impl LayoutSpec {
    /// Start a certificate: background fill, gold outer border, black inner
    /// border. Shared by both variants.
    pub fn certificate_frame(background: Color) -> Self {
        let (width, height) = (CANVAS_WIDTH, CANVAS_HEIGHT);
        let directives = vec![
            DrawDirective::FillRect {
                rect: Rect::inset(width, height, 0.0),
                color: background,
            },
            DrawDirective::StrokeRect {
                rect: Rect::inset(width, height, 50.0),
                line_width: 15.0,
                color: Color::GOLD,
            },
            DrawDirective::StrokeRect {
                rect: Rect::inset(width, height, 70.0),
                line_width: 2.0,
                color: Color::BLACK,
            },
        ];
        LayoutSpec { width, height, directives }
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        font: FontSpec,
        color: Color,
        align: Align,
    ) -> &mut Self {
        self.directives.push(DrawDirective::FillText {
            text: text.into(),
            x,
            y,
            font,
            color,
            align,
        });
        self
    }

    /// Centered text on the vertical axis of the canvas.
    pub fn centered(
        &mut self,
        text: impl Into<String>,
        y: f32,
        font: FontSpec,
        color: Color,
    ) -> &mut Self {
        self.text(text, CENTER_X, y, font, color, Align::Center)
    }

    /// All text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().filter_map(|d| match d {
            DrawDirective::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn background(&self) -> Option<Color> {
        match self.directives.first() {
            Some(DrawDirective::FillRect { color, .. }) => Some(*color),
            _ => None,
        }
    }
}

/// Build the layout for a validated request.
pub fn layout_certificate(request: &CertificateRequest) -> LayoutSpec {
    match request {
        CertificateRequest::Assessment(a) => layout_assessment(a),
        CertificateRequest::Course(c) => layout_course(c),
    }
}

pub fn layout_assessment(cert: &AssessmentCertificate) -> LayoutSpec {
    let mut spec = LayoutSpec::certificate_frame(Color::WHITE);
    let right_x = spec.width as f32 - 150.0;

    spec.centered("Certificate of Completion", 170.0, FontSpec::bold(50.0), Color::BLACK)
        .centered("This is to certify that", 250.0, FontSpec::regular(28.0), Color::BLACK)
        .centered(cert.name.as_str(), 320.0, FontSpec::bold(48.0), Color::GOLD)
        .centered(
            format!("{} - {}", cert.dealer_name, cert.dealer_code),
            390.0,
            FontSpec::regular(28.0),
            Color::BLACK,
        )
        .centered("has successfully completed", 460.0, FontSpec::regular(28.0), Color::BLACK)
        // Lands on the name's baseline and covers it.
        .centered(cert.assessment_name.as_str(), 320.0, FontSpec::italic(28.0), Color::GOLD)
        // The footer keeps the italic gold style of the assessment line.
        .text(cert.date.as_str(), 150.0, 650.0, FontSpec::italic(28.0), Color::GOLD, Align::Left)
        .text(cert.company_name(), right_x, 650.0, FontSpec::italic(28.0), Color::GOLD, Align::Right);
    spec
}

pub fn layout_course(cert: &CourseCertificate) -> LayoutSpec {
    let mut spec = LayoutSpec::certificate_frame(Color::LIGHT_GRAY);

    spec.centered("Certificate of Completion", 170.0, FontSpec::bold(50.0), Color::BLACK)
        .centered("This is to certify that", 250.0, FontSpec::regular(28.0), Color::BLACK)
        .centered(cert.recipient_name.as_str(), 320.0, FontSpec::bold(48.0), Color::GOLD)
        .centered(
            "has successfully completed the course",
            390.0,
            FontSpec::regular(28.0),
            Color::BLACK,
        )
        .centered(cert.course_name.as_str(), 460.0, FontSpec::bold(40.0), Color::GOLD)
        .centered(
            format!("Completed on: {}", cert.completion_date),
            530.0,
            FontSpec::regular(28.0),
            Color::BLACK,
        );

    if !cert.custom_message.is_empty() {
        spec.centered(
            format!("\"{}\"", cert.custom_message),
            600.0,
            FontSpec::italic(24.0),
            Color::BLACK,
        );
    }

    spec.centered(
        format!("Certificate ID: {}", cert.certificate_id),
        680.0,
        FontSpec::regular(20.0),
        Color::BLACK,
    )
    .centered(cert.issuer_name.as_str(), 750.0, FontSpec::bold(32.0), Color::BLACK);
    spec
}
