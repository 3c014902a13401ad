//! Certificate request records and caller-side validation
//!
//! Requests arrive as loosely typed JSON. `Variant::parse` turns a body into
//! a validated `CertificateRequest`, rejecting absent or empty required
//! fields with `Error::Validation` before anything is drawn. The renderer
//! itself trusts the records it is handed.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Issuing company printed on every assessment certificate. Not caller
/// configurable.
pub const COMPANY_NAME: &str = "Toyota Kirloskar Motor Pvt Ltd";

/// Issuer printed on course certificates when the caller supplies none.
pub const DEFAULT_ISSUER: &str = "Certificate Authority";

/// Certificate schema and layout selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Dealer/assessment certificate
    Assessment,
    /// Generic course certificate with issuer and optional message
    Course,
}

impl Variant {
    /// Parse a raw JSON body (empty bodies count as `{}`) into a validated
    /// request for this variant.
    pub fn parse(self, body: &[u8]) -> Result<CertificateRequest> {
        self.parse_value(decode_body(body)?)
    }

    /// Validate an already decoded JSON value for this variant.
    pub fn parse_value(self, value: Value) -> Result<CertificateRequest> {
        if !value.is_object() {
            return Err(Error::InvalidRequest(
                "request body must be a JSON object".into(),
            ));
        }
        match self {
            Variant::Assessment => {
                let raw: RawAssessment = serde_json::from_value(value)?;
                raw.validate().map(CertificateRequest::Assessment)
            }
            Variant::Course => {
                let raw: RawCourse = serde_json::from_value(value)?;
                raw.validate().map(CertificateRequest::Course)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Assessment => "assessment",
            Variant::Course => "course",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "assessment" | "dealer" | "a" => Ok(Variant::Assessment),
            "course" | "b" => Ok(Variant::Course),
            other => Err(Error::ConfigError(format!("unknown variant '{}'", other))),
        }
    }
}

/// Dealer/assessment certificate record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentCertificate {
    pub name: String,
    pub dealer_name: String,
    pub dealer_code: String,
    pub date: String,
    pub assessment_name: String,
}

impl AssessmentCertificate {
    pub fn company_name(&self) -> &'static str {
        COMPANY_NAME
    }
}

/// Course certificate record. Optional wire fields are already resolved to
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCertificate {
    pub recipient_name: String,
    pub course_name: String,
    pub completion_date: String,
    pub certificate_id: String,
    pub issuer_name: String,
    /// Empty means "no message"; the message line is then not drawn.
    pub custom_message: String,
}

/// A validated request for one of the two certificate variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateRequest {
    Assessment(AssessmentCertificate),
    Course(CourseCertificate),
}

impl CertificateRequest {
    pub fn variant(&self) -> Variant {
        match self {
            CertificateRequest::Assessment(_) => Variant::Assessment,
            CertificateRequest::Course(_) => Variant::Course,
        }
    }

    /// Identifier used to name downloaded artifacts.
    pub fn identifier(&self) -> &str {
        match self {
            CertificateRequest::Assessment(a) => &a.name,
            CertificateRequest::Course(c) => &c.certificate_id,
        }
    }

    /// Labelled field values in display order, for markup rendering.
    pub fn display_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            CertificateRequest::Assessment(a) => vec![
                ("Name", a.name.as_str()),
                ("Dealer", a.dealer_name.as_str()),
                ("Dealer code", a.dealer_code.as_str()),
                ("Assessment", a.assessment_name.as_str()),
                ("Date", a.date.as_str()),
                ("Company", a.company_name()),
            ],
            CertificateRequest::Course(c) => {
                let mut fields = vec![
                    ("Recipient", c.recipient_name.as_str()),
                    ("Course", c.course_name.as_str()),
                    ("Completed on", c.completion_date.as_str()),
                    ("Certificate ID", c.certificate_id.as_str()),
                    ("Issuer", c.issuer_name.as_str()),
                ];
                if !c.custom_message.is_empty() {
                    fields.push(("Message", c.custom_message.as_str()));
                }
                fields
            }
        }
    }
}

impl From<AssessmentCertificate> for CertificateRequest {
    fn from(a: AssessmentCertificate) -> Self {
        CertificateRequest::Assessment(a)
    }
}

impl From<CourseCertificate> for CertificateRequest {
    fn from(c: CourseCertificate) -> Self {
        CertificateRequest::Course(c)
    }
}

// Wire shapes. Unknown keys (`format`, a caller-supplied `companyName`) are
// ignored.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessment {
    name: Option<String>,
    dealer_name: Option<String>,
    dealer_code: Option<String>,
    date: Option<String>,
    assessment_name: Option<String>,
}

impl RawAssessment {
    fn validate(self) -> Result<AssessmentCertificate> {
        let mut missing = Vec::new();
        let cert = AssessmentCertificate {
            name: require(self.name, "name", &mut missing),
            dealer_name: require(self.dealer_name, "dealerName", &mut missing),
            dealer_code: require(self.dealer_code, "dealerCode", &mut missing),
            date: require(self.date, "date", &mut missing),
            assessment_name: require(self.assessment_name, "assessmentName", &mut missing),
        };
        if missing.is_empty() {
            Ok(cert)
        } else {
            Err(Error::Validation { missing })
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCourse {
    recipient_name: Option<String>,
    course_name: Option<String>,
    completion_date: Option<String>,
    certificate_id: Option<String>,
    issuer_name: Option<String>,
    custom_message: Option<String>,
}

impl RawCourse {
    fn validate(self) -> Result<CourseCertificate> {
        let mut missing = Vec::new();
        let cert = CourseCertificate {
            recipient_name: require(self.recipient_name, "recipientName", &mut missing),
            course_name: require(self.course_name, "courseName", &mut missing),
            completion_date: require(self.completion_date, "completionDate", &mut missing),
            certificate_id: require(self.certificate_id, "certificateId", &mut missing),
            issuer_name: self
                .issuer_name
                .unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            custom_message: self.custom_message.unwrap_or_default(),
        };
        if missing.is_empty() {
            Ok(cert)
        } else {
            Err(Error::Validation { missing })
        }
    }
}

/// Decode a request body; blank bodies count as `{}`.
pub fn decode_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        Ok(Value::Object(Default::default()))
    } else {
        Ok(serde_json::from_slice(body)?)
    }
}

fn require(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}
