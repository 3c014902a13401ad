//! HTTP API over `tiny_http`
//!
//! Routing and response framing live in `Api::handle`, which knows nothing
//! about sockets so it can be tested directly. `CertificateServer` binds the
//! listener and runs worker threads that feed requests into it.

use std::io::Read;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{error, info, warn};
use serde_json::{json, Value};
use tiny_http::{Header, Request, Response, Server};

use crate::auth::BearerAuth;
use crate::present::{self, OutputFormat};
use crate::rendering::Renderer;
use crate::request::{decode_body, Variant};
use crate::{Error, Result, ServerConfig};

pub const ASSESSMENT_ROUTE: &str = "/api/generate-certificate";
pub const COURSE_ROUTE: &str = "/api/generate-course-certificate";

/// A response ready to be written to the wire
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn json(status: u16, value: Value) -> Self {
        ApiResponse {
            status,
            headers: vec![("Content-Type", "application/json".to_string())],
            body: value.to_string().into_bytes(),
        }
    }

    fn status_only(status: u16) -> Self {
        let reason = match status {
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            413 => "Payload Too Large",
            _ => "Error",
        };
        ApiResponse {
            status,
            headers: vec![("Content-Type", "text/plain; charset=utf-8".to_string())],
            body: reason.as_bytes().to_vec(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Transport-independent request handler
#[derive(Debug, Clone)]
pub struct Api {
    renderer: Renderer,
    auth: BearerAuth,
    max_body_bytes: usize,
}

impl Api {
    pub fn new(renderer: Renderer, auth: BearerAuth, max_body_bytes: usize) -> Self {
        Self { renderer, auth, max_body_bytes }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Handle one request. `path` may carry a query string, which is ignored.
    pub fn handle(&self, method: &str, path: &str, authorization: Option<&str>, body: &[u8]) -> ApiResponse {
        let route = path.split('?').next().unwrap_or(path);
        let variant = match route {
            ASSESSMENT_ROUTE => Variant::Assessment,
            COURSE_ROUTE => Variant::Course,
            _ => return ApiResponse::status_only(404),
        };
        if !method.eq_ignore_ascii_case("POST") {
            return ApiResponse::status_only(405);
        }

        let outcome = self.auth.check(authorization);
        if outcome != crate::auth::AuthOutcome::Authorized {
            return ApiResponse::status_only(outcome.status_code());
        }
        if body.len() > self.max_body_bytes {
            return ApiResponse::status_only(413);
        }

        match self.generate(variant, body) {
            Ok(resp) => resp,
            Err(Error::Validation { missing }) => ApiResponse::json(
                400,
                json!({
                    "error": format!(
                        "Missing required parameters. Please provide {}.",
                        missing.join(", ")
                    ),
                    "missing": missing,
                }),
            ),
            Err(err) if err.is_client_error() => {
                ApiResponse::json(400, json!({ "error": err.to_string() }))
            }
            Err(err) => {
                error!("Error generating certificate: {}", err);
                ApiResponse::json(500, json!({ "error": "Failed to generate certificate" }))
            }
        }
    }

    fn generate(&self, variant: Variant, body: &[u8]) -> Result<ApiResponse> {
        let value = decode_body(body)?;
        let format = OutputFormat::from_param(value.get("format").and_then(Value::as_str));
        let request = variant.parse_value(value)?;

        let certificate = self.renderer.render(&request)?;
        let etag = format!("\"{}\"", certificate.digest());

        let resp = match format {
            OutputFormat::Png => ApiResponse {
                status: 200,
                headers: vec![
                    ("Content-Type", "image/png".to_string()),
                    ("Content-Disposition", present::content_disposition(&request)),
                    ("ETag", etag),
                ],
                body: certificate.into_bytes(),
            },
            OutputFormat::Html => ApiResponse {
                status: 200,
                headers: vec![
                    ("Content-Type", "text/html; charset=utf-8".to_string()),
                    ("ETag", etag),
                ],
                body: present::html_page(&request, &certificate).into_bytes(),
            },
        };
        Ok(resp)
    }
}

/// A bound HTTP listener plus the handler it serves
pub struct CertificateServer {
    server: Arc<Server>,
    api: Arc<Api>,
    workers: usize,
}

impl CertificateServer {
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::ConfigError("no API token configured".into()))?;
        let renderer = Renderer::new(&config.renderer)?;
        let api = Api::new(renderer, BearerAuth::new(token), config.max_body_bytes);

        let server = Server::http(config.addr.as_str())
            .map_err(|e| Error::ConfigError(format!("cannot listen on {}: {}", config.addr, e)))?;
        info!("Certificate API listening on http://{}", server.server_addr());

        Ok(Self {
            server: Arc::new(server),
            api: Arc::new(api),
            workers: config.workers.max(1),
        })
    }

    /// Bound address, useful when listening on port 0.
    pub fn addr(&self) -> String {
        self.server.server_addr().to_string()
    }

    /// Spawn the worker threads and return immediately.
    pub fn spawn(self) -> ServerHandle {
        let threads = (0..self.workers)
            .map(|_| {
                let server = Arc::clone(&self.server);
                let api = Arc::clone(&self.api);
                thread::spawn(move || {
                    for request in server.incoming_requests() {
                        serve_one(&api, request);
                    }
                })
            })
            .collect();
        ServerHandle { server: self.server, threads }
    }

    /// Serve until the listener is shut down.
    pub fn run(self) {
        self.spawn().join();
    }
}

/// Running server; dropping it leaves the workers running.
pub struct ServerHandle {
    server: Arc<Server>,
    threads: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> String {
        self.server.server_addr().to_string()
    }

    /// Stop accepting requests and wait for the workers to finish.
    pub fn shutdown(self) {
        for _ in &self.threads {
            self.server.unblock();
        }
        self.join();
    }

    fn join(self) {
        for t in self.threads {
            if t.join().is_err() {
                warn!("Server worker panicked");
            }
        }
    }
}

fn serve_one(api: &Api, mut request: Request) {
    let method = request.method().as_str().to_string();
    let path = request.url().to_string();
    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());

    // Read one byte past the limit so oversize bodies are detected.
    let limit = api.max_body_bytes() as u64 + 1;
    let mut body = Vec::new();
    let resp = match request.as_reader().take(limit).read_to_end(&mut body) {
        Ok(_) => api.handle(&method, &path, authorization.as_deref(), &body),
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            ApiResponse::json(400, json!({ "error": "Unreadable request body" }))
        }
    };
    info!("{} {} -> {}", method, path, resp.status);

    let mut response = Response::from_data(resp.body).with_status_code(resp.status);
    for (name, value) in resp.headers {
        match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(h) => response.add_header(h),
            Err(()) => warn!("Dropping invalid {} header", name),
        }
    }
    if let Err(e) = request.respond(response) {
        warn!("Failed to write response: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RendererConfig;

    fn api() -> Api {
        let renderer = Renderer::new(&RendererConfig {
            font_family: "Tuffy".into(),
            load_system_fonts: false,
            font_dirs: vec![concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts").into()],
            ..Default::default()
        })
        .unwrap();
        Api::new(renderer, BearerAuth::new("t0ken"), 1024)
    }

    const COURSE_BODY: &[u8] = br#"{"recipientName":"Ann","courseName":"Rust","completionDate":"2024-05-01","certificateId":"C-7","format":"png"}"#;

    #[test]
    fn unknown_route_is_404() {
        assert_eq!(api().handle("POST", "/nope", Some("Bearer t0ken"), b"{}").status, 404);
    }

    #[test]
    fn wrong_method_is_405() {
        assert_eq!(api().handle("GET", COURSE_ROUTE, Some("Bearer t0ken"), b"").status, 405);
    }

    #[test]
    fn auth_runs_before_validation() {
        let api = api();
        assert_eq!(api.handle("POST", COURSE_ROUTE, None, b"{}").status, 401);
        assert_eq!(api.handle("POST", COURSE_ROUTE, Some("Bearer bad"), b"{}").status, 403);
        assert_eq!(api.handle("POST", COURSE_ROUTE, Some("Bearer  t0ken"), b"{}").status, 403);
    }

    #[test]
    fn blank_body_validates_as_empty_object() {
        for body in [&b""[..], b"  \n"] {
            let resp = api().handle("POST", COURSE_ROUTE, Some("Bearer t0ken"), body);
            assert_eq!(resp.status, 400);
            let v: Value = serde_json::from_slice(&resp.body).unwrap();
            assert_eq!(
                v["missing"],
                json!(["recipientName", "courseName", "completionDate", "certificateId"])
            );
        }
    }

    #[test]
    fn xml_noncharacters_in_fields_still_render() {
        let body = "{\"recipientName\":\"Ann\u{FFFE}\u{FFFF}\",\"courseName\":\"Rust\",\"completionDate\":\"2024-05-01\",\"certificateId\":\"C-8\",\"format\":\"png\"}";
        let resp = api().handle("POST", COURSE_ROUTE, Some("Bearer t0ken"), body.as_bytes());
        assert_eq!(resp.status, 200);
        assert_eq!(&resp.body[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn missing_fields_are_listed() {
        let resp = api().handle(
            "POST",
            COURSE_ROUTE,
            Some("Bearer t0ken"),
            br#"{"recipientName":"Ann","courseName":"Rust","completionDate":"2024-05-01"}"#,
        );
        assert_eq!(resp.status, 400);
        let v: Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(v["missing"], json!(["certificateId"]));
    }

    #[test]
    fn malformed_json_is_400() {
        let resp = api().handle("POST", ASSESSMENT_ROUTE, Some("Bearer t0ken"), b"{oops");
        assert_eq!(resp.status, 400);
    }

    #[test]
    fn oversize_body_is_413() {
        let big = vec![b' '; 2048];
        let resp = api().handle("POST", ASSESSMENT_ROUTE, Some("Bearer t0ken"), &big);
        assert_eq!(resp.status, 413);
    }

    #[test]
    fn png_format_returns_attachment() {
        let resp = api().handle("POST", COURSE_ROUTE, Some("Bearer t0ken"), COURSE_BODY);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("content-type"), Some("image/png"));
        assert_eq!(
            resp.header("Content-Disposition"),
            Some("attachment; filename=\"certificate-C-7.png\"")
        );
        assert_eq!(&resp.body[0..8], b"\x89PNG\r\n\x1a\n");
        assert!(resp.header("ETag").is_some());
    }

    #[test]
    fn html_is_the_default_format() {
        let body = br#"{"name":"Jane","dealerName":"Acme","dealerCode":"AM01","date":"2024-01-01","assessmentName":"Sales"}"#;
        let resp = api().handle("POST", "/api/generate-certificate?x=1", Some("Bearer t0ken"), body);
        assert_eq!(resp.status, 200);
        let html = String::from_utf8(resp.body).unwrap();
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("Acme"));
    }
}
