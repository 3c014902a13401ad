#![cfg(feature = "server")]
//! End-to-end tests against a live server on an ephemeral port

use certrender::server::{CertificateServer, ServerHandle, ASSESSMENT_ROUTE, COURSE_ROUTE};
use certrender::{RendererConfig, ServerConfig};

const TOKEN: &str = "test-token";

fn start_server() -> ServerHandle {
    let config = ServerConfig {
        addr: "127.0.0.1:0".to_string(),
        token: Some(TOKEN.to_string()),
        workers: 2,
        renderer: RendererConfig {
            font_family: "Tuffy".into(),
            load_system_fonts: false,
            font_dirs: vec![concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts").into()],
            ..Default::default()
        },
        ..Default::default()
    };
    CertificateServer::bind(&config).expect("bind server").spawn()
}

fn post(handle: &ServerHandle, route: &str, auth: Option<&str>, body: &str) -> reqwest::blocking::Response {
    let client = reqwest::blocking::Client::new();
    let mut req = client
        .post(format!("http://{}{}", handle.addr(), route))
        .header("Content-Type", "application/json")
        .body(body.to_string());
    if let Some(a) = auth {
        req = req.header("Authorization", a);
    }
    req.send().expect("request")
}

#[test]
fn png_download_for_assessment() {
    let server = start_server();
    let resp = post(
        &server,
        ASSESSMENT_ROUTE,
        Some(&format!("Bearer {}", TOKEN)),
        r#"{"name":"Jane Doe","dealerName":"Acme Motors","dealerCode":"AM01","date":"2024-01-01","assessmentName":"Sales Excellence","format":"PNG"}"#,
    );
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"certificate-Jane Doe.png\""
    );
    let bytes = resp.bytes().expect("body");

    let decoder = png::Decoder::new(&bytes[..]);
    let reader = decoder.read_info().expect("decode");
    let info = reader.info();
    assert_eq!((info.width, info.height), (1200, 900));
}

#[test]
fn html_page_for_course() {
    let server = start_server();
    let resp = post(
        &server,
        COURSE_ROUTE,
        Some(&format!("Bearer {}", TOKEN)),
        r#"{"recipientName":"Ann Lee","courseName":"Rust","completionDate":"2024-05-01","certificateId":"C-42"}"#,
    );
    assert_eq!(resp.status().as_u16(), 200);
    let html = resp.text().expect("body");
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("Certificate Authority"));
}

#[test]
fn auth_failures() {
    let server = start_server();
    let body = "{}";
    assert_eq!(post(&server, COURSE_ROUTE, None, body).status().as_u16(), 401);
    assert_eq!(
        post(&server, COURSE_ROUTE, Some("Bearer wrong"), body).status().as_u16(),
        403
    );
}

#[test]
fn validation_failure_lists_missing_fields() {
    let server = start_server();
    let resp = post(
        &server,
        COURSE_ROUTE,
        Some(&format!("Bearer {}", TOKEN)),
        r#"{"recipientName":"Ann Lee","courseName":"Rust","completionDate":"2024-05-01"}"#,
    );
    assert_eq!(resp.status().as_u16(), 400);
    let v: serde_json::Value = serde_json::from_str(&resp.text().unwrap()).unwrap();
    assert_eq!(v["missing"], serde_json::json!(["certificateId"]));
}

#[test]
fn bind_without_token_fails() {
    let config = ServerConfig {
        addr: "127.0.0.1:0".to_string(),
        ..Default::default()
    };
    assert!(CertificateServer::bind(&config).is_err());
}

#[test]
fn bind_with_unavailable_font_fails() {
    let config = ServerConfig {
        addr: "127.0.0.1:0".to_string(),
        token: Some(TOKEN.to_string()),
        renderer: RendererConfig {
            font_family: "No Such Face".into(),
            load_system_fonts: false,
            font_dirs: vec![concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts").into()],
            ..Default::default()
        },
        ..Default::default()
    };
    match CertificateServer::bind(&config) {
        Err(certrender::Error::ConfigError(msg)) => assert!(msg.contains("No Such Face")),
        Err(other) => panic!("expected config error, got {:?}", other),
        Ok(_) => panic!("server started without a usable font"),
    }
}
