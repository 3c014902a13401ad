use certrender::{AsyncRenderer, RendererConfig, Variant};

fn config() -> RendererConfig {
    RendererConfig {
        font_family: "Tuffy".into(),
        load_system_fonts: false,
        font_dirs: vec![concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts").into()],
        render_timeout_ms: 0,
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_renders_agree() {
    let renderer = AsyncRenderer::new(&config()).expect("create renderer");
    let req = Variant::Assessment
        .parse(br#"{"name":"Jane Doe","dealerName":"Acme Motors","dealerCode":"AM01","date":"2024-01-01","assessmentName":"Sales Excellence"}"#)
        .unwrap();

    let (a, b, c) = tokio::join!(
        renderer.render(req.clone()),
        renderer.render(req.clone()),
        renderer.render(req)
    );
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
    assert_eq!(a.digest(), b.digest());
    assert_eq!(b.digest(), c.digest());
}

#[tokio::test]
async fn generous_timeout_does_not_fire() {
    let renderer = AsyncRenderer::new(&RendererConfig {
        render_timeout_ms: 60_000,
        ..config()
    })
    .unwrap();
    let req = Variant::Course
        .parse(br#"{"recipientName":"Ann","courseName":"Rust","completionDate":"2024-05-01","certificateId":"C-1","customMessage":"Nice"}"#)
        .unwrap();
    let out = renderer.render(req).await.expect("render within timeout");
    assert_eq!((out.width, out.height), (1200, 900));
}
