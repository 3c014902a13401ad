use criterion::{criterion_group, criterion_main, Criterion};

use certrender::rendering::layout::layout_certificate;
use certrender::rendering::paint::paint_svg;
use certrender::{Renderer, RendererConfig, Variant};

const ASSESSMENT: &[u8] = br#"{"name":"Jane Doe","dealerName":"Acme Motors","dealerCode":"AM01","date":"2024-01-01","assessmentName":"Sales Excellence"}"#;
const COURSE: &[u8] = br#"{"recipientName":"Ann Lee","courseName":"Systems Programming","completionDate":"2024-05-01","certificateId":"C-42","customMessage":"Outstanding work"}"#;

fn config() -> RendererConfig {
    RendererConfig {
        font_family: "Tuffy".into(),
        load_system_fonts: false,
        font_dirs: vec![concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts").into()],
        ..Default::default()
    }
}

fn bench_layout(c: &mut Criterion) {
    let req = Variant::Course.parse(COURSE).unwrap();
    let family = config().font_family;

    c.bench_function("layout_and_paint_course", |b| {
        b.iter(|| {
            let spec = layout_certificate(&req);
            paint_svg(&spec, &family)
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let renderer = Renderer::new(&config()).expect("create renderer");
    let assessment = Variant::Assessment.parse(ASSESSMENT).unwrap();
    let course = Variant::Course.parse(COURSE).unwrap();

    let mut group = c.benchmark_group("render_png");
    group.sample_size(20);
    group.bench_function("assessment", |b| {
        b.iter(|| renderer.render(&assessment).unwrap())
    });
    group.bench_function("course", |b| b.iter(|| renderer.render(&course).unwrap()));
    group.finish();
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
