use std::sync::Arc;

use blackout::oracle::NoopOracle;
use blackout::output::{ImageExporter, PdfExporter};
use blackout::types::PageOrientation;
use blackout::{RedactionInput, RedactionIntensity, RedactionMode, RedactionRequest, RedactionResult};
use lopdf::{Document, Object};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::fixtures::{StubRenderer, TestFixtures};

async fn redacted_document(sizes: Vec<(u32, u32)>) -> RedactionResult {
    let redactor = TestFixtures::redactor(StubRenderer::new(sizes), Arc::new(NoopOracle));
    let request = RedactionRequest {
        input: RedactionInput::Document {
            name: "source.pdf".into(),
            bytes: vec![b'%'],
        },
        intensity: RedactionIntensity::new(35).unwrap(),
        mode: RedactionMode::Random,
    };
    redactor
        .generate(&request, &mut StdRng::seed_from_u64(21), &mut |_| {})
        .await
        .unwrap()
}

fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> Vec<i64> {
    let media_box = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .and_then(|d| d.get(b"MediaBox"))
        .unwrap();
    match media_box {
        Object::Array(values) => values.iter().map(|v| v.as_i64().unwrap()).collect(),
        other => panic!("MediaBox is not an array: {:?}", other),
    }
}

#[tokio::test]
async fn test_pdf_has_one_page_per_surface() {
    let result = redacted_document(vec![(60, 80), (100, 50), (70, 70)]).await;
    let export = PdfExporter::default().export(&result.pages).unwrap();

    let doc = Document::load_mem(&export.bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 3);

    let boxes: Vec<_> = pages.values().map(|id| media_box(&doc, *id)).collect();
    assert_eq!(
        boxes,
        vec![vec![0, 0, 120, 160], vec![0, 0, 200, 100], vec![0, 0, 140, 140]]
    );

    let orientations: Vec<_> = export.summary.pages.iter().map(|p| p.orientation).collect();
    assert_eq!(
        orientations,
        vec![PageOrientation::Portrait, PageOrientation::Landscape, PageOrientation::Portrait]
    );
}

#[tokio::test]
async fn test_pdf_carries_producer() {
    let result = redacted_document(vec![(40, 40)]).await;
    let export = PdfExporter::default().export(&result.pages).unwrap();

    let doc = Document::load_mem(&export.bytes).unwrap();
    let info = doc
        .trailer
        .get(b"Info")
        .and_then(|o| o.as_reference())
        .and_then(|id| doc.get_object(id))
        .and_then(|o| o.as_dict())
        .unwrap();
    assert!(info.get(b"Producer").is_ok());
    assert!(info.get(b"CreationDate").is_ok());
}

#[tokio::test]
async fn test_jpeg_pages_written_to_directory() {
    let result = redacted_document(vec![(30, 40), (40, 30)]).await;
    let dir = tempfile::tempdir().unwrap();

    let written = ImageExporter::default()
        .write_to_dir(&result.pages, dir.path())
        .unwrap();
    assert_eq!(
        written,
        vec![
            dir.path().join("redacted_page_1.jpg"),
            dir.path().join("redacted_page_2.jpg"),
        ]
    );

    let second = image::open(&written[1]).unwrap();
    assert_eq!((second.width(), second.height()), (80, 60));
}

#[tokio::test]
async fn test_text_result_exports_single_page() {
    let redactor = TestFixtures::redactor(StubRenderer::new(vec![]), Arc::new(NoopOracle));
    let request = RedactionRequest {
        input: RedactionInput::Text("one line of text".into()),
        intensity: RedactionIntensity::default(),
        mode: RedactionMode::Random,
    };
    let result = redactor
        .generate(&request, &mut StdRng::seed_from_u64(1), &mut |_| {})
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = PdfExporter::default().write_to(&result.pages, dir.path()).unwrap();
    let doc = Document::load(&path).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(media_box(&doc, pages[&1]), vec![0, 0, 800, 1100]);
}
