use std::sync::Arc;

use blackout::error::{DecodeError, Error, DECODE_ALERT};
use blackout::oracle::{NoopOracle, StaticOracle};
use blackout::surface::Color;
use blackout::{
    PopplerRenderer, RedactionInput, RedactionIntensity, RedactionMode, RedactionRequest,
    Redactor, RedactorConfig, Session,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::fixtures::{StubRenderer, TestFixtures};

fn text_request(text: &str, intensity: u8, mode: RedactionMode) -> RedactionRequest {
    RedactionRequest {
        input: RedactionInput::Text(text.to_string()),
        intensity: RedactionIntensity::new(intensity).unwrap(),
        mode,
    }
}

#[tokio::test]
async fn test_zero_intensity_never_redacts() {
    let redactor = TestFixtures::redactor(StubRenderer::new(vec![]), Arc::new(NoopOracle));

    for seed in [1, 2] {
        let result = redactor
            .generate(
                &text_request("Hello world", 0, RedactionMode::Random),
                &mut StdRng::seed_from_u64(seed),
                &mut |_| {},
            )
            .await
            .unwrap();

        let surface = &result.pages[0].surface;
        assert_eq!(surface.text_runs(), vec!["Hello ", "world "]);
        assert!(surface.filled_rects(Color::Black).is_empty());
        assert_eq!(result.stats.tokens_redacted, 0);
    }
}

#[tokio::test]
async fn test_full_intensity_blacks_out_in_every_mode() {
    let redactor = TestFixtures::redactor(
        StubRenderer::new(vec![]),
        Arc::new(StaticOracle::new(["nothing"])),
    );

    for mode in [RedactionMode::Random, RedactionMode::AiSensitive] {
        let result = redactor
            .generate(
                &text_request("alpha beta gamma", 100, mode),
                &mut StdRng::seed_from_u64(4),
                &mut |_| {},
            )
            .await
            .unwrap();

        assert_eq!(result.page_count(), 1);
        assert!(result.stats.full_blackout);
        assert_eq!(result.stats.tokens_redacted, 3);
        let surface = &result.pages[0].surface;
        assert!(surface.text_runs().is_empty());
        assert_eq!(surface.pixel(400, 550), [0, 0, 0]);
        assert_eq!(result.redacted_text.as_deref(), Some("█████ ████ █████"));
    }
}

#[tokio::test]
async fn test_two_page_document_reports_progress() {
    let renderer = StubRenderer::new(vec![(300, 400), (400, 300)]);
    let log = renderer.render_log();
    let opened = renderer.open_count();
    let redactor = TestFixtures::redactor(renderer, Arc::new(NoopOracle));
    let request = RedactionRequest {
        input: RedactionInput::Document {
            name: "two.pdf".into(),
            bytes: TestFixtures::pdf_with_pages(&[(300, 400), (400, 300)]),
        },
        intensity: RedactionIntensity::new(50).unwrap(),
        mode: RedactionMode::Random,
    };

    let mut percents = Vec::new();
    let result = redactor
        .generate(&request, &mut StdRng::seed_from_u64(11), &mut |update| {
            percents.push(update.percent)
        })
        .await
        .unwrap();

    assert_eq!(result.page_count(), 2);
    assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    assert_eq!(*opened.lock().unwrap(), 1);
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(percents.last(), Some(&100));
    assert_eq!(percents, vec![0, 50, 100]);

    // rendered at scale 2.0
    let first = &result.pages[0].surface;
    assert_eq!((first.width(), first.height()), (600, 800));
    assert!(result.stats.regions_filled > 0);
    assert!(result.original_text.is_none());
}

#[tokio::test]
async fn test_document_mode_is_ignored() {
    let redactor = TestFixtures::redactor(
        StubRenderer::new(vec![(100, 100)]),
        Arc::new(StaticOracle::new(["anything"])),
    );
    let request = RedactionRequest {
        input: RedactionInput::Document {
            name: "one.pdf".into(),
            bytes: vec![1],
        },
        intensity: RedactionIntensity::new(40).unwrap(),
        mode: RedactionMode::AiSensitive,
    };
    let result = redactor
        .generate(&request, &mut StdRng::seed_from_u64(3), &mut |_| {})
        .await
        .unwrap();

    assert_eq!(result.stats.phrases_detected, 0);
    assert_eq!(
        result.pages[0].surface.filled_rects(Color::Black).len(),
        result.stats.regions_filled
    );
}

#[tokio::test]
async fn test_undecodable_document_is_user_visible() {
    let redactor = Redactor::new(
        RedactorConfig::default(),
        Arc::new(PopplerRenderer::default()),
        Arc::new(NoopOracle),
    );
    let request = RedactionRequest {
        input: RedactionInput::Document {
            name: "notes.txt".into(),
            bytes: b"plain text, not a document".to_vec(),
        },
        intensity: RedactionIntensity::default(),
        mode: RedactionMode::Random,
    };

    let mut calls = 0;
    let err = redactor
        .generate(&request, &mut StdRng::seed_from_u64(0), &mut |_| calls += 1)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DecodeError(DecodeError::Malformed(_))));
    assert!(err.is_user_visible());
    assert_eq!(calls, 0);
    assert_eq!(DECODE_ALERT, "Error processing file. Please ensure it is a valid PDF.");
}

#[tokio::test]
async fn test_poppler_counts_pages_without_rendering() {
    use blackout::render::{DocumentRenderer, RenderedDocument};

    let renderer = PopplerRenderer::new("/nonexistent/pdftoppm");
    let bytes = TestFixtures::pdf_with_pages(&[(612, 792), (612, 792), (792, 612)]);
    let document = renderer.open(&bytes).await.unwrap();
    assert_eq!(document.page_count(), 3);
}

#[tokio::test]
async fn test_guard_released_after_failure() {
    let redactor = TestFixtures::redactor(StubRenderer::new(vec![]), Arc::new(NoopOracle));
    let blank = text_request("  ", 30, RedactionMode::Random);
    assert!(redactor
        .generate(&blank, &mut StdRng::seed_from_u64(0), &mut |_| {})
        .await
        .is_err());

    let ok = text_request("fine", 30, RedactionMode::Random);
    assert!(redactor
        .generate(&ok, &mut StdRng::seed_from_u64(0), &mut |_| {})
        .await
        .is_ok());
}

#[tokio::test]
async fn test_session_switches_between_inputs() {
    let redactor = TestFixtures::redactor(StubRenderer::new(vec![(80, 120)]), Arc::new(NoopOracle));
    let mut session = Session::new();
    session.set_intensity(60).unwrap();

    session.set_text("a few words to hide");
    let text_result = session
        .generate(&redactor, &mut StdRng::seed_from_u64(9), &mut |_| {})
        .await
        .unwrap();
    assert!(text_result.redacted_text.is_some());

    session.select_document("page.pdf", TestFixtures::pdf_with_pages(&[(80, 120)]));
    assert!(session.result().is_none());
    let doc_result = session
        .generate(&redactor, &mut StdRng::seed_from_u64(9), &mut |_| {})
        .await
        .unwrap();
    assert_eq!(doc_result.page_count(), 1);
    assert!(doc_result.redacted_text.is_none());
}

#[tokio::test]
async fn test_unrenderable_page_aborts_with_alert() {
    let renderer = StubRenderer::new(vec![(100, 100), (100, 100), (100, 100)]).with_unrenderable_page(2);
    let log = renderer.render_log();
    let redactor = TestFixtures::redactor(renderer, Arc::new(NoopOracle));

    let mut session = Session::new();
    session.set_text("an earlier run");
    session
        .generate(&redactor, &mut StdRng::seed_from_u64(1), &mut |_| {})
        .await
        .unwrap();

    session.select_document("corrupt.pdf", TestFixtures::pdf_with_pages(&[(100, 100); 3]));
    let err = session
        .generate(&redactor, &mut StdRng::seed_from_u64(1), &mut |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DecodeError(DecodeError::PageUnrenderable { page: 2, .. })));
    assert!(err.is_user_visible());
    assert!(session.result().is_none());
    assert_eq!(*log.lock().unwrap(), vec![1, 2]);
}
