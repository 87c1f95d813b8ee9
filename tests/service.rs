//! Request-boundary behavior of `SummaryService`.
//!
//! Requires the `test-helpers` feature for the mock clock.

use std::sync::Arc;
use std::time::{Duration, Instant};
use textdigest::infrastructure::mocks::MockClock;
use textdigest::{RequestError, Settings, StopwordFilter, SummarizeRequest, SummaryService};

const DOCUMENT: &str = "Extractive summarization selects existing sentences from a document. \
    Each sentence is scored by the frequency of its words across the document. \
    Common stop words are ignored while counting word frequencies. \
    The highest scoring sentences are returned in their original order. \
    This keeps the summary faithful to the source text.";

fn service_with_clock(clock: &MockClock) -> SummaryService {
    SummaryService::builder()
        .with_clock(Arc::new(clock.clone()))
        .build()
        .unwrap()
}

#[test]
fn test_summarize_returns_result_and_quota() {
    let service = SummaryService::builder().build().unwrap();
    let request = SummarizeRequest::new(DOCUMENT).with_max_sentences(2);

    let response = service.summarize("198.51.100.1", &request).unwrap();
    assert_eq!(response.remaining, 9);
    assert!(response.value.truncated);
    assert_eq!(response.value.sentences_count, 2);

    let result = response.into_inner();
    assert_eq!(result.original_length, DOCUMENT.chars().count());
}

#[test]
fn test_default_max_sentences_applies() {
    let service = SummaryService::builder().build().unwrap();
    let response = service
        .summarize("client", &SummarizeRequest::new(DOCUMENT))
        .unwrap();

    // Five sentences against a default budget of five.
    assert!(!response.value.truncated);
    assert_eq!(response.value.sentences_count, 5);
}

#[test]
fn test_eleventh_request_is_rate_limited() {
    let clock = MockClock::new(Instant::now());
    let service = service_with_clock(&clock);
    let request = SummarizeRequest::new(DOCUMENT);

    for _ in 0..10 {
        assert!(service.summarize("A", &request).is_ok());
    }

    let err = service.summarize("A", &request).unwrap_err();
    assert_eq!(err.status_code(), 429);
    assert!(err.is_rate_limited());
    let body = err.body();
    assert_eq!(body.rate_limit, Some(10));
    assert_eq!(body.window_seconds, Some(60));

    assert!(service.summarize("B", &request).is_ok());

    clock.advance(Duration::from_secs(60));
    assert!(service.summarize("A", &request).is_ok());
}

#[test]
fn test_short_text_is_rejected() {
    let service = SummaryService::builder().build().unwrap();
    let err = service
        .summarize("c", &SummarizeRequest::new("Too short to summarize."))
        .unwrap_err();

    assert_eq!(
        err,
        RequestError::InvalidLength {
            length: 23,
            min: 100,
            max: 50_000
        }
    );
    assert_eq!(err.status_code(), 422);
}

#[test]
fn test_blank_text_is_rejected() {
    let service = SummaryService::builder().build().unwrap();
    let err = service
        .summarize("c", &SummarizeRequest::new(" ".repeat(150)))
        .unwrap_err();
    assert_eq!(err, RequestError::BlankText);
}

#[test]
fn test_max_sentences_out_of_range() {
    let service = SummaryService::builder().build().unwrap();

    for requested in [0, 21] {
        let request = SummarizeRequest::new(DOCUMENT).with_max_sentences(requested);
        let err = service.summarize("c", &request).unwrap_err();
        assert_eq!(
            err,
            RequestError::MaxSentencesOutOfRange { requested, cap: 20 }
        );
    }
}

#[test]
fn test_oversized_body_rejected_before_admission() {
    let service = SummaryService::builder()
        .with_rate_limit(1, Duration::from_secs(60))
        .build()
        .unwrap();
    let huge = "word ".repeat(20_000);

    for _ in 0..3 {
        let err = service
            .summarize("big", &SummarizeRequest::new(huge.clone()))
            .unwrap_err();
        assert_eq!(err.status_code(), 413);
        assert_eq!(err.body().max_size, Some(50_000));
    }

    // No quota was spent on the oversized attempts.
    assert!(service
        .summarize("big", &SummarizeRequest::new(DOCUMENT))
        .is_ok());
}

#[test]
fn test_invalid_request_still_consumes_quota() {
    let service = SummaryService::builder()
        .with_rate_limit(2, Duration::from_secs(60))
        .build()
        .unwrap();

    assert!(service
        .summarize("v", &SummarizeRequest::new("short"))
        .is_err());
    assert!(service
        .summarize("v", &SummarizeRequest::new(DOCUMENT))
        .is_ok());
    assert!(service
        .summarize("v", &SummarizeRequest::new(DOCUMENT))
        .unwrap_err()
        .is_rate_limited());
}

#[test]
fn test_upload_accepts_text_files() {
    let service = SummaryService::builder().build().unwrap();

    for name in ["notes.txt", "README.md"] {
        let response = service
            .summarize_upload("u", name, DOCUMENT.as_bytes(), Some(1))
            .unwrap();
        assert_eq!(response.value.sentences_count, 1);
        assert!(response.value.truncated);
    }
}

#[test]
fn test_upload_rejections() {
    let service = SummaryService::builder().build().unwrap();

    let err = service
        .summarize_upload("u", "paper.pdf", DOCUMENT.as_bytes(), None)
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.body().detail, "Only .txt and .md files are supported");

    let mut invalid = DOCUMENT.as_bytes().to_vec();
    invalid[10] = 0xFF;
    let err = service
        .summarize_upload("u", "bad.txt", &invalid, None)
        .unwrap_err();
    assert_eq!(err, RequestError::InvalidUtf8);

    let err = service
        .summarize_upload("u", "tiny.md", b"tiny", None)
        .unwrap_err();
    assert!(matches!(err, RequestError::InvalidLength { length: 4, .. }));

    let err = service
        .summarize_upload("u", "big.txt", "a".repeat(60_000).as_bytes(), None)
        .unwrap_err();
    assert_eq!(err.status_code(), 413);
}

#[test]
fn test_health_is_exempt_from_admission() {
    let service = SummaryService::builder()
        .with_rate_limit(1, Duration::from_secs(60))
        .build()
        .unwrap();

    for _ in 0..5 {
        let health = service.health();
        assert_eq!(health.status, "healthy");
        assert!(health.model_ready);
        assert_eq!(health.requests_remaining, 1);
    }
    assert_eq!(service.metrics().snapshot().total_requests(), 0);
    assert_eq!(service.admission().tracked_clients(), 0);
}

#[test]
fn test_info_lists_endpoints() {
    let settings = Settings {
        version: "1.2.3".to_string(),
        ..Settings::default()
    };
    let service = SummaryService::builder()
        .with_settings(settings)
        .build()
        .unwrap();
    let info = service.info();

    assert_eq!(info.message, "Document Summarizer API");
    assert_eq!(info.version, "1.2.3");
    assert_eq!(info.endpoints["summarize"], "/summarize");
    assert_eq!(info.endpoints["upload"], "/upload-summarize");
    assert_eq!(info.endpoints["health"], "/health");

    let json = serde_json::to_value(service.health()).unwrap();
    assert_eq!(json["version"], "1.2.3");
}

#[test]
fn test_settings_from_lookup_drive_the_service() {
    let settings = Settings::from_lookup(|key| match key {
        "MIN_CONTENT_LENGTH" => Some("10".to_string()),
        "RATE_LIMIT_REQUESTS" => Some("2".to_string()),
        "DEFAULT_MAX_SENTENCES" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();
    let service = SummaryService::builder()
        .with_settings(settings)
        .with_stopwords(StopwordFilter::empty())
        .build()
        .unwrap();

    let response = service
        .summarize("s", &SummarizeRequest::new("Rust rust. Go. Zig here."))
        .unwrap();
    assert_eq!(response.value.summary, "Rust rust.");
    assert_eq!(response.remaining, 1);
}

#[test]
fn test_json_request_round_trip_through_service() {
    let service = SummaryService::builder().build().unwrap();
    let body = serde_json::json!({ "text": DOCUMENT, "max_sentences": 3 }).to_string();

    let request: SummarizeRequest = serde_json::from_str(&body).unwrap();
    let response = service.summarize("j", &request).unwrap();
    let json = serde_json::to_value(&response.value).unwrap();

    assert_eq!(json["sentences_count"], 3);
    assert_eq!(json["truncated"], true);
}
