/// Document preview tests
///
/// Locator fallback, download recovery and view state of the report preview.
/// Run with: cargo test --test document_preview_tests

use async_trait::async_trait;
use impactdesk::model::NewReport;
use impactdesk::preview::{DocumentSource, ZoomRange, ZoomState, load_preview};
use impactdesk::{DocumentPreview, Entity, EntityId, Locator, PreviewState, RenderFailure, Report};
use std::collections::HashMap;
use std::sync::Mutex;

/// Source answering from a fixed table and recording every locator it was asked for.
struct TableSource {
    pages: HashMap<&'static str, usize>,
    requested: Mutex<Vec<String>>,
}

impl TableSource {
    fn new(pages: &[(&'static str, usize)]) -> Self {
        Self {
            pages: pages.iter().copied().collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSource for TableSource {
    async fn load(&self, locator: &Locator) -> Result<usize, RenderFailure> {
        self.requested.lock().unwrap().push(locator.to_string());
        self.pages
            .get(locator.as_str())
            .copied()
            .ok_or_else(|| RenderFailure {
                locator: locator.to_string(),
                reason: "404 Not Found".to_string(),
            })
    }
}

fn report(file_url: Option<&str>, signed_url: Option<&str>) -> Report {
    let mut report = Report::from_draft(
        EntityId::from("65f1c2ab9d0e44a7b1"),
        NewReport::pdf(EntityId::from("p-1"), "Annual impact"),
    );
    report.file_url = file_url.map(str::to_string);
    report.signed_url = signed_url.map(str::to_string);
    report
}

#[tokio::test]
async fn test_failed_primary_renders_from_fallback() {
    let source = TableSource::new(&[("https://s3/report.pdf?sig=1", 5)]);
    let mut preview = DocumentPreview::for_report(&report(
        Some("https://cdn/report.pdf"),
        Some("https://s3/report.pdf?sig=1"),
    ))
    .unwrap();

    let state = load_preview(&mut preview, &source).await;

    assert_eq!(state, PreviewState::Rendered);
    assert!(preview.is_using_fallback());
    assert_eq!(preview.page_count(), Some(5));
    assert_eq!(
        source.requested(),
        vec!["https://cdn/report.pdf", "https://s3/report.pdf?sig=1"]
    );
}

#[tokio::test]
async fn test_failed_fallback_ends_in_error() {
    let source = TableSource::new(&[]);
    let mut preview = DocumentPreview::new(
        "https://cdn/report.pdf",
        Some(Locator::from("https://s3/report.pdf")),
    );

    let state = load_preview(&mut preview, &source).await;

    assert!(state.is_errored());
    assert_eq!(preview.page_count(), None);
    assert_eq!(preview.download_action().locator.as_str(), "https://s3/report.pdf");
}

#[tokio::test]
async fn test_failed_primary_without_fallback_offers_download() {
    let source = TableSource::new(&[]);
    let mut preview = DocumentPreview::for_report(&report(Some("https://cdn/report.pdf"), None)).unwrap();

    match load_preview(&mut preview, &source).await {
        PreviewState::Errored(failure) => assert_eq!(failure.locator, "https://cdn/report.pdf"),
        other => panic!("expected errored preview, got {:?}", other),
    }

    let download = preview.download_action();
    assert_eq!(download.locator.as_str(), "https://cdn/report.pdf");
    assert_eq!(download.file_name.as_deref(), Some("Report_44a7b1.pdf"));
    assert_eq!(source.requested().len(), 1);
}

#[tokio::test]
async fn test_any_number_of_fallbacks_is_tried_in_order() {
    let source = TableSource::new(&[("mirror-3", 2)]);
    let mut preview = DocumentPreview::with_fallbacks(
        "primary",
        vec![
            Locator::from("mirror-1"),
            Locator::from("mirror-2"),
            Locator::from("mirror-3"),
        ],
    );

    assert_eq!(load_preview(&mut preview, &source).await, PreviewState::Rendered);
    assert_eq!(
        source.requested(),
        vec!["primary", "mirror-1", "mirror-2", "mirror-3"]
    );
    assert_eq!(preview.active_locator().as_str(), "mirror-3");
}

#[tokio::test]
async fn test_restart_after_error_needs_a_new_primary() {
    let source = TableSource::new(&[("https://cdn/v2.pdf", 1)]);
    let mut preview = DocumentPreview::new("https://cdn/v1.pdf", None);
    assert!(load_preview(&mut preview, &source).await.is_errored());

    // Same primary: nothing restarts on its own.
    preview.set_locators("https://cdn/v1.pdf", vec![]);
    assert!(preview.state().is_errored());

    preview.set_locators("https://cdn/v2.pdf", vec![]);
    assert!(preview.state().is_loading());
    assert_eq!(load_preview(&mut preview, &source).await, PreviewState::Rendered);
}

#[tokio::test]
async fn test_zoom_and_pages_are_view_state() {
    let source = TableSource::new(&[("doc", 3)]);
    let zoom = ZoomState::new(ZoomRange::new(0.5, 2.0, 0.5, 1.0).unwrap());
    let mut preview = DocumentPreview::new("doc", None)
        .display_name("Quarterly report")
        .zoom_state(zoom);

    assert!(!preview.pagination_mut().next_page());
    load_preview(&mut preview, &source).await;

    preview.zoom_mut().zoom_in();
    preview.zoom_mut().zoom_in();
    assert_eq!(preview.zoom().factor(), 2.0);
    assert!(preview.state().is_rendered());

    assert!(preview.pagination_mut().next_page());
    assert!(preview.pagination_mut().next_page());
    assert!(!preview.pagination_mut().next_page());
    assert_eq!(preview.pagination().page(), 3);
    assert_eq!(preview.name(), "Quarterly report");
    assert_eq!(preview.frame_source().as_deref(), Some("doc#toolbar=0"));
}

#[test]
fn test_report_without_document_has_no_preview() {
    assert!(DocumentPreview::for_report(&report(None, None)).is_none());
}
