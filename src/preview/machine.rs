use tracing::{debug, warn};

use super::{Locator, Pagination, ZoomState};
use crate::core::RenderFailure;
use crate::model::Report;

pub const DEFAULT_DISPLAY_NAME: &str = "Report Preview";

/// Lifecycle of one preview attempt.
///
/// ```text
/// Loading ──load ok──> Rendered
///   │
///   └──load failed──> Loading (next locator) | Errored (no locator left)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    /// The active locator is being fetched
    Loading,

    /// The active locator rendered as a paged document
    Rendered,

    /// Every locator failed; carries the last failure
    Errored(RenderFailure),
}

impl PreviewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PreviewState::Loading)
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, PreviewState::Rendered)
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, PreviewState::Errored(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewState::Loading => "loading",
            PreviewState::Rendered => "rendered",
            PreviewState::Errored(_) => "errored",
        }
    }
}

/// Direct download of the raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub locator: Locator,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPreview {
    locators: Vec<Locator>,
    active: usize,
    state: PreviewState,
    display_name: String,
    file_name: Option<String>,
    zoom: ZoomState,
    pagination: Pagination,
}

impl DocumentPreview {
    pub fn new(primary: impl Into<Locator>, fallback: Option<Locator>) -> Self {
        Self::with_fallbacks(primary, fallback.into_iter().collect())
    }

    /// Preview that tries `primary`, then each fallback in order.
    pub fn with_fallbacks(primary: impl Into<Locator>, fallbacks: Vec<Locator>) -> Self {
        let mut locators = Vec::with_capacity(fallbacks.len() + 1);
        locators.push(primary.into());
        locators.extend(fallbacks);
        Self {
            locators,
            active: 0,
            state: PreviewState::Loading,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            file_name: None,
            zoom: ZoomState::default(),
            pagination: Pagination::default(),
        }
    }

    /// Preview of a report's document, or `None` when the report has no file yet.
    pub fn for_report(report: &Report) -> Option<Self> {
        let (primary, fallback) = report.preview_locators()?;
        let mut preview = Self::new(primary, fallback);
        preview.file_name = Some(report.preview_file_name());
        Some(preview)
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn zoom_state(mut self, zoom: ZoomState) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.display_name
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    pub fn primary(&self) -> &Locator {
        &self.locators[0]
    }

    pub fn active_locator(&self) -> &Locator {
        &self.locators[self.active]
    }

    pub fn is_using_fallback(&self) -> bool {
        self.active > 0
    }

    /// Replaces the locator list. A new primary restarts the preview, as does
    /// dropping the locator currently shown or loading; otherwise only the
    /// fallbacks are swapped. Zoom is kept either way.
    pub fn set_locators(&mut self, primary: impl Into<Locator>, fallbacks: Vec<Locator>) {
        let primary = primary.into();
        let same_primary = primary == self.locators[0];
        let active = self.locators[self.active].clone();

        let mut locators = Vec::with_capacity(fallbacks.len() + 1);
        locators.push(primary);
        locators.extend(fallbacks);
        self.locators = locators;

        let kept = self.locators.iter().position(|locator| *locator == active);
        match kept {
            Some(index) if same_primary => self.active = index,
            _ => self.restart(),
        }
    }

    /// Back to `Loading` on the primary locator.
    pub fn restart(&mut self) {
        self.active = 0;
        self.state = PreviewState::Loading;
        self.pagination = Pagination::default();
        debug!(locator = %self.locators[0], "preview loading");
    }

    /// Records a successful load of `locator`. Ignored unless it is the
    /// locator currently loading.
    pub fn on_load_success(&mut self, locator: &Locator, page_count: usize) -> bool {
        if !self.accepts(locator) {
            return false;
        }
        self.state = PreviewState::Rendered;
        self.pagination = Pagination::rendered(page_count);
        debug!(locator = %locator, pages = page_count, "preview rendered");
        true
    }

    /// Records a failed load of `locator`: moves on to the next locator, or
    /// to `Errored` when none is left.
    pub fn on_load_failure(&mut self, locator: &Locator, reason: impl Into<String>) -> bool {
        if !self.accepts(locator) {
            return false;
        }
        let reason = reason.into();

        if self.active + 1 < self.locators.len() {
            self.active += 1;
            warn!(
                failed = %locator,
                next = %self.locators[self.active],
                reason = %reason,
                "preview falling back to alternate locator"
            );
        } else {
            warn!(locator = %locator, reason = %reason, "preview failed");
            self.state = PreviewState::Errored(RenderFailure {
                locator: locator.to_string(),
                reason,
            });
        }
        true
    }

    fn accepts(&self, locator: &Locator) -> bool {
        self.state.is_loading() && *locator == self.locators[self.active]
    }

    /// Download of the last tried locator. Always offered; the only way out
    /// of `Errored`.
    pub fn download_action(&self) -> DownloadAction {
        DownloadAction {
            locator: self.active_locator().clone(),
            file_name: self.file_name.clone(),
        }
    }

    /// Embedded viewer address, while there is something to show.
    pub fn frame_source(&self) -> Option<String> {
        match self.state {
            PreviewState::Errored(_) => None,
            _ => Some(self.active_locator().frame_source()),
        }
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomState {
        &mut self.zoom
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    pub fn page_count(&self) -> Option<usize> {
        self.pagination.page_count()
    }
}
