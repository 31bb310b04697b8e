// ============================================================================
// Document Preview
// ============================================================================
//
// State machine behind the report viewer. A preview owns an ordered list of
// locators (primary first, then fallbacks) and tries them in order:
//
//   Loading ──success──> Rendered
//      │
//      └──failure──> Loading (next locator) ... ──last failure──> Errored
//
// Zoom and pagination are view state kept beside the lifecycle. Render
// failures never leave this module; they only show up as `Errored`, where a
// direct download of the last tried locator is the way out.
//
// ============================================================================

pub mod locator;
pub mod machine;
pub mod pagination;
pub mod source;
pub mod zoom;

pub use locator::Locator;
pub use machine::{DEFAULT_DISPLAY_NAME, DocumentPreview, DownloadAction, PreviewState};
pub use pagination::Pagination;
pub use source::{DocumentSource, HttpDocumentSource, count_pdf_pages, load_preview};
pub use zoom::{ZoomRange, ZoomState};
