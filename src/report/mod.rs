//! Reporting: the HTML overview page, its captions and value formatting.
//!
//! The renderer does no merging; it only reads `reconcile::Overview`.

pub mod captions;
pub mod format;
pub mod html;

pub use captions::{Captions, Language};
pub use format::ValueFormat;
pub use html::render_html;
