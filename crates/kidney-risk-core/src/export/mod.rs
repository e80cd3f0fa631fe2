//! Document rendering and downloadable export.

mod document;
mod report_export;

pub use document::*;
pub use report_export::*;
