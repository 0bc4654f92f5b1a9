//! # Lens DOM
//!
//! Assertions over the HTML an ePI carries, evaluated on a parsed DOM tree.
//!
//! ## Pipeline
//!
//! ```text
//! ePI Bundle
//!     │
//!     ├──> Section extraction (lens-fhir) → HTML fragments
//!     │
//!     ├──> html5ever → RcDom per fragment
//!     │
//!     └──> Queries
//!          ├─> marker classes (highlight / collapse)
//!          ├─> class occurrence counts
//!          └─> plain text → content preservation ratio
//! ```
//!
//! Each fragment is parsed on its own, so matches never span two sections.
//!
//! ## Example
//!
//! ```
//! use lens_dom::{count_elements_with_class, is_text_highlighted, MatchOptions};
//! use lens_fhir::Resource;
//!
//! let epi: Resource = serde_json::from_value(serde_json::json!({
//!     "resourceType": "Bundle",
//!     "entry": [{ "resource": {
//!         "resourceType": "Composition",
//!         "section": [{ "text": { "div": "<p class=\"highlight\">Pregnancy warning</p>" } }]
//!     }}]
//! }))
//! .unwrap();
//!
//! assert!(is_text_highlighted(&epi, "pregnancy", MatchOptions::default()));
//! assert_eq!(count_elements_with_class(&epi, "highlight"), 1);
//! ```

mod dom;
mod markers;
mod preservation;
mod text;

pub use dom::{Element, Fragment};
pub use markers::{
    count_elements_with_class, is_text_collapsed, is_text_highlighted, is_text_in_class,
    MatchOptions, COLLAPSE_CLASS, HIGHLIGHT_CLASS,
};
pub use preservation::{
    content_preservation, epi_plain_text, is_content_preserved, PreservationReport,
    DEFAULT_PRESERVATION_THRESHOLD,
};
pub use text::{extract_text_content, normalize_whitespace};
