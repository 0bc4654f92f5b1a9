//! # Lens FHIR
//!
//! Minimal FHIR resource model for lens development.
//!
//! Resources are kept as open JSON mappings: only the handful of fields a lens
//! toolchain actually reads (`resourceType`, `id`, `entry`, `section`, `content`)
//! get typed access, everything else round-trips untouched.
//!
//! ## Layout
//!
//! ```text
//! Bundle (ePI)
//!     │
//!     └──> entry[].resource  (Composition)
//!            └──> section[]
//!                   ├─> text.div   (HTML fragment)
//!                   └─> section[]  (recursive)
//! ```
//!
//! ## Example
//!
//! ```
//! use lens_fhir::{extract_html_from_epi, Resource};
//!
//! let epi: Resource = serde_json::from_value(serde_json::json!({
//!     "resourceType": "Bundle",
//!     "entry": [{
//!         "resource": {
//!             "resourceType": "Composition",
//!             "section": [{ "text": { "div": "<div>Take with food.</div>" } }]
//!         }
//!     }]
//! }))
//! .unwrap();
//!
//! assert_eq!(extract_html_from_epi(&epi), vec!["<div>Take with food.</div>"]);
//! ```

mod bundle;
mod error;
mod library;
mod resource;

pub use bundle::{compositions, extract_html_from_epi, visit_section_divs_mut};
pub use error::{FhirError, Result};
pub use library::{Attachment, LensLibrary, JAVASCRIPT_CONTENT_TYPE};
pub use resource::{Resource, BUNDLE, COMPOSITION, LIBRARY};
