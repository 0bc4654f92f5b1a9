//! # Lens Core
//!
//! The lens contract and everything needed to hand a lens to a host.
//!
//! A lens is an `enhance` / `explanation` pair. The host feeds it the ePI, the
//! patient's IPS, an optional persona vector and one HTML fragment at a time,
//! and stores whatever `enhance` returns back into the ePI section.
//!
//! ## Architecture
//!
//! ```text
//! my-lens.json + my-lens.js
//!     │
//!     ├──> Manifest compiler → Library { content: [base64 script] }
//!     │
//!     └──> LensHost::apply_lenses(epi, ips, [Library])
//!            ├─> per section: Lens::enhance(LensInput) → HTML
//!            └─> LensResult { epi, ips, focusingErrors }
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use lens_core::{apply_lens, load_lens, InProcessHost, PassThroughLens};
//! use lens_fhir::Resource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let lens = load_lens(".", "my-lens")?;
//!     let host = InProcessHost::new().with_lens(PassThroughLens::default());
//!
//!     let epi = Resource::from_json_str(&std::fs::read_to_string("epi.json")?)?;
//!     let ips = Resource::from_json_str(&std::fs::read_to_string("ips.json")?)?;
//!
//!     let result = apply_lens(&host, &epi, &ips, &lens).await?;
//!     assert!(!result.has_focusing_errors());
//!     Ok(())
//! }
//! ```

mod error;
mod host;
mod lens;
mod manifest;
mod result;

pub use error::{LensError, Result};
pub use host::{apply_lens, InProcessHost, LensHost};
pub use lens::{Lens, LensInput, PassThroughLens, PASS_THROUGH_EXPLANATION, PASS_THROUGH_LENS_NAME};
pub use manifest::{compile_lens, load_all_lenses, load_lens, LENS_SOURCE_EXTENSION};
pub use result::{focusing_error_messages, has_focusing_errors, FocusingError, LensResult};
