//! # Lens Testkit
//!
//! Everything a lens author needs to test a lens against real ePI and IPS
//! documents.
//!
//! ## Architecture
//!
//! ```text
//! TestDataConfig (defaults / TOML / WRITE_LENS_OUTPUTS)
//!     │
//!     ├──> TestData → PePIs/*.json, IPS/*.json, lens/*.json + *.js
//!     │
//!     └──> CombinationRunner (each ePI x each IPS)
//!            ├─> LensHost::apply_lenses
//!            ├─> OutputWriter → output-<epi>-<ips>.json
//!            └─> RunSummary { focusing errors, content removal errors }
//! ```
//!
//! The assertion helpers from `lens-dom` and `lens-core` are re-exported so a
//! test file needs a single import.
//!
//! ## Example
//!
//! ```no_run
//! use lens_testkit::{
//!     apply_lens, has_focusing_errors, is_content_preserved, is_text_highlighted,
//!     InProcessHost, MatchOptions, PassThroughLens, TestData,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let data = TestData::default();
//!     let lens = data.load_lens("my-lens")?;
//!     let host = InProcessHost::new().with_lens(PassThroughLens::default());
//!
//!     let epi = data.load_epi("Bundle-processedbundledovato-en.json")?;
//!     let ips = data.load_ips("alicia-patient_summary.json")?;
//!     let result = apply_lens(&host, &epi, &ips, &lens).await?;
//!
//!     assert!(!has_focusing_errors(&result));
//!     assert!(!is_text_highlighted(&result.epi, "pregnancy", MatchOptions::default()));
//!     assert!(is_content_preserved(&epi, &result.epi, 0.95));
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod loader;
mod output;
mod runner;

pub use config::{
    CustomTestData, TestDataConfig, IPS_DIR_NAME, OUTPUT_DIR_NAME, PEPIS_DIR_NAME,
    WRITE_OUTPUTS_ENV,
};
pub use error::{Result, TestkitError};
pub use loader::{load_json_file, load_json_files, Fixture, TestData};
pub use output::OutputWriter;
pub use runner::{CombinationOutcome, CombinationRunner, RunSummary};

pub use lens_core::{
    apply_lens, compile_lens, focusing_error_messages, has_focusing_errors, load_all_lenses,
    load_lens, FocusingError, InProcessHost, Lens, LensHost, LensInput, LensResult,
    PassThroughLens,
};
pub use lens_dom::{
    content_preservation, count_elements_with_class, extract_text_content, is_content_preserved,
    is_text_collapsed, is_text_highlighted, MatchOptions, PreservationReport,
};
pub use lens_fhir::{extract_html_from_epi, LensLibrary, Resource};
