use crate::error::Result;
use lens_fhir::Resource;

pub const PASS_THROUGH_LENS_NAME: &str = "my-lens";

pub const PASS_THROUGH_EXPLANATION: &str =
    "This lens highlights relevant sections for your health condition because...";

/// Everything a lens sees for one fragment.
///
/// The host builds one of these per ePI section; `html` is that section's
/// current `text.div`.
#[derive(Debug, Clone, Copy)]
pub struct LensInput<'a> {
    /// The ePI being personalized
    pub epi: &'a Resource,

    /// The patient summary
    pub ips: &'a Resource,

    /// Persona vector, when the host has one
    pub pv: Option<&'a Resource>,

    /// HTML fragment to transform
    pub html: &'a str,
}

/// The lens contract.
pub trait Lens: Send + Sync {
    /// Name the lens is registered under; matches the manifest `name` or `id`
    fn name(&self) -> &str;

    /// Transform one HTML fragment. Must return the complete fragment, not a
    /// diff: whatever comes back replaces the section's HTML.
    fn enhance(&self, input: &LensInput<'_>) -> Result<String>;

    /// Human-readable reason for the lens's changes
    fn explanation(&self) -> String;
}

/// Placeholder lens: returns every fragment unchanged.
#[derive(Debug, Clone)]
pub struct PassThroughLens {
    name: String,
}

impl PassThroughLens {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for PassThroughLens {
    fn default() -> Self {
        Self::named(PASS_THROUGH_LENS_NAME)
    }
}

impl Lens for PassThroughLens {
    fn name(&self) -> &str {
        &self.name
    }

    fn enhance(&self, input: &LensInput<'_>) -> Result<String> {
        Ok(input.html.to_string())
    }

    fn explanation(&self) -> String {
        PASS_THROUGH_EXPLANATION.to_string()
    }
}
