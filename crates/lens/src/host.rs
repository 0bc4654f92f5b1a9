use crate::error::Result;
use crate::lens::{Lens, LensInput};
use crate::result::{FocusingError, LensResult};
use async_trait::async_trait;
use lens_fhir::{visit_section_divs_mut, LensLibrary, Resource, BUNDLE};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Entry point of a lens execution environment.
///
/// Implementations apply `lenses` in order to a copy of `epi` and report one
/// focusing-error slot per lens. Per-lens failures belong in the result;
/// `Err` is reserved for inputs the host cannot process at all.
#[async_trait]
pub trait LensHost: Send + Sync {
    async fn apply_lenses(
        &self,
        epi: &Resource,
        ips: &Resource,
        lenses: &[LensLibrary],
    ) -> Result<LensResult>;
}

/// Apply a single compiled lens
pub async fn apply_lens<H>(
    host: &H,
    epi: &Resource,
    ips: &Resource,
    lens: &LensLibrary,
) -> Result<LensResult>
where
    H: LensHost + ?Sized,
{
    host.apply_lenses(epi, ips, std::slice::from_ref(lens)).await
}

/// Host that runs native [`Lens`] implementations in-process.
///
/// Manifests are matched to registered lenses by `name`, then `id`. The
/// embedded script must decode, but it is never executed: the registered
/// native lens does the work.
#[derive(Default)]
pub struct InProcessHost {
    lenses: BTreeMap<String, Arc<dyn Lens>>,
    persona_vector: Option<Resource>,
}

impl InProcessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_lens(mut self, lens: impl Lens + 'static) -> Self {
        self.register(Arc::new(lens));
        self
    }

    #[must_use]
    pub fn with_persona_vector(mut self, pv: Resource) -> Self {
        self.persona_vector = Some(pv);
        self
    }

    /// Register a lens under its own name, replacing any previous one
    pub fn register(&mut self, lens: Arc<dyn Lens>) {
        self.lenses.insert(lens.name().to_string(), lens);
    }

    #[must_use]
    pub fn registered(&self) -> Vec<&str> {
        self.lenses.keys().map(String::as_str).collect()
    }

    fn resolve(&self, manifest: &LensLibrary) -> Option<&Arc<dyn Lens>> {
        [manifest.name.as_deref(), manifest.id.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|key| self.lenses.get(key))
    }

    fn apply_one(
        &self,
        enhanced: &mut Resource,
        epi: &Resource,
        ips: &Resource,
        manifest: &LensLibrary,
    ) -> Vec<FocusingError> {
        let lens_name = manifest.display_name();

        let Some(lens) = self.resolve(manifest) else {
            return vec![FocusingError::new(
                format!("No lens implementation registered for {lens_name}"),
                lens_name,
            )];
        };

        if let Err(e) = manifest.decoded_source() {
            return vec![FocusingError::new(
                format!("Invalid lens content: {e}"),
                lens_name,
            )];
        }

        let mut errors = Vec::new();
        let sections = visit_section_divs_mut(enhanced, |html| {
            let input = LensInput {
                epi,
                ips,
                pv: self.persona_vector.as_ref(),
                html: html.as_str(),
            };
            match lens.enhance(&input) {
                Ok(transformed) => *html = transformed,
                Err(e) => errors.push(FocusingError::new(e.to_string(), lens_name)),
            }
        });

        log::debug!("Lens {lens_name} processed {sections} sections");
        errors
    }
}

#[async_trait]
impl LensHost for InProcessHost {
    async fn apply_lenses(
        &self,
        epi: &Resource,
        ips: &Resource,
        lenses: &[LensLibrary],
    ) -> Result<LensResult> {
        epi.expect_type(BUNDLE)?;

        let mut enhanced = epi.clone();
        let mut focusing_errors = Vec::with_capacity(lenses.len());

        for manifest in lenses {
            let errors = self.apply_one(&mut enhanced, epi, ips, manifest);
            for error in &errors {
                log::warn!("Focusing error: {error}");
            }
            focusing_errors.push(Value::Array(
                errors.iter().map(FocusingError::to_value).collect(),
            ));
        }

        Ok(LensResult {
            epi: enhanced,
            ips: ips.clone(),
            focusing_errors,
        })
    }
}
