//! Run every ePI × IPS combination through a host and tally what went wrong.

use crate::config::TestDataConfig;
use crate::error::Result;
use crate::loader::Fixture;
use crate::output::OutputWriter;
use lens_core::{FocusingError, LensHost};
use lens_dom::{content_preservation, PreservationReport, DEFAULT_PRESERVATION_THRESHOLD};
use lens_fhir::{extract_html_from_epi, LensLibrary};
use std::path::PathBuf;

/// What happened to one ePI + IPS pair
#[derive(Debug, Clone)]
pub struct CombinationOutcome {
    pub epi: String,
    pub ips: String,
    pub focusing_errors: Vec<FocusingError>,
    pub preservation: PreservationReport,
    pub content_preserved: bool,
    pub output: Option<PathBuf>,
}

impl CombinationOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.focusing_errors.is_empty() && self.content_preserved
    }
}

/// Totals over a full run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub combinations: usize,
    pub focusing_errors: usize,
    pub content_removal_errors: usize,
    pub outcomes: Vec<CombinationOutcome>,
}

impl RunSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.focusing_errors == 0 && self.content_removal_errors == 0
    }
}

/// Drives a [`LensHost`] over ePI × IPS pairs, one pair at a time
pub struct CombinationRunner<'a, H: LensHost + ?Sized> {
    host: &'a H,
    threshold: f64,
    writer: Option<OutputWriter>,
}

impl<'a, H: LensHost + ?Sized> CombinationRunner<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            threshold: DEFAULT_PRESERVATION_THRESHOLD,
            writer: None,
        }
    }

    /// Runner with threshold and output settings taken from `config`
    pub fn from_config(host: &'a H, config: &TestDataConfig) -> Self {
        let runner = Self::new(host).with_threshold(config.threshold);
        if config.write_outputs {
            runner.with_output(OutputWriter::new(&config.output_dir))
        } else {
            runner
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_output(mut self, writer: OutputWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub async fn run(
        &self,
        epis: &[Fixture],
        ips_list: &[Fixture],
        lenses: &[LensLibrary],
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        log::info!(
            "Testing {} combinations ({} ePIs x {} IPS)",
            epis.len() * ips_list.len(),
            epis.len(),
            ips_list.len()
        );

        for epi in epis {
            if extract_html_from_epi(&epi.resource).is_empty() {
                log::warn!("ePI {} has no section HTML", epi.label());
            }

            for ips in ips_list {
                let outcome = self.run_one(epi, ips, lenses).await?;
                summary.combinations += 1;
                summary.focusing_errors += outcome.focusing_errors.len();
                if !outcome.content_preserved {
                    summary.content_removal_errors += 1;
                }
                summary.outcomes.push(outcome);
            }
        }

        log::info!(
            "Tested {} combinations: {} focusing errors, {} content removal errors",
            summary.combinations,
            summary.focusing_errors,
            summary.content_removal_errors
        );
        Ok(summary)
    }

    async fn run_one(
        &self,
        epi: &Fixture,
        ips: &Fixture,
        lenses: &[LensLibrary],
    ) -> Result<CombinationOutcome> {
        let (epi_label, ips_label) = (epi.label(), ips.label());
        log::debug!("Testing: {epi_label} + {ips_label}");

        let result = self
            .host
            .apply_lenses(&epi.resource, &ips.resource, lenses)
            .await?;

        let output = match &self.writer {
            Some(writer) => Some(writer.write(epi_label, ips_label, &result.epi)?),
            None => None,
        };

        let focusing_errors = result.focusing_errors();
        for error in &focusing_errors {
            log::error!("Focusing error for {epi_label} + {ips_label}: {error}");
        }

        let preservation = content_preservation(&epi.resource, &result.epi);
        let content_preserved = preservation.meets(self.threshold);
        if !content_preserved {
            log::warn!(
                "Content removed from {epi_label} + {ips_label}: {:.1}% match ({}/{} words missing)",
                preservation.ratio * 100.0,
                preservation.missing_words.len(),
                preservation.significant_words
            );
        }

        Ok(CombinationOutcome {
            epi: epi_label.to_string(),
            ips: ips_label.to_string(),
            focusing_errors,
            preservation,
            content_preserved,
            output,
        })
    }
}
