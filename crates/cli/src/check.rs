use crate::CheckArgs;
use anyhow::{bail, Context, Result};
use lens_core::{InProcessHost, PassThroughLens};
use lens_testkit::{CombinationRunner, CustomTestData, RunSummary, TestData, TestDataConfig};

pub(crate) async fn run(args: CheckArgs) -> Result<()> {
    let config = build_config(&args)?;
    let data = TestData::new(config);

    let epis = data.load_all_epis().context("Failed to load ePIs")?;
    let ips = data.load_all_ips().context("Failed to load IPS resources")?;
    let lenses = data.load_lenses().context("Failed to load lenses")?;
    if lenses.is_empty() {
        bail!("No lenses found in {}", data.config().lens_dir.display());
    }

    let host = InProcessHost::new().with_lens(PassThroughLens::default());
    let summary = CombinationRunner::from_config(&host, data.config())
        .run(&epis, &ips, &lenses)
        .await?;

    print_summary(&summary);
    if !summary.is_clean() {
        bail!(
            "{} focusing errors, {} content removal errors",
            summary.focusing_errors,
            summary.content_removal_errors
        );
    }
    Ok(())
}

fn build_config(args: &CheckArgs) -> Result<TestDataConfig> {
    let mut config = match &args.config {
        Some(path) => TestDataConfig::from_toml_file(path)?,
        None => TestDataConfig::bundled(&args.data).with_lens_dir(&args.lenses),
    };

    config = config
        .with_custom(CustomTestData {
            pepis_path: args.custom_pepis.clone(),
            ips_path: args.custom_ips.clone(),
        })
        .apply_env();
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.write_outputs {
        config.write_outputs = true;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    for outcome in summary.outcomes.iter().filter(|o| !o.passed()) {
        println!("FAIL {} + {}", outcome.epi, outcome.ips);
        for error in &outcome.focusing_errors {
            println!("  - {error}");
        }
        if !outcome.content_preserved {
            println!(
                "  - content match {:.1}% ({}/{} words missing)",
                outcome.preservation.ratio * 100.0,
                outcome.preservation.missing_words.len(),
                outcome.preservation.significant_words
            );
        }
    }

    println!("Combinations tested: {}", summary.combinations);
    println!("Focusing errors: {}", summary.focusing_errors);
    println!("Content removal errors: {}", summary.content_removal_errors);
}
