use crate::CompileArgs;
use anyhow::{Context, Result};
use lens_core::load_lens;
use std::fs;

pub(crate) fn run(args: CompileArgs) -> Result<()> {
    let lens = load_lens(&args.dir, &args.base)
        .with_context(|| format!("Failed to compile lens '{}'", args.base))?;
    let json = serde_json::to_string_pretty(&lens).context("Failed to serialize lens")?;

    match args.out {
        Some(path) => {
            fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Compiled {} → {}", lens.display_name(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
