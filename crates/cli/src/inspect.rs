use crate::InspectArgs;
use anyhow::{Context, Result};
use lens_dom::{
    count_elements_with_class, is_text_collapsed, is_text_highlighted, MatchOptions,
    COLLAPSE_CLASS, HIGHLIGHT_CLASS,
};
use lens_fhir::{extract_html_from_epi, Resource};
use std::fs;

pub(crate) fn run(args: InspectArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let epi = Resource::from_json_str(&raw)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    println!("Fragments: {}", extract_html_from_epi(&epi).len());

    let classes = if args.classes.is_empty() {
        vec![HIGHLIGHT_CLASS.to_string(), COLLAPSE_CLASS.to_string()]
    } else {
        args.classes
    };
    for class in &classes {
        println!("Class {class}: {}", count_elements_with_class(&epi, class));
    }

    if let Some(text) = &args.text {
        let mut options = if args.exact {
            MatchOptions::exact()
        } else {
            MatchOptions::default()
        };
        if args.case_sensitive {
            options = options.case_sensitive();
        }

        println!(
            "Highlighted \"{text}\": {}",
            yes_no(is_text_highlighted(&epi, text, options))
        );
        println!(
            "Collapsed \"{text}\": {}",
            yes_no(is_text_collapsed(&epi, text, options))
        );
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
