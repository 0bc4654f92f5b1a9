//! Composition section traversal.
//!
//! Every accessor here is total: wrong JSON types and missing keys simply
//! contribute nothing.

use crate::resource::{Resource, BUNDLE, COMPOSITION};
use serde_json::Value;

/// Composition resources inside a Bundle, in entry order
pub fn compositions(bundle: &Resource) -> impl Iterator<Item = &Value> {
    let entries: &[Value] = if bundle.is(BUNDLE) {
        bundle.entries()
    } else {
        &[]
    };

    entries
        .iter()
        .filter_map(|entry| entry.get("resource"))
        .filter(|resource| is_composition(resource))
}

/// Collect every `text.div` fragment of every Composition section, parent
/// before children, in document order.
#[must_use]
pub fn extract_html_from_epi(bundle: &Resource) -> Vec<String> {
    let mut fragments = Vec::new();
    for composition in compositions(bundle) {
        for section in child_sections(composition) {
            collect_section(section, &mut fragments);
        }
    }
    log::debug!("Extracted {} HTML fragments", fragments.len());
    fragments
}

/// Visit every `text.div` fragment mutably, in the same order as
/// [`extract_html_from_epi`]. Returns the number of fragments visited.
pub fn visit_section_divs_mut(bundle: &mut Resource, mut visit: impl FnMut(&mut String)) -> usize {
    if !bundle.is(BUNDLE) {
        return 0;
    }
    let Some(entries) = bundle.get_mut("entry").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut visited = 0;
    for entry in entries {
        let Some(resource) = entry.get_mut("resource") else {
            continue;
        };
        if !is_composition(resource) {
            continue;
        }
        if let Some(sections) = resource.get_mut("section").and_then(Value::as_array_mut) {
            for section in sections {
                visit_section_mut(section, &mut visit, &mut visited);
            }
        }
    }
    visited
}

fn is_composition(resource: &Value) -> bool {
    resource.get("resourceType").and_then(Value::as_str) == Some(COMPOSITION)
}

fn child_sections(node: &Value) -> &[Value] {
    node.get("section")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn section_div(section: &Value) -> Option<&str> {
    section
        .get("text")
        .and_then(|text| text.get("div"))
        .and_then(Value::as_str)
        .filter(|div| !div.is_empty())
}

fn collect_section(section: &Value, fragments: &mut Vec<String>) {
    if let Some(div) = section_div(section) {
        fragments.push(div.to_string());
    }
    for child in child_sections(section) {
        collect_section(child, fragments);
    }
}

fn visit_section_mut(section: &mut Value, visit: &mut impl FnMut(&mut String), visited: &mut usize) {
    let div = section
        .get_mut("text")
        .and_then(|text| text.get_mut("div"));
    if let Some(Value::String(html)) = div {
        if !html.is_empty() {
            visit(html);
            *visited += 1;
        }
    }

    if let Some(children) = section.get_mut("section").and_then(Value::as_array_mut) {
        for child in children {
            visit_section_mut(child, visit, visited);
        }
    }
}
