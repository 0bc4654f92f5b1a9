use crate::dom::{Element, Fragment};
use crate::text::normalize_whitespace;
use lens_fhir::{extract_html_from_epi, Resource};
use serde::{Deserialize, Serialize};

/// Class a lens adds to sections it wants to emphasize
pub const HIGHLIGHT_CLASS: &str = "highlight";

/// Class a lens adds to sections it wants folded away
pub const COLLAPSE_CLASS: &str = "collapse";

/// How a search string is matched against marked elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Compare without case folding
    pub case_sensitive: bool,

    /// Substring match against the element's inner HTML; when false, the
    /// element's normalized text must equal the search string exactly
    pub partial: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            partial: true,
        }
    }
}

impl MatchOptions {
    /// Exact, case-insensitive text match
    #[must_use]
    pub fn exact() -> Self {
        Self {
            partial: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    fn fold(self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }

    fn element_matches(self, element: &Element, needle: &str) -> bool {
        if self.partial {
            let html = self.fold(&element.inner_html());
            html.contains(needle) || html.contains(&escape_text(needle))
        } else {
            self.fold(&element.text_content()) == normalize_whitespace(needle)
        }
    }
}

// Serialized inner HTML escapes `&` and U+00A0 in text nodes.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('\u{a0}', "&nbsp;")
}

/// Check whether `search_text` appears inside any element carrying
/// `class_name` in any section of the ePI. Stops at the first match.
#[must_use]
pub fn is_text_in_class(
    epi: &Resource,
    class_name: &str,
    search_text: &str,
    options: MatchOptions,
) -> bool {
    let needle = options.fold(search_text);

    extract_html_from_epi(epi).iter().any(|html| {
        Fragment::parse(html)
            .elements_with_class(class_name, options.case_sensitive)
            .iter()
            .any(|element| options.element_matches(element, &needle))
    })
}

/// Check if text sits inside an element classed `highlight`
#[must_use]
pub fn is_text_highlighted(epi: &Resource, search_text: &str, options: MatchOptions) -> bool {
    is_text_in_class(epi, HIGHLIGHT_CLASS, search_text, options)
}

/// Check if text sits inside an element classed `collapse`
#[must_use]
pub fn is_text_collapsed(epi: &Resource, search_text: &str, options: MatchOptions) -> bool {
    is_text_in_class(epi, COLLAPSE_CLASS, search_text, options)
}

/// Count elements, across all sections, whose class list contains
/// `class_name` as a whole token (case-sensitive).
#[must_use]
pub fn count_elements_with_class(epi: &Resource, class_name: &str) -> usize {
    extract_html_from_epi(epi)
        .iter()
        .map(|html| Fragment::parse(html).elements_with_class(class_name, true).len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn epi(divs: &[&str]) -> Resource {
        let sections: Vec<_> = divs
            .iter()
            .map(|div| json!({ "text": { "status": "additional", "div": div } }))
            .collect();
        Resource::from_value(json!({
            "resourceType": "Bundle",
            "entry": [{ "resource": { "resourceType": "Composition", "section": sections } }]
        }))
        .unwrap()
    }

    #[test]
    fn test_pregnancy_scenario() {
        let doc = epi(&[r#"<p class="highlight">Pregnancy warning</p><p>Other text</p>"#]);

        assert!(is_text_highlighted(&doc, "pregnancy", MatchOptions::default()));
        assert_eq!(count_elements_with_class(&doc, HIGHLIGHT_CLASS), 1);
        assert!(!is_text_collapsed(&doc, "pregnancy", MatchOptions::default()));
    }

    #[test]
    fn test_no_marked_elements() {
        let doc = epi(&["<p>Pregnancy warning</p>"]);
        assert!(!is_text_highlighted(&doc, "pregnancy", MatchOptions::default()));
        assert_eq!(count_elements_with_class(&doc, HIGHLIGHT_CLASS), 0);
    }

    #[test]
    fn test_unmarked_text_is_not_matched() {
        let doc = epi(&[r#"<p class="highlight">Liver</p><p>Pregnancy</p>"#]);
        assert!(is_text_highlighted(&doc, "liver", MatchOptions::default()));
        assert!(!is_text_highlighted(&doc, "pregnancy", MatchOptions::default()));
    }

    #[test]
    fn test_case_sensitivity() {
        let doc = epi(&[r#"<p class="highlight">Pregnancy warning</p>"#]);
        let sensitive = MatchOptions::default().case_sensitive();

        assert!(is_text_highlighted(&doc, "Pregnancy", sensitive));
        assert!(!is_text_highlighted(&doc, "pregnancy", sensitive));
        assert!(is_text_highlighted(&doc, "PREGNANCY", MatchOptions::default()));
    }

    #[test]
    fn test_exact_match_strips_markup() {
        let doc = epi(&[r#"<div class="collapse"> Not for   <b>children</b> </div>"#]);

        assert!(is_text_collapsed(&doc, "not for children", MatchOptions::exact()));
        assert!(!is_text_collapsed(&doc, "children", MatchOptions::exact()));
        assert!(is_text_collapsed(&doc, "children", MatchOptions::default()));
    }

    #[test]
    fn test_partial_match_sees_raw_markup() {
        let doc = epi(&[r#"<div class="highlight">Avoid <b>alcohol</b></div>"#]);
        assert!(is_text_highlighted(&doc, "<b>alcohol</b>", MatchOptions::default()));
        assert!(!is_text_highlighted(&doc, "avoid alcohol", MatchOptions::default()));
    }

    #[test]
    fn test_multiple_classes_and_token_boundaries() {
        let doc = epi(&[
            r#"<p class="section highlight important">a</p>"#,
            r#"<p class="highlighted">b</p><p class="collapse-highlight">c</p>"#,
            r#"<span class="highlight">d</span><span class="highlight collapse">e</span>"#,
        ]);

        assert_eq!(count_elements_with_class(&doc, HIGHLIGHT_CLASS), 3);
        assert_eq!(count_elements_with_class(&doc, COLLAPSE_CLASS), 1);
        assert!(!is_text_highlighted(&doc, "b", MatchOptions::exact()));
        assert!(!is_text_highlighted(&doc, "c", MatchOptions::exact()));
        assert!(is_text_collapsed(&doc, "e", MatchOptions::exact()));
    }

    #[test]
    fn test_nested_marked_elements_are_captured_whole() {
        let doc = epi(&[
            r#"<div class="highlight"><div>Before</div><div>Breastfeeding advice</div></div>"#,
        ]);
        assert!(is_text_highlighted(&doc, "breastfeeding", MatchOptions::default()));
    }

    #[test]
    fn test_matches_are_confined_to_one_section() {
        let doc = epi(&[r#"<p class="highlight">kidney</p>"#, "<p>failure</p>"]);
        assert!(!is_text_highlighted(&doc, "kidney failure", MatchOptions::default()));
    }

    #[test]
    fn test_non_bundle_never_matches() {
        let library = Resource::new("Library");
        assert!(!is_text_highlighted(&library, "", MatchOptions::default()));
        assert_eq!(count_elements_with_class(&library, HIGHLIGHT_CLASS), 0);
    }

    #[test]
    fn test_partial_match_sees_escaped_text() {
        let doc = epi(&[
            "<p class=\"highlight\">Take 5\u{a0}mg daily</p>",
            r#"<p class="collapse">Fish &amp; shellfish</p>"#,
        ]);
        assert!(is_text_highlighted(&doc, "5\u{a0}mg", MatchOptions::default()));
        assert!(is_text_highlighted(&doc, "5&nbsp;mg", MatchOptions::default()));
        assert!(is_text_highlighted(&doc, "take 5\u{a0}mg daily", MatchOptions::exact()));
        assert!(is_text_collapsed(&doc, "fish & shellfish", MatchOptions::default()));
        assert!(!is_text_highlighted(&doc, "5 mg", MatchOptions::default()));
    }

    #[test]
    fn test_stray_table_cell_is_not_counted() {
        let stray = epi(&[r#"<td class="highlight">Pregnancy</td>"#]);
        assert_eq!(count_elements_with_class(&stray, HIGHLIGHT_CLASS), 0);
        assert!(!is_text_highlighted(&stray, "pregnancy", MatchOptions::default()));

        let listed = epi(&[r#"<ul><li class="highlight">Pregnancy</li></ul>"#]);
        assert_eq!(count_elements_with_class(&listed, HIGHLIGHT_CLASS), 1);
        assert!(is_text_highlighted(&listed, "pregnancy", MatchOptions::default()));
    }
}
