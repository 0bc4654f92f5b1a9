use crate::text::normalize_whitespace;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// A parsed HTML fragment.
///
/// Parsing never fails: html5ever recovers from any input the same way a
/// browser would, so malformed markup still yields a tree.
pub struct Fragment {
    dom: RcDom,
}

impl Fragment {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        Self { dom }
    }

    /// All elements in document order (pre-order, depth-first)
    #[must_use]
    pub fn elements(&self) -> Vec<Element> {
        let mut elements = Vec::new();
        collect_elements(&self.dom.document, &mut elements);
        elements
    }

    /// Elements whose `class` attribute carries `class_name` as a token
    #[must_use]
    pub fn elements_with_class(&self, class_name: &str, case_sensitive: bool) -> Vec<Element> {
        self.elements()
            .into_iter()
            .filter(|element| element.has_class(class_name, case_sensitive))
            .collect()
    }

    /// Text of the whole fragment with whitespace collapsed
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut raw = String::new();
        collect_text(vec![self.dom.document.clone()], &mut raw);
        normalize_whitespace(&raw)
    }
}

/// An element node inside a [`Fragment`]
#[derive(Clone)]
pub struct Element {
    handle: Handle,
}

impl Element {
    /// Lowercase local tag name
    #[must_use]
    pub fn tag_name(&self) -> String {
        match &self.handle.data {
            NodeData::Element { name, .. } => name.local.to_string(),
            _ => String::new(),
        }
    }

    #[must_use]
    pub fn attr(&self, attr_name: &str) -> Option<String> {
        let NodeData::Element { attrs, .. } = &self.handle.data else {
            return None;
        };
        attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string())
    }

    /// Whitespace-separated tokens of the `class` attribute
    #[must_use]
    pub fn class_tokens(&self) -> Vec<String> {
        self.attr("class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Token match: `highlight` never matches `highlighted`
    #[must_use]
    pub fn has_class(&self, class_name: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            self.class_tokens().iter().any(|token| token == class_name)
        } else {
            let wanted = class_name.to_lowercase();
            self.class_tokens()
                .iter()
                .any(|token| token.to_lowercase() == wanted)
        }
    }

    /// Serialized markup of the element's children
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut bytes = Vec::new();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };
        let serializable = SerializableHandle::from(self.handle.clone());
        if let Err(e) = serialize(&mut bytes, &serializable, opts) {
            log::warn!("Failed to serialize <{}> children: {e}", self.tag_name());
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Text of the element's subtree with whitespace collapsed
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut raw = String::new();
        let children: Vec<Handle> = self.handle.children.borrow().iter().cloned().collect();
        collect_text(children, &mut raw);
        normalize_whitespace(&raw)
    }
}

// Walks use an explicit stack: nesting depth is bounded only by the parser.
fn collect_elements(root: &Handle, out: &mut Vec<Element>) {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if matches!(node.data, NodeData::Element { .. }) {
            out.push(Element {
                handle: node.clone(),
            });
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
}

enum TextStep {
    Visit(Handle),
    Close,
}

// Tags count as word breaks, the same as replacing each tag with a space.
fn collect_text(roots: Vec<Handle>, out: &mut String) {
    let mut stack: Vec<TextStep> = roots.into_iter().rev().map(TextStep::Visit).collect();
    while let Some(step) = stack.pop() {
        let node = match step {
            TextStep::Visit(node) => node,
            TextStep::Close => {
                out.push(' ');
                continue;
            }
        };

        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => {
                out.push(' ');
                stack.push(TextStep::Close);
                push_children(&node, &mut stack);
            }
            NodeData::Document => push_children(&node, &mut stack),
            _ => {}
        }
    }
}

fn push_children(node: &Handle, stack: &mut Vec<TextStep>) {
    stack.extend(
        node.children
            .borrow()
            .iter()
            .rev()
            .cloned()
            .map(TextStep::Visit),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_elements_in_document_order() {
        let fragment = Fragment::parse("<div><p>a</p><ul><li>b</li></ul></div>");
        let tags: Vec<String> = fragment
            .elements()
            .iter()
            .map(Element::tag_name)
            .filter(|tag| !matches!(tag.as_str(), "html" | "head" | "body"))
            .collect();
        assert_eq!(tags, vec!["div", "p", "ul", "li"]);
    }

    #[test]
    fn test_class_tokens() {
        let fragment = Fragment::parse(r#"<span class="  collapse   highlight  ">x</span>"#);
        let span = &fragment.elements_with_class("highlight", true)[0];
        assert_eq!(span.class_tokens(), vec!["collapse", "highlight"]);
        assert!(span.has_class("collapse", true));
        assert!(!span.has_class("high", true));
    }

    #[test]
    fn test_class_case_folding() {
        let fragment = Fragment::parse(r#"<p class="Highlight">x</p>"#);
        assert!(fragment.elements_with_class("highlight", true).is_empty());
        assert_eq!(fragment.elements_with_class("highlight", false).len(), 1);
    }

    #[test]
    fn test_gt_inside_attribute_value() {
        let fragment = Fragment::parse(r#"<p title="a > b" class="highlight">Dose</p>"#);
        let p = &fragment.elements_with_class("highlight", true)[0];
        assert_eq!(p.attr("title").as_deref(), Some("a > b"));
        assert_eq!(p.text_content(), "Dose");
    }

    #[test]
    fn test_inner_html_includes_nested_markup() {
        let fragment =
            Fragment::parse(r#"<div class="highlight">Avoid <b>alcohol</b> <i>entirely</i></div>"#);
        let div = &fragment.elements_with_class("highlight", true)[0];
        assert_eq!(div.inner_html(), "Avoid <b>alcohol</b> <i>entirely</i>");
        assert_eq!(div.text_content(), "Avoid alcohol entirely");
    }

    #[test]
    fn test_text_content_breaks_words_at_tags() {
        let fragment = Fragment::parse("<p>one</p><p>two</p>\n\t<!-- note --><p>  three </p>");
        assert_eq!(fragment.text_content(), "one two three");
    }

    #[test]
    fn test_deeply_nested_markup() {
        let depth = 50_000;
        let html = format!(
            r#"{}<p class="highlight">deep text</p>{}"#,
            "<span>".repeat(depth),
            "</span>".repeat(depth)
        );
        let fragment = Fragment::parse(&html);

        let elements = fragment.elements();
        assert_eq!(elements.len(), depth + 4);
        assert_eq!(fragment.elements_with_class("highlight", true).len(), 1);
        assert_eq!(fragment.text_content(), "deep text");

        let unclosed = Fragment::parse(&"<span>".repeat(depth));
        assert!(!unclosed.elements().is_empty());
        assert_eq!(unclosed.text_content(), "");
    }

    #[test]
    fn test_table_cells_outside_table_are_dropped() {
        let stray = Fragment::parse(r#"<td class="highlight">Pregnancy</td>"#);
        assert!(stray.elements_with_class("highlight", true).is_empty());
        assert_eq!(stray.text_content(), "Pregnancy");

        let table = Fragment::parse(
            r#"<div><table><tr><td class="highlight">Pregnancy</td></tr></table></div>"#,
        );
        let cells = table.elements_with_class("highlight", true);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].tag_name(), "td");
    }
}
