use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A class-list selector: an element matches when it carries every class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMarker(Vec<String>);

impl ClassMarker {
    pub fn parse(spec: &str) -> Self {
        Self(spec.split_whitespace().map(str::to_owned).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.0
    }
}

/// Minimal element tree, enough to find the order list and count its rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    #[serde(default, rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    pub fn matches(&self, marker: &ClassMarker) -> bool {
        !marker.is_empty() && marker.classes().iter().all(|c| self.has_class(c))
    }

    /// First match in document order, this element included.
    pub fn find_first(&self, marker: &ClassMarker) -> Option<&Element> {
        if self.matches(marker) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_first(marker))
    }

    /// Matching descendants, this element excluded.
    pub fn count_matching(&self, marker: &ClassMarker) -> usize {
        self.children
            .iter()
            .map(|child| usize::from(child.matches(marker)) + child.count_matching(marker))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Element {
        Element::new("DIV").with_class("ReactVirtualized__Table__row")
    }

    #[test]
    fn marker_requires_every_class() {
        let marker = ClassMarker::parse("Grid  Table__Grid");
        let grid = Element::new("DIV").with_class("Grid Table__Grid scrollable");
        let partial = Element::new("DIV").with_class("Grid");

        assert!(grid.matches(&marker));
        assert!(!partial.matches(&marker));
    }

    #[test]
    fn empty_marker_matches_nothing() {
        let marker = ClassMarker::parse("   ");
        assert!(!Element::new("DIV").matches(&marker));
    }

    #[test]
    fn find_first_walks_in_document_order() {
        let marker = ClassMarker::parse("target");
        let tree = Element::new("BODY")
            .with_child(Element::new("DIV").with_child(Element::new("P").with_class("target").with_text("first")))
            .with_child(Element::new("P").with_class("target").with_text("second"));

        let found = tree.find_first(&marker).unwrap();
        assert_eq!(found.text.as_deref(), Some("first"));
    }

    #[test]
    fn counts_nested_rows_but_not_self() {
        let marker = ClassMarker::parse("ReactVirtualized__Table__row");
        let container = row()
            .with_child(row())
            .with_child(Element::new("DIV").with_child(row()).with_child(row()));

        assert_eq!(container.count_matching(&marker), 3);
    }

    #[test]
    fn deserializes_with_defaults() {
        let element: Element = serde_json::from_str(
            r#"{"tag":"DIV","class":"a b","children":[{"tag":"SPAN","text":"1.25"}]}"#,
        )
        .unwrap();

        assert!(element.has_class("b"));
        assert_eq!(element.children[0].text.as_deref(), Some("1.25"));
        assert!(element.attributes.is_empty());
    }
}
