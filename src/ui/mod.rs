//! Owned UI-hierarchy tree, bounds geometry and selector matching.

pub mod poll;
pub mod provider;

use regex::Regex;

use crate::error::{Error, Result};

/// Screen-pixel rectangle attached to a UI node, as serialized by
/// uiautomator: `[x0,y0][x1,y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Bounds {
    pub fn parse(raw: &str) -> Result<Self> {
        let re = Regex::new(r"\[(\d+),(\d+)\]\[(\d+),(\d+)\]")
            .map_err(|err| Error::parse("bounds pattern", err.to_string()))?;
        let caps = re
            .captures(raw)
            .ok_or_else(|| Error::parse("bounds", raw))?;
        let field = |index: usize| -> Result<i32> {
            caps[index]
                .parse()
                .map_err(|_| Error::parse("bounds", raw))
        };
        Ok(Self {
            x0: field(1)?,
            y0: field(2)?,
            x1: field(3)?,
            y1: field(4)?,
        })
    }

    /// Midpoint with integer division, matching tap coordinates.
    pub fn center(&self) -> (i32, i32) {
        ((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }

    /// Strict containment: points on any edge are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x0 < x && x < self.x1 && self.y0 < y && y < self.y1
    }
}

/// One node of a parsed hierarchy dump. The tree is owned so it can outlive
/// the XML text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn bounds(&self) -> Result<Bounds> {
        let raw = self
            .attr("bounds")
            .ok_or_else(|| Error::parse("bounds", format!("<{}> has no bounds", self.tag)))?;
        Bounds::parse(raw)
    }

    pub fn center(&self) -> Result<(i32, i32)> {
        Ok(self.bounds()?.center())
    }

    /// All nodes of the subtree (self included) in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First node in document order matched by the selector, if any.
    pub fn find(&self, selector: &Selector) -> Option<&UiNode> {
        self.descendants().find(|node| selector.matches(node))
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a UiNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a UiNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Tree query: an optional tag name plus attribute-equality predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    attrs: Vec<(String, String)>,
}

impl Selector {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            tag: Some(name.into()),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn matches(&self, node: &UiNode) -> bool {
        if let Some(tag) = &self.tag {
            if &node.tag != tag {
                return false;
            }
        }
        self.attrs
            .iter()
            .all(|(name, value)| node.attr(name) == Some(value.as_str()))
    }
}

/// Parse a hierarchy dump into an owned tree rooted at the document element.
pub fn parse_hierarchy(xml: &str) -> Result<UiNode> {
    let doc = roxmltree::Document::parse(xml.trim())?;
    Ok(convert_node(doc.root_element()))
}

fn convert_node(node: roxmltree::Node) -> UiNode {
    UiNode {
        tag: node.tag_name().name().to_string(),
        attrs: node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect(),
        children: node
            .children()
            .filter(|child| child.is_element())
            .map(convert_node)
            .collect(),
    }
}

/// Nodes whose bounds strictly contain the point. A node with missing or
/// malformed bounds fails the whole call rather than being skipped.
pub fn containers<'a>(
    x: i32,
    y: i32,
    nodes: impl IntoIterator<Item = &'a UiNode>,
) -> Result<Vec<&'a UiNode>> {
    let mut filtered = Vec::new();
    for node in nodes {
        if node.bounds()?.contains(x, y) {
            filtered.push(node);
        }
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_bounds(raw: &str) -> UiNode {
        UiNode {
            tag: "node".to_string(),
            attrs: vec![("bounds".to_string(), raw.to_string())],
            children: Vec::new(),
        }
    }

    #[test]
    fn parses_bounds_rectangle() {
        let bounds = Bounds::parse("[0,0][1080,1920]").expect("parse");
        assert_eq!(
            bounds,
            Bounds {
                x0: 0,
                y0: 0,
                x1: 1080,
                y1: 1920
            }
        );
    }

    #[test]
    fn malformed_bounds_is_a_parse_error() {
        for raw in ["", "[0,0]", "[a,b][c,d]", "0,0 10,10"] {
            let err = Bounds::parse(raw).expect_err("should reject");
            assert!(matches!(err, Error::Parse { .. }), "raw: {raw:?}");
        }
    }

    #[test]
    fn center_uses_integer_division() {
        let bounds = Bounds::parse("[0,0][10,20]").expect("parse");
        assert_eq!(bounds.center(), (5, 10));
        let odd = Bounds::parse("[0,0][5,5]").expect("parse");
        assert_eq!(odd.center(), (2, 2));
    }

    #[test]
    fn containment_is_strict() {
        let bounds = Bounds::parse("[0,0][10,10]").expect("parse");
        assert!(bounds.contains(5, 5));
        assert!(!bounds.contains(0, 5));
        assert!(!bounds.contains(10, 5));
        assert!(!bounds.contains(5, 0));
        assert!(!bounds.contains(5, 10));
    }

    #[test]
    fn containers_filters_by_strict_containment() {
        let inside = node_with_bounds("[0,0][10,10]");
        let edge = node_with_bounds("[5,0][20,20]");
        let nodes = vec![inside.clone(), edge];
        let found = containers(5, 5, &nodes).expect("containers");
        assert_eq!(found, vec![&inside]);
    }

    #[test]
    fn containers_propagates_malformed_bounds() {
        let broken = UiNode {
            tag: "node".to_string(),
            attrs: vec![("bounds".to_string(), "oops".to_string())],
            children: Vec::new(),
        };
        let nodes = vec![broken];
        assert!(containers(1, 1, &nodes).is_err());
    }

    const SAMPLE: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<hierarchy rotation="0">
  <node class="android.widget.FrameLayout" bounds="[0,0][1080,1920]">
    <node class="android.widget.Button" resource-id="com.foo:id/ok" text="OK" bounds="[100,200][300,300]"/>
  </node>
</hierarchy>"#;

    #[test]
    fn parses_hierarchy_dump() {
        let root = parse_hierarchy(SAMPLE).expect("parse");
        assert_eq!(root.tag, "hierarchy");
        assert_eq!(root.attr("rotation"), Some("0"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children[0].attr("text"), Some("OK"));
    }

    #[test]
    fn selector_finds_by_attribute() {
        let root = parse_hierarchy(SAMPLE).expect("parse");
        let selector = Selector::tag("node").attr("resource-id", "com.foo:id/ok");
        let button = root.find(&selector).expect("should match");
        assert_eq!(button.center().expect("center"), (200, 250));
        assert!(root
            .find(&Selector::tag("node").attr("text", "Cancel"))
            .is_none());
    }

    #[test]
    fn selector_any_matches_root() {
        let root = parse_hierarchy(SAMPLE).expect("parse");
        assert!(Selector::any().matches(&root));
        assert_eq!(root.find(&Selector::any()).map(|n| n.tag.as_str()), Some("hierarchy"));
    }
}
