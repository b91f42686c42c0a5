//! Immutable emission fragments.
//!
//! A fragment is a backend-neutral description of one emitted element: the
//! element name, its arguments (attributes, constructor arguments), its style
//! properties, an ordered modifier chain, and its children or literal
//! content. Builders take `self` and return a new value, so style composition
//! is a chain of pure functions.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    /// Tag, widget, or view name. Empty for a fragment that emits nothing.
    pub element: String,
    /// Attributes or named arguments, in insertion order.
    pub args: IndexMap<String, String>,
    /// CSS declarations or utility classes.
    pub styles: IndexMap<String, String>,
    /// Modifiers or wrappers, innermost first. May repeat.
    pub modifiers: Vec<(String, String)>,
    pub children: Vec<Fragment>,
    /// Literal lines (text, markup) emitted as the element's content.
    pub content: Vec<String>,
    /// Layer name or other annotation rendered as a comment.
    pub comment: Option<String>,
}

impl Fragment {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            ..Default::default()
        }
    }

    /// A fragment that renders to nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.element.is_empty()
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Add a style; a later value for the same property wins.
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    /// Add a utility class.
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_style(class, "")
    }

    pub fn with_modifier(mut self, name: impl Into<String>, args: impl Into<String>) -> Self {
        self.modifiers.push((name.into(), args.into()));
        self
    }

    pub fn with_child(mut self, child: Fragment) -> Self {
        if !child.is_empty() {
            self.children.push(child);
        }
        self
    }

    pub fn with_children(self, children: impl IntoIterator<Item = Fragment>) -> Self {
        children.into_iter().fold(self, Fragment::with_child)
    }

    pub fn with_content(mut self, line: impl Into<String>) -> Self {
        self.content.push(line.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Space-separated class list.
    pub fn class_list(&self) -> String {
        self.styles.keys().cloned().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_compose() {
        let fragment = Fragment::new("div")
            .with_style("width", "10px")
            .with_style("width", "12px")
            .with_modifier("padding", "8")
            .with_modifier("padding", "4")
            .with_child(Fragment::empty())
            .with_child(Fragment::new("span"));
        assert_eq!(fragment.styles.get("width").map(String::as_str), Some("12px"));
        assert_eq!(fragment.modifiers.len(), 2);
        assert_eq!(fragment.children.len(), 1);
    }

    #[test]
    fn test_class_list_keeps_order() {
        let fragment = Fragment::new("div").with_class("flex").with_class("gap-4").with_class("flex");
        assert_eq!(fragment.class_list(), "flex gap-4");
    }
}
