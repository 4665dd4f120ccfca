//! In-memory page for tests

use std::collections::HashMap;

use super::Page;

#[derive(Debug, Clone, Default)]
pub(crate) struct FixtureElement {
    text: String,
    attrs: HashMap<String, String>,
    /// Children addressable by class name
    children: Vec<(String, FixtureElement)>,
}

impl FixtureElement {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn child(mut self, class: &str, child: FixtureElement) -> Self {
        self.children.push((class.to_string(), child));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FixturePage {
    elements: HashMap<String, FixtureElement>,
}

impl FixturePage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, id: &str, element: FixtureElement) -> Self {
        self.elements.insert(id.to_string(), element);
        self
    }
}

impl Page for FixturePage {
    type Node<'a> = &'a FixtureElement;

    fn element_by_id(&self, id: &str) -> Option<&FixtureElement> {
        self.elements.get(id)
    }

    fn first_by_class<'a>(&'a self, scope: &'a FixtureElement, class: &str) -> Option<&'a FixtureElement> {
        scope
            .children
            .iter()
            .find(|(c, _)| c == class)
            .map(|(_, child)| child)
    }

    fn text<'a>(&'a self, node: &'a FixtureElement) -> String {
        node.text.clone()
    }

    fn attr<'a>(&'a self, node: &'a FixtureElement, name: &str) -> Option<String> {
        node.attrs.get(name).cloned()
    }
}
