//! Read-only page capability
//!
//! Extraction only ever needs id lookup, a class lookup scoped to a node,
//! text content and attributes. Real pages are parsed HTML; tests use an
//! in-memory fixture.

#[cfg(test)]
pub(crate) mod fixture;
mod html;

pub(crate) use html::HtmlPage;

/// DOM-like lookups over one loaded page
pub(crate) trait Page {
    /// Handle to one element of the page
    type Node<'a>: Copy
    where
        Self: 'a;

    /// `getElementById` equivalent
    fn element_by_id(&self, id: &str) -> Option<Self::Node<'_>>;

    /// `scope.querySelector('.class')` equivalent
    fn first_by_class<'a>(&'a self, scope: Self::Node<'a>, class: &str) -> Option<Self::Node<'a>>;

    /// Concatenated text content of the node and its descendants
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    fn attr<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<String>;
}
