use scraper::{ElementRef, Html, Selector};

use super::Page;

/// A parsed HTML document
pub(crate) struct HtmlPage {
    html: Html,
}

impl HtmlPage {
    pub(crate) fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Page with no timetable content
    pub(crate) fn empty() -> Self {
        Self::parse("<html><body></body></html>")
    }

    pub(crate) fn document(&self) -> &Html {
        &self.html
    }
}

impl Page for HtmlPage {
    type Node<'a> = ElementRef<'a>;

    fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(&format!("#{id}")).ok()?;
        self.html.select(&selector).next()
    }

    fn first_by_class<'a>(&'a self, scope: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
        let selector = Selector::parse(&format!(".{class}")).ok()?;
        scope.select(&selector).next()
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text().collect()
    }

    fn attr<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<String> {
        node.value().attr(name).map(str::to_string)
    }
}
