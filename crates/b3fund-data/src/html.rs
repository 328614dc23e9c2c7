//! Small helpers over `scraper` shared by the providers.

use scraper::{ElementRef, Html, Selector};

use crate::error::{DataError, Result};

/// Compiles a CSS selector.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::Selector(format!("{css:?}: {e}")))
}

/// Text content of an element with whitespace runs collapsed.
pub fn text_of(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Following sibling elements named `tag` (the CSS `~` combinator).
pub fn following_siblings<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(move |sibling| sibling.value().name() == tag)
}

/// `tag` elements whose text contains `needle` (the `:contains()` pseudo
/// class), skipping outer elements that only match through a nested `tag`.
pub fn elements_containing<'a>(
    document: &'a Html,
    tag: &str,
    needle: &str,
) -> Result<Vec<ElementRef<'a>>> {
    let sel = selector(tag)?;

    let matches = document
        .select(&sel)
        .filter(|el| el.text().collect::<String>().contains(needle))
        .filter(|el| {
            !el.descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .any(|inner| {
                    inner.value().name() == tag
                        && inner.text().collect::<String>().contains(needle)
                })
        })
        .collect();

    Ok(matches)
}

/// Text of the first `td` following a `td` labelled `label`.
pub fn cell_after_label(document: &Html, label: &str) -> Result<Option<String>> {
    let value = elements_containing(document, "td", label)?
        .into_iter()
        .find_map(|cell| following_siblings(cell, "td").next())
        .map(text_of);

    Ok(value)
}
