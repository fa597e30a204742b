//! Arranges normalized hits for display.

use super::item::{ResultType, SearchResultItem};

/// Single-type result sets up to this size render as a plain list.
pub const FLAT_LIST_MAX: usize = 3;

#[derive(Debug, PartialEq, Eq)]
pub struct ResultSection<'a> {
    pub kind: ResultType,
    pub items: Vec<&'a SearchResultItem>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DisplayLayout<'a> {
    /// Nothing matched. Rendered as guidance, not as an error.
    Empty,
    Flat(Vec<&'a SearchResultItem>),
    /// One section per type, in order of first appearance.
    Sections(Vec<ResultSection<'a>>),
}

pub fn layout(items: &[SearchResultItem]) -> DisplayLayout<'_> {
    if items.is_empty() {
        return DisplayLayout::Empty;
    }

    let mut sections: Vec<ResultSection<'_>> = Vec::new();
    for item in items {
        match sections.iter_mut().find(|s| s.kind == item.kind) {
            Some(section) => section.items.push(item),
            None => sections.push(ResultSection {
                kind: item.kind,
                items: vec![item],
            }),
        }
    }

    if sections.len() == 1 && items.len() <= FLAT_LIST_MAX {
        return DisplayLayout::Flat(items.iter().collect());
    }
    DisplayLayout::Sections(sections)
}
