//! Flattens a page into terminal lines
//!
//! Every line knows which page region it came from, and every tracked element
//! gets its bounds in line units so the runtime can observe it.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vitrine_core::page::{ElementKind, PageElement, PageSpec};
use vitrine_core::{Bounds, ElementId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Heading { section: usize },
    Body { section: usize },
    Counter { section: usize, element: ElementId },
    FormHeading,
    Field { index: usize },
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    pub kind: LineKind,
    /// Static text; counter and field lines are filled in at render time
    pub text: String,
    /// Reveal target this line belongs to, if any
    pub reveal: Option<ElementId>,
}

impl PageLine {
    fn new(kind: LineKind, text: impl Into<String>, reveal: Option<ElementId>) -> Self {
        Self {
            kind,
            text: text.into(),
            reveal,
        }
    }

    fn blank() -> Self {
        Self::new(LineKind::Blank, "", None)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub lines: Vec<PageLine>,
    /// Bounds of every tracked element, in line units
    pub bounds: Vec<(ElementId, Bounds)>,
    /// First line of each section
    pub section_tops: Vec<u16>,
    /// First line of the form, if the page has one
    pub form_top: Option<u16>,
    /// Line of each form field
    pub field_lines: Vec<u16>,
}

/// Line index as a scroll offset, saturating at `u16::MAX`
fn line_offset(index: usize) -> u16 {
    index.min(u16::MAX as usize) as u16
}

impl PageLayout {
    pub fn height(&self) -> u16 {
        line_offset(self.lines.len())
    }

    /// Largest scroll offset that still fills the viewport
    pub fn max_scroll(&self, viewport_height: u16) -> u16 {
        self.height().saturating_sub(viewport_height)
    }
}

/// Lay the page out for a content area `width` cells wide
pub fn layout_page(page: &PageSpec, elements: &[PageElement], width: u16) -> PageLayout {
    let width = width.max(1) as usize;
    let mut layout = PageLayout::default();

    for (section_idx, section) in page.sections.iter().enumerate() {
        let reveal = elements.iter().find_map(|e| match e.kind {
            ElementKind::Reveal { section } if section == section_idx => Some(e.id),
            _ => None,
        });

        let top = layout.lines.len();
        layout.section_tops.push(line_offset(top));

        layout.lines.push(PageLine::new(
            LineKind::Heading { section: section_idx },
            section.heading.clone(),
            reveal,
        ));
        for paragraph in section.body.lines() {
            for line in wrap_text(paragraph, width) {
                layout.lines.push(PageLine::new(
                    LineKind::Body { section: section_idx },
                    line,
                    reveal,
                ));
            }
        }

        for (index, counter) in section.counters.iter().enumerate() {
            let element = elements.iter().find_map(|e| match e.kind {
                ElementKind::Counter { section, index: i } if section == section_idx && i == index => {
                    Some(e.id)
                }
                _ => None,
            });
            let Some(element) = element else { continue };

            let line = layout.lines.len();
            layout.lines.push(PageLine::new(
                LineKind::Counter {
                    section: section_idx,
                    element,
                },
                counter.label.clone(),
                reveal,
            ));
            layout.bounds.push((element, Bounds::new(line as f64, 1.0)));
        }

        if let Some(id) = reveal {
            let height = layout.lines.len() - top;
            layout.bounds.push((id, Bounds::new(top as f64, height as f64)));
        }
        layout.lines.push(PageLine::blank());
    }

    if let Some(form) = &page.form {
        layout.form_top = Some(line_offset(layout.lines.len()));
        let heading = form.heading.clone().unwrap_or_else(|| "Contact".to_string());
        layout.lines.push(PageLine::new(LineKind::FormHeading, heading, None));
        for (index, field) in form.fields.iter().enumerate() {
            layout.field_lines.push(line_offset(layout.lines.len()));
            layout.lines.push(PageLine::new(
                LineKind::Field { index },
                field.display_label(),
                None,
            ));
        }
        if form.status_region {
            layout.lines.push(PageLine::new(LineKind::Status, "", None));
        }
    }

    // Reveal bounds were pushed after their counters; keep registration order
    layout.bounds.sort_by_key(|(id, _)| *id);
    layout
}

/// Greedy word wrap by display width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width > width {
            // Hard-break words longer than a line
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current_width + w > width && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
            continue;
        }

        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::page::SectionSpec;

    const PAGE: &str = r#"
        title = "Layout"

        [[sections]]
        id = "intro"
        heading = "Intro"
        body = "one two three four five six"

        [[sections]]
        id = "numbers"
        heading = "Numbers"
        reveal = false

        [[sections.counters]]
        label = "Clients"
        value = 40

        [form]
        fields = [{ name = "email", type = "email" }]
    "#;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_respects_wide_chars() {
        assert_eq!(wrap_text("日本語 です", 6), vec!["日本語", "です"]);
    }

    #[test]
    fn test_layout_bounds() {
        let page = PageSpec::from_toml_str(PAGE).unwrap();
        let elements = page.elements();
        let layout = layout_page(&page, &elements, 13);

        // Intro: heading + 2 wrapped body lines, then a blank
        assert_eq!(layout.section_tops, vec![0, 4]);
        assert_eq!(
            layout.bounds,
            vec![
                (ElementId(0), Bounds::new(0.0, 3.0)),
                (ElementId(1), Bounds::new(5.0, 1.0)),
            ]
        );
        assert_eq!(layout.form_top, Some(7));
        assert_eq!(layout.field_lines, vec![8]);
        assert_eq!(layout.lines.last().unwrap().kind, LineKind::Status);
        assert_eq!(layout.max_scroll(5), layout.height() - 5);
    }

    #[test]
    fn test_offsets_saturate_on_huge_pages() {
        let section = |heading: &str, body: String| SectionSpec {
            id: None,
            heading: heading.to_string(),
            body,
            reveal: false,
            counters: Vec::new(),
        };
        let page = PageSpec {
            title: "Long".to_string(),
            sections: vec![section("Long", "x\n".repeat(70_000)), section("After", String::new())],
            ..PageSpec::default()
        };
        let layout = layout_page(&page, &page.elements(), 80);

        assert!(layout.lines.len() > u16::MAX as usize);
        assert_eq!(layout.height(), u16::MAX);
        assert_eq!(layout.section_tops, vec![0, u16::MAX]);
        assert!(layout.section_tops[1] <= layout.height());
    }
}
