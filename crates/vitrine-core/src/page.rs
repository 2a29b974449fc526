//! Page description
//!
//! A page is described in TOML: an optional header, optional navigation,
//! ordered sections (some of which reveal on scroll and may carry counters),
//! and an optional inquiry form. Every region is optional; a missing region
//! just disables the component that would drive it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::counter::CounterSpec;
use crate::form::FieldSpec;
use crate::observer::ElementId;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub title: String,
    #[serde(default)]
    pub header: Option<HeaderSpec>,
    #[serde(default)]
    pub nav: Option<NavSpec>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub form: Option<FormSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSpec {
    pub brand: String,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSpec {
    /// Whether a menu toggle control exists
    #[serde(default = "default_true")]
    pub toggle: bool,
    #[serde(default)]
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    /// Id of the section the link jumps to
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub heading: String,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_true")]
    pub reveal: bool,
    #[serde(default)]
    pub counters: Vec<CounterMarkup>,
}

/// A markup attribute that may be written as a string or a bare number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Attribute {
    pub fn as_text(&self) -> String {
        match self {
            Attribute::Int(v) => v.to_string(),
            Attribute::Float(v) => v.to_string(),
            Attribute::Text(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterMarkup {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: Option<Attribute>,
    #[serde(default)]
    pub decimals: Option<Attribute>,
    #[serde(default)]
    pub suffix: Option<String>,
}

impl CounterMarkup {
    pub fn spec(&self) -> CounterSpec {
        let value = self.value.as_ref().map(Attribute::as_text);
        let decimals = self.decimals.as_ref().map(Attribute::as_text);
        CounterSpec::from_attributes(value.as_deref(), decimals.as_deref(), self.suffix.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    #[serde(default)]
    pub heading: Option<String>,
    /// Whether a status region exists
    #[serde(default = "default_true")]
    pub status_region: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_true() -> bool {
    true
}

/// What an element id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A section that reveals on scroll
    Reveal { section: usize },
    Counter { section: usize, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageElement {
    pub id: ElementId,
    pub kind: ElementKind,
}

impl PageSpec {
    /// Load and validate a page description from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let page: PageSpec = toml::from_str(content)?;
        page.validate()?;
        Ok(page)
    }

    /// Reject duplicate section ids and form field names; warn on dangling links
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for section in &self.sections {
            if let Some(id) = &section.id {
                if !ids.insert(id.as_str()) {
                    return Err(Error::PageSpec(format!("duplicate section id '{}'", id)));
                }
            }
        }

        if let Some(nav) = &self.nav {
            for link in &nav.links {
                if !ids.contains(link.target.as_str()) {
                    warn!(link_target = %link.target, label = %link.label, "Nav link points at no section");
                }
            }
        }

        if let Some(form) = &self.form {
            let mut names = HashSet::new();
            for field in &form.fields {
                if field.name.trim().is_empty() {
                    return Err(Error::PageSpec("form field without a name".to_string()));
                }
                if !names.insert(field.name.as_str()) {
                    return Err(Error::PageSpec(format!("duplicate form field '{}'", field.name)));
                }
            }
        }

        Ok(())
    }

    /// Element ids in page order: each revealing section, then its counters
    pub fn elements(&self) -> Vec<PageElement> {
        let mut elements = Vec::new();
        for (section_idx, section) in self.sections.iter().enumerate() {
            if section.reveal {
                elements.push(PageElement {
                    id: ElementId(elements.len()),
                    kind: ElementKind::Reveal {
                        section: section_idx,
                    },
                });
            }
            for index in 0..section.counters.len() {
                elements.push(PageElement {
                    id: ElementId(elements.len()),
                    kind: ElementKind::Counter {
                        section: section_idx,
                        index,
                    },
                });
            }
        }
        elements
    }

    /// Index of the section a nav link points at
    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.id.as_deref() == Some(id))
    }

    pub fn has_menu_toggle(&self) -> bool {
        self.nav.as_ref().is_some_and(|nav| nav.toggle)
    }

    pub fn nav_links(&self) -> &[NavLink] {
        self.nav.as_ref().map(|n| n.links.as_slice()).unwrap_or(&[])
    }
}
