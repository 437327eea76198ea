//! Books as ordered pages of text.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub pages: Vec<String>,
}

/// Where to go after a page is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationDecision {
    Advance { next_page: usize },
    EndOfBook,
}

impl Book {
    pub fn new<T: Into<String>>(title: T, pages: Vec<String>) -> Self {
        Self {
            title: title.into(),
            pages,
        }
    }

    /// A one-page book wrapping loose text.
    pub fn single_page<T: Into<String>>(text: T) -> Self {
        Self {
            title: String::new(),
            pages: vec![text.into()],
        }
    }

    pub fn page(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn decision_after(&self, page: usize) -> NavigationDecision {
        if page + 1 < self.pages.len() {
            NavigationDecision::Advance {
                next_page: page + 1,
            }
        } else {
            NavigationDecision::EndOfBook
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a book from a `.toml` or `.json` file, chosen by extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }
}
