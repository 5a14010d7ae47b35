//! Storefront categories: a named bucket with an optional tile image and a
//! flat list of sub-category labels.

use serde::{Deserialize, Serialize};

/// Editable category document, as posted by the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sub_categories: Vec<String>,
}

impl CategoryDraft {
    /// Trims the name and sub-categories, dropping blank and repeated
    /// sub-categories while keeping their first-seen order.
    pub fn tidy(&mut self) {
        self.name = self.name.trim().to_owned();

        let mut seen: Vec<String> = Vec::with_capacity(self.sub_categories.len());
        for sub in &self.sub_categories {
            let sub = sub.trim();
            if !sub.is_empty() && !seen.iter().any(|s| s == sub) {
                seen.push(sub.to_owned());
            }
        }
        self.sub_categories = seen;
    }
}
