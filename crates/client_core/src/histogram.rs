//! Location counts per category label, and the chart slices built from them.

use std::collections::HashMap;

use serde::Serialize;
use sha2::{Digest, Sha256};
use shared::domain::Location;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub category: String,
    pub count: usize,
    pub color: String,
}

/// Labels are compared verbatim: "warehouse" and "Warehouse" are distinct.
/// Entries keep first-seen order so rendering is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryHistogram {
    entries: Vec<CategoryCount>,
}

impl CategoryHistogram {
    pub fn from_locations<'a>(locations: impl IntoIterator<Item = &'a Location>) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut entries: Vec<CategoryCount> = Vec::new();

        for location in locations {
            let category = location.category.as_str();
            match index.get(category) {
                Some(&slot) => entries[slot].count += 1,
                None => {
                    index.insert(category, entries.len());
                    entries.push(CategoryCount {
                        category: category.to_string(),
                        count: 1,
                    });
                }
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryCount] {
        &self.entries
    }

    pub fn count(&self, category: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map_or(0, |e| e.count)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chart(&self) -> Vec<ChartSlice> {
        self.entries
            .iter()
            .map(|e| ChartSlice {
                category: e.category.clone(),
                count: e.count,
                color: category_color(&e.category),
            })
            .collect()
    }
}

/// Stable `#rrggbb` colour for a category label.
pub fn category_color(category: &str) -> String {
    let digest = Sha256::digest(category.as_bytes());
    format!("#{:02x}{:02x}{:02x}", digest[0], digest[1], digest[2])
}
