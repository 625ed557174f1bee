//! Reference data lookups over the static tables

use crate::entities::reference::{ReferenceTable, REFERENCE_TABLES};

pub fn tables() -> &'static [ReferenceTable] {
    REFERENCE_TABLES
}

/// Tables whose title, or any item's name or value, contains `query`
/// (case-insensitive). Matching tables are returned whole; an empty
/// query returns everything.
pub fn filter(query: &str) -> Vec<&'static ReferenceTable> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return REFERENCE_TABLES.iter().collect();
    }
    let hit = |s: &str| s.to_lowercase().contains(&needle);
    REFERENCE_TABLES
        .iter()
        .filter(|table| {
            hit(table.title)
                || table
                    .items
                    .iter()
                    .any(|item| hit(item.name) || hit(item.value))
        })
        .collect()
}

/// Distinct categories in table order
pub fn categories() -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for table in REFERENCE_TABLES {
        if !seen.contains(&table.category) {
            seen.push(table.category);
        }
    }
    seen
}

/// Tables in `category` (case-insensitive)
pub fn by_category(category: &str) -> Vec<&'static ReferenceTable> {
    REFERENCE_TABLES
        .iter()
        .filter(|t| t.category.eq_ignore_ascii_case(category.trim()))
        .collect()
}

/// Table with exactly this title (case-insensitive)
pub fn table(title: &str) -> Option<&'static ReferenceTable> {
    REFERENCE_TABLES
        .iter()
        .find(|t| t.title.eq_ignore_ascii_case(title.trim()))
}
