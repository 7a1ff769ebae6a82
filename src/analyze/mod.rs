//! Specialized detectors outside the catalog core: idle applications,
//! oversized files, abandoned build artifacts.
//!
//! Each produces findings of its own shape; the [`ItemSource`] contract
//! normalizes them into the shared item model so a finding set can be
//! wrapped in a [`Report`](crate::model::Report) and handed unmodified to
//! the cleanup engine.

pub mod apps;
pub mod large_files;
pub mod projects;

use crate::model::{CategoryResult, Item};

/// A finding convertible into the unit of sizing and deletion
pub trait ItemSource {
    fn item(&self) -> Item;
}

/// Group analyzer findings into one category for the engine
pub fn category_result<T: ItemSource>(
    name: impl Into<String>,
    icon: impl Into<String>,
    findings: &[T],
) -> CategoryResult {
    CategoryResult::new(name, icon, findings.iter().map(|f| f.item()).collect())
}
