use crate::models::catalog::CatalogEntry;
use crate::models::library::GameMeta;
use serde::{Deserialize, Serialize};

/// A catalog entry joined with the installation it was resolved from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Game {
    pub entry: CatalogEntry,
    pub meta: GameMeta,
}

impl Game {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn is_native(&self) -> bool {
        self.meta.is_native
    }

    /// Case-insensitive substring match on the title; an empty query matches all.
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.name().to_lowercase().contains(&query.to_lowercase())
    }
}
