use serde::Serialize;

use crate::catalog::{Catalog, Record};
use crate::store::{ConvertedIds, ConvertedStore};

/// Selection key of the pseudo-category that gathers converted records
/// from every category.
pub const CONVERTED_KEY: &str = "converted";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Category(String),
    Converted,
}

impl Selection {
    pub fn from_key(key: &str) -> Self {
        if key == CONVERTED_KEY {
            Self::Converted
        } else {
            Self::Category(key.to_string())
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub with_location_link: usize,
    pub converted: usize,
}

// position of a record inside the catalog: (category index, record index)
type RecordRef = (usize, usize);

/// Holds the catalog and the converted marks, and derives the visible list
/// from the current selection and search term.
///
/// The visible list is only recomputed by [`select_category`] and
/// [`apply_search`]; marking or unmarking leaves it as it was until the
/// caller asks again.
///
/// [`select_category`]: DirectoryEngine::select_category
/// [`apply_search`]: DirectoryEngine::apply_search
pub struct DirectoryEngine<S: ConvertedStore> {
    catalog: Catalog,
    converted: ConvertedIds,
    store: S,
    selected: Option<Selection>,
    search_term: String,
    visible: Vec<RecordRef>,
}

impl<S: ConvertedStore> DirectoryEngine<S> {
    /// Rehydrates the converted set from `store`. An unreadable store starts
    /// the session with no marks.
    pub fn new(catalog: Catalog, store: S) -> Self {
        let converted = match store.load() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "starting with an empty converted set");
                ConvertedIds::new()
            }
        };
        tracing::debug!(
            categories = catalog.len(),
            records = catalog.record_count(),
            converted = converted.len(),
            "directory engine ready"
        );
        Self {
            catalog,
            converted,
            store,
            selected: None,
            search_term: String::new(),
            visible: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Selects a category, or the converted pseudo-category for
    /// [`CONVERTED_KEY`], and clears the search term. Unknown keys select
    /// an empty list.
    pub fn select_category(&mut self, key: &str) -> Vec<&Record> {
        self.selected = Some(Selection::from_key(key));
        self.search_term.clear();
        self.visible = self.base_refs();
        self.visible()
    }

    /// Filters the current selection's base set. The term is trimmed and
    /// lowercased; an empty term restores the whole base set. Without a
    /// selection the term is kept and the list stays empty.
    pub fn apply_search(&mut self, term: &str) -> Vec<&Record> {
        self.search_term = term.trim().to_lowercase();
        self.visible = if self.search_term.is_empty() {
            self.base_refs()
        } else {
            self.base_refs()
                .into_iter()
                .filter(|&r| self.record_at(r).matches_search(&self.search_term))
                .collect()
        };
        self.visible()
    }

    pub fn visible(&self) -> Vec<&Record> {
        self.visible.iter().map(|&r| self.record_at(r)).collect()
    }

    pub fn mark_converted(&mut self, id: u64) {
        self.converted.insert(id);
        tracing::info!(id, "marked as converted");
        self.persist();
    }

    pub fn unmark_converted(&mut self, id: u64) {
        self.converted.remove(&id);
        tracing::info!(id, "unmarked as converted");
        self.persist();
    }

    pub fn is_converted(&self, id: u64) -> bool {
        self.converted.contains(&id)
    }

    pub fn converted_ids(&self) -> &ConvertedIds {
        &self.converted
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total: self.catalog.record_count(),
            with_location_link: self
                .catalog
                .records()
                .filter(|r| r.has_location_link())
                .count(),
            converted: self.converted.len(),
        }
    }

    /// Record counts per category, in catalog order.
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.catalog
            .categories()
            .iter()
            .map(|c| (c.name.as_str(), c.records.len()))
            .collect()
    }

    fn record_at(&self, (category, record): RecordRef) -> &Record {
        &self.catalog.categories()[category].records[record]
    }

    fn base_refs(&self) -> Vec<RecordRef> {
        let categories = self.catalog.categories();
        let converted = &self.converted;
        match &self.selected {
            None => Vec::new(),
            Some(Selection::Converted) => categories
                .iter()
                .enumerate()
                .flat_map(move |(ci, c)| {
                    c.records
                        .iter()
                        .enumerate()
                        .filter(move |(_, r)| converted.contains(&r.id))
                        .map(move |(ri, _)| (ci, ri))
                })
                .collect(),
            Some(Selection::Category(name)) => categories
                .iter()
                .position(|c| &c.name == name)
                .map(|ci| {
                    (0..categories[ci].records.len())
                        .map(|ri| (ci, ri))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.converted) {
            tracing::warn!(error = %e, "converted set was not persisted");
        }
    }
}
