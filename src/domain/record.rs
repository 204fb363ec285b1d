//! Ready-made hierarchy record with a free-form label.

use std::fmt;
use std::hash::Hash;

use serde::Deserialize;

use crate::domain::item::{FlatRecord, HierarchyItem, HierarchyLinks};

/// Flat record as stored in a table or file: own id, optional parent id, label.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "Id: Deserialize<'de>"))]
pub struct Record<Id> {
    pub id: Id,
    pub parent_id: Option<Id>,
    pub label: Option<String>,
    #[serde(skip)]
    links: HierarchyLinks<Record<Id>>,
}

impl<Id> Record<Id> {
    pub fn root(id: Id) -> Self {
        Self::new(id, None)
    }

    pub fn child(id: Id, parent_id: Id) -> Self {
        Self::new(id, Some(parent_id))
    }

    pub fn new(id: Id, parent_id: Option<Id>) -> Self {
        Self {
            id,
            parent_id,
            label: None,
            links: HierarchyLinks::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Clones are detached: identity and label are copied, hierarchy links are not.
impl<Id: Clone> Clone for Record<Id> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            label: self.label.clone(),
            links: HierarchyLinks::default(),
        }
    }
}

impl<Id> FlatRecord for Record<Id>
where
    Id: Clone + Eq + Hash + fmt::Debug,
{
    type Id = Id;

    fn id(&self) -> &Id {
        &self.id
    }

    fn parent_id(&self) -> Option<&Id> {
        self.parent_id.as_ref()
    }
}

impl<Id> HierarchyItem for Record<Id>
where
    Id: Clone + Eq + Hash + fmt::Debug,
{
    fn links(&self) -> &HierarchyLinks<Self> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut HierarchyLinks<Self> {
        &mut self.links
    }
}

impl<Id: fmt::Display> fmt::Display for Record<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_record_without_label_when_displayed_then_shows_id() {
        assert_eq!(Record::root("a").to_string(), "a");
        assert_eq!(Record::child(7, 1).with_label("Seven").to_string(), "Seven");
    }

    #[test]
    fn given_toml_rows_when_deserialized_then_parent_id_is_optional() {
        #[derive(Deserialize)]
        struct Rows {
            records: Vec<Record<u32>>,
        }

        let rows: Rows = toml::from_str(
            r#"
            [[records]]
            id = 1
            label = "Root"

            [[records]]
            id = 2
            parent_id = 1
            "#,
        )
        .unwrap();

        assert_eq!(rows.records.len(), 2);
        assert!(rows.records[0].is_root());
        assert_eq!(rows.records[1].parent_id(), Some(&1));
        assert_eq!(rows.records[0].label.as_deref(), Some("Root"));
        assert_eq!(rows.records[1].level(), 1);
    }

    #[test]
    fn given_built_record_when_cloned_then_links_are_reset() {
        let mut record = Record::child("b", "a");
        record.set_level(3);
        record.set_selected(true);

        let copy = record.clone();

        assert_eq!(copy.id, "b");
        assert_eq!(copy.level(), 1);
        assert!(!copy.is_selected());
    }
}
