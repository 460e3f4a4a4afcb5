use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display metadata for a spending category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: None,
        }
    }
}

/// Looks up categories by id. Only narrative text depends on it.
pub trait CategoryDirectory {
    fn find_by_id(&self, id: Uuid) -> Option<&Category>;
}

impl CategoryDirectory for [Category] {
    fn find_by_id(&self, id: Uuid) -> Option<&Category> {
        self.iter().find(|category| category.id == id)
    }
}

impl CategoryDirectory for Vec<Category> {
    fn find_by_id(&self, id: Uuid) -> Option<&Category> {
        self.as_slice().find_by_id(id)
    }
}

/// Directory with no entries; narrative falls back to generic labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCategories;

impl CategoryDirectory for NoCategories {
    fn find_by_id(&self, _id: Uuid) -> Option<&Category> {
        None
    }
}
