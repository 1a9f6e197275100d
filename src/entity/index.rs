use serde::Serialize;
use std::ops::Not;

/// Defines a named index or constraint of an Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Index {
    pub(crate) name: String,
    pub(crate) columns: Vec<String>,
    #[serde(skip_serializing_if = "Not::not")]
    pub(crate) primary: bool,
    pub(crate) options: IndexOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexOptions {
    #[serde(skip_serializing_if = "Not::not")]
    pub unique: bool,
}

impl Index {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in index key order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// A primary key is unique even when the catalog does not flag it separately
    pub fn is_unique(&self) -> bool {
        self.primary || self.options.unique
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_implies_unique() {
        let index = Index {
            name: "users_pkey".to_owned(),
            columns: vec!["id".to_owned()],
            primary: true,
            options: IndexOptions { unique: false },
        };
        assert!(index.is_unique());
        assert!(!index.options().unique);
    }
}
