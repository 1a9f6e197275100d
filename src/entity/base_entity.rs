use crate::{Column, Index, Relation, RelationId, RelationSide};
use serde::Serialize;

/// One base table and its structural members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub(crate) name: String,
    pub(crate) schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) database: Option<String>,
    pub(crate) columns: Vec<Column>,
    pub(crate) indices: Vec<Index>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) relation_ids: Vec<RelationId>,
}

impl Entity {
    /// An entity with no columns, indices or relations yet
    pub fn new<N, S>(name: N, schema: S, database: Option<String>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            schema: schema.into(),
            database,
            columns: Vec::new(),
            indices: Vec::new(),
            relations: Vec::new(),
            relation_ids: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Columns in catalog ordinal order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Foreign keys held by this entity
    pub fn relation_ids(&self) -> &[RelationId] {
        &self.relation_ids
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name() == name)
    }

    pub fn find_index(&self, name: &str) -> Option<&Index> {
        self.indices.iter().find(|index| index.name() == name)
    }

    pub fn primary_key(&self) -> Option<&Index> {
        self.indices.iter().find(|index| index.is_primary())
    }

    /// Relations in which this entity is on the given side
    pub fn relations_by_side(&self, side: RelationSide) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |rel| rel.side() == side)
    }
}
