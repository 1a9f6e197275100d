use crate::EntityId;
use serde::{Serialize, Serializer};
use strum::{Display, EnumString};

/// Position of a foreign key inside [EntityModel::relations](crate::EntityModel::relations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelationId(pub(crate) usize);

/// One foreign key constraint, possibly spanning several columns.
/// `owner_columns[i]` references `related_columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationInternal {
    pub(crate) name: String,
    pub(crate) owner_table: EntityId,
    pub(crate) related_table: EntityId,
    pub(crate) owner_columns: Vec<String>,
    pub(crate) related_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) on_delete: Option<ForeignKeyAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) on_update: Option<ForeignKeyAction>,
}

/// Which end of a foreign key an entity is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationSide {
    /// The entity holds the foreign key columns
    Owner,
    /// The entity is referenced by the foreign key
    Related,
}

/// An entity's view of a relation: which relation, which side it is on, and
/// the entity at the other end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    pub(crate) id: RelationId,
    pub(crate) side: RelationSide,
    pub(crate) target: EntityId,
}

/// Referential action of a foreign key, as reported by
/// `information_schema.referential_constraints`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ForeignKeyAction {
    #[strum(serialize = "CASCADE")]
    Cascade,
    #[strum(serialize = "SET NULL")]
    SetNull,
    #[strum(serialize = "SET DEFAULT")]
    SetDefault,
    #[strum(serialize = "RESTRICT")]
    Restrict,
    #[strum(serialize = "NO ACTION")]
    NoAction,
}

impl RelationInternal {
    /// Constraint name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_table(&self) -> EntityId {
        self.owner_table
    }

    pub fn related_table(&self) -> EntityId {
        self.related_table
    }

    pub fn owner_columns(&self) -> &[String] {
        &self.owner_columns
    }

    pub fn related_columns(&self) -> &[String] {
        &self.related_columns
    }

    /// Pairs of (owner column, referenced column)
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.owner_columns
            .iter()
            .map(String::as_str)
            .zip(self.related_columns.iter().map(String::as_str))
    }

    pub fn on_delete(&self) -> Option<ForeignKeyAction> {
        self.on_delete
    }

    pub fn on_update(&self) -> Option<ForeignKeyAction> {
        self.on_update
    }

    pub fn is_self_referencing(&self) -> bool {
        self.owner_table == self.related_table
    }
}

impl Relation {
    pub fn id(&self) -> RelationId {
        self.id
    }

    pub fn side(&self) -> RelationSide {
        self.side
    }

    /// The entity at the other end of the relation
    pub fn target(&self) -> EntityId {
        self.target
    }
}

impl Serialize for ForeignKeyAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
