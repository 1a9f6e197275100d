use crate::{Entity, Relation, RelationId, RelationInternal, RelationSide};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Position of an entity inside an [EntityModel]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub(crate) usize);

/// The entity graph produced by one discovery run.
///
/// Entities and foreign keys live in two arenas; relations refer to entities
/// by [EntityId] and entities refer to relations by [RelationId], so the
/// owner/related back-references never form ownership cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityModel {
    entities: Vec<Entity>,
    relations: Vec<RelationInternal>,
    #[serde(skip)]
    names: HashMap<String, EntityId>,
    #[serde(skip)]
    qualified_names: HashMap<(String, String), EntityId>,
}

impl EntityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the arena. A name seen before keeps resolving to
    /// the entity registered first.
    pub fn push_entity(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        if let Some(existing) = self.names.get(entity.name()) {
            let first = &self.entities[existing.0];
            warn!(
                table = entity.name(),
                schema = entity.schema(),
                first_schema = first.schema(),
                "Table name already discovered in another schema; \
                 lookups by name resolve to the first one"
            );
        } else {
            self.names.insert(entity.name().to_owned(), id);
        }
        self.qualified_names
            .entry((entity.schema().to_owned(), entity.name().to_owned()))
            .or_insert(id);
        self.entities.push(entity);
        id
    }

    /// Register a foreign key and attach it to both participating entities
    pub(crate) fn push_relation(&mut self, relation: RelationInternal) -> RelationId {
        let id = RelationId(self.relations.len());
        let owner = relation.owner_table;
        let related = relation.related_table;

        let owner_entity = &mut self.entities[owner.0];
        owner_entity.relation_ids.push(id);
        owner_entity.relations.push(Relation {
            id,
            side: RelationSide::Owner,
            target: related,
        });
        self.entities[related.0].relations.push(Relation {
            id,
            side: RelationSide::Related,
            target: owner,
        });

        self.relations.push(relation);
        id
    }

    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Look up a table by schema and name
    pub fn find_qualified(&self, schema: &str, name: &str) -> Option<EntityId> {
        self.qualified_names
            .get(&(schema.to_owned(), name.to_owned()))
            .copied()
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this model
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this model
    pub fn relation(&self, id: RelationId) -> &RelationInternal {
        &self.relations[id.0]
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relations(&self) -> &[RelationInternal] {
        &self.relations
    }

    /// Entities reachable from `id` through one foreign key, in either direction
    pub fn related_entities(&self, id: EntityId) -> impl Iterator<Item = (&Relation, &Entity)> {
        self.entity(id)
            .relations()
            .iter()
            .map(|rel| (rel, self.entity(rel.target())))
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn relation(owner: EntityId, related: EntityId) -> RelationInternal {
        RelationInternal {
            name: "fk".to_owned(),
            owner_table: owner,
            related_table: related,
            owner_columns: vec!["parent_id".to_owned()],
            related_columns: vec!["id".to_owned()],
            on_delete: None,
            on_update: None,
        }
    }

    #[test]
    fn first_entity_wins_name_lookup() {
        let mut model = EntityModel::new();
        let first = model.push_entity(Entity::new("users", "public", None));
        let second = model.push_entity(Entity::new("users", "audit", None));
        assert_ne!(first, second);
        assert_eq!(model.find_entity("users"), Some(first));
        assert_eq!(model.find_qualified("audit", "users"), Some(second));
        assert_eq!(model.len(), 2);
        assert_eq!(model.find_entity("posts"), None);
    }

    #[test]
    fn relation_is_reachable_from_both_ends() {
        let mut model = EntityModel::new();
        let post = model.push_entity(Entity::new("post", "public", None));
        let user = model.push_entity(Entity::new("user", "public", None));
        let id = model.push_relation(relation(post, user));

        assert_eq!(model.entity(post).relation_ids(), &[id]);
        assert_eq!(
            model.entity(post).relations(),
            &[Relation { id, side: RelationSide::Owner, target: user }]
        );
        assert!(model.entity(user).relation_ids().is_empty());
        assert_eq!(
            model.entity(user).relations(),
            &[Relation { id, side: RelationSide::Related, target: post }]
        );

        let names: Vec<_> = model
            .related_entities(user)
            .map(|(_, entity)| entity.name())
            .collect();
        assert_eq!(names, vec!["post"]);
    }

    #[test]
    fn self_reference_yields_both_sides() {
        let mut model = EntityModel::new();
        let node = model.push_entity(Entity::new("node", "public", None));
        model.push_relation(relation(node, node));

        let entity = model.entity(node);
        assert_eq!(entity.relations().len(), 2);
        assert_eq!(entity.relations_by_side(RelationSide::Owner).count(), 1);
        assert_eq!(entity.relations_by_side(RelationSide::Related).count(), 1);
        assert!(model.relations()[0].is_self_referencing());
    }
}
