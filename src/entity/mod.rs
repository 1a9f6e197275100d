mod base_entity;
mod column;
mod field_type;
mod index;
mod model;
mod relation;

pub use base_entity::*;
pub use column::*;
pub use field_type::*;
pub use index::*;
pub use model::*;
pub use relation::*;
