mod compare;
mod composer;
mod config;
mod convert;
mod error;
pub mod expression;
mod mapping;
pub mod memory;
mod ordering;
mod path;
mod predicate;
mod queryable;
mod resolver;
mod schema;

pub use bson::{Bson, DateTime};
pub use composer::{Composition, QueryComposer};
pub use config::ComposerConfig;
pub use error::{ClauseError, ClauseKind, CompileError, ConversionError, PathError, QueryError};
pub use mapping::{MappingRegistry, MappingTable, MemberMapping, Resource, TypeMap, TypeMapKey};
pub use memory::MemoryQuery;
pub use ordering::{SortKey, compile_sort_key};
pub use path::PropertyPath;
pub use predicate::{Predicate, compile_predicate};
pub use queryable::Queryable;
pub use resolver::FieldResolver;
pub use schema::{Accessor, Entity, FieldType, Member, Schema};
