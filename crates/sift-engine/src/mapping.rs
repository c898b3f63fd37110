use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// External, client-facing type whose property names appear in requests.
pub trait Resource: 'static {
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn properties() -> &'static [&'static str];
}

/// Identifies the mapping from an internal entity type to a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeMapKey {
    entity: TypeId,
    resource: TypeId,
}

impl TypeMapKey {
    pub fn of<E: 'static, R: 'static>() -> Self {
        Self {
            entity: TypeId::of::<E>(),
            resource: TypeId::of::<R>(),
        }
    }
}

/// How one resource property is produced from the entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberMapping {
    /// Projection text, e.g. `o => o.customer.name`. `None` maps by name.
    pub expression: Option<String>,
    /// Filter and sort on this other resource property instead.
    pub redirect: Option<String>,
}

/// Read-only source of field mappings.
pub trait MappingRegistry: Send + Sync {
    /// Mapping entry for the resource member `member`, matched exactly.
    fn lookup(&self, key: &TypeMapKey, member: &str) -> Option<&MemberMapping>;
}

impl<M: MappingRegistry + ?Sized> MappingRegistry for &M {
    fn lookup(&self, key: &TypeMapKey, member: &str) -> Option<&MemberMapping> {
        (**self).lookup(key, member)
    }
}

impl<M: MappingRegistry + ?Sized> MappingRegistry for Arc<M> {
    fn lookup(&self, key: &TypeMapKey, member: &str) -> Option<&MemberMapping> {
        (**self).lookup(key, member)
    }
}

/// Member mappings for one entity/resource pair.
#[derive(Debug, Clone)]
pub struct TypeMap {
    key: TypeMapKey,
    members: HashMap<String, MemberMapping>,
}

impl TypeMap {
    pub fn new<E: 'static, R: 'static>() -> Self {
        Self {
            key: TypeMapKey::of::<E, R>(),
            members: HashMap::new(),
        }
    }

    /// Map `member` through a projection expression.
    pub fn member(mut self, member: &str, expression: impl Into<String>) -> Self {
        self.members.entry(member.to_string()).or_default().expression = Some(expression.into());
        self
    }

    /// Map `member` to the entity member of the same name.
    pub fn convention(mut self, member: &str) -> Self {
        self.members.entry(member.to_string()).or_default();
        self
    }

    /// Filter and sort `member` through `target` instead.
    pub fn redirect(mut self, member: &str, target: impl Into<String>) -> Self {
        self.members.entry(member.to_string()).or_default().redirect = Some(target.into());
        self
    }

    pub fn get(&self, member: &str) -> Option<&MemberMapping> {
        self.members.get(member)
    }
}

/// Hand-written [`MappingRegistry`].
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    maps: HashMap<TypeMapKey, TypeMap>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, map: TypeMap) -> Self {
        self.insert(map);
        self
    }

    /// Add a type map, replacing any previous one for the same pair.
    pub fn insert(&mut self, map: TypeMap) -> Option<TypeMap> {
        self.maps.insert(map.key, map)
    }
}

impl MappingRegistry for MappingTable {
    fn lookup(&self, key: &TypeMapKey, member: &str) -> Option<&MemberMapping> {
        self.maps.get(key)?.get(member)
    }
}
