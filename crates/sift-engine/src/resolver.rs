use tracing::trace;

use crate::config::ComposerConfig;
use crate::error::{ClauseError, ClauseKind};
use crate::expression;
use crate::mapping::{MappingRegistry, MemberMapping, Resource, TypeMapKey};
use crate::path::PropertyPath;

/// Turns external field names into internal property paths.
pub struct FieldResolver<'a, M: ?Sized> {
    mappings: &'a M,
    config: &'a ComposerConfig,
}

impl<'a, M: MappingRegistry + ?Sized> FieldResolver<'a, M> {
    pub fn new(mappings: &'a M, config: &'a ComposerConfig) -> Self {
        Self { mappings, config }
    }

    /// Resolve `field`, a property of resource `R`, to a path on entity `E`.
    ///
    /// The name is matched against `R::properties()` (ignoring case unless
    /// configured otherwise), then looked up in the `E -> R` type map. A
    /// redirect restarts resolution with the target name; a revisited name or
    /// a chain longer than `max_redirect_depth` fails the whole chain.
    pub fn resolve<E: 'static, R: Resource>(
        &self,
        field: &str,
        clause: ClauseKind,
    ) -> Result<PropertyPath, ClauseError> {
        let key = TypeMapKey::of::<E, R>();
        let mut chain: Vec<&str> = Vec::new();
        let mut current = field;

        loop {
            let Some(property) = self.find_property(R::properties(), current) else {
                return Err(failure(clause, field, &chain, current));
            };
            if chain.contains(&property) {
                return Err(failure(clause, field, &chain, property));
            }
            chain.push(property);

            let Some(mapping) = self.mappings.lookup(&key, property) else {
                chain.pop();
                return Err(failure(clause, field, &chain, property));
            };

            match mapping.redirect.as_deref() {
                Some(target) => {
                    if chain.len() > self.config.max_redirect_depth {
                        return Err(failure(clause, field, &chain, target));
                    }
                    trace!(%clause, field, from = property, to = target, "following redirect");
                    current = target;
                }
                None => return member_path(mapping, property, clause, field),
            }
        }
    }

    fn find_property(&self, properties: &[&'static str], name: &str) -> Option<&'static str> {
        let found = if self.config.case_insensitive_fields {
            properties.iter().find(|p| eq_ignore_case(p, name))
        } else {
            properties.iter().find(|p| **p == name)
        };
        found.copied()
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// No redirect followed yet means the field itself is unknown; otherwise the
/// chain broke somewhere after it.
fn failure(clause: ClauseKind, field: &str, chain: &[&str], failed_at: &str) -> ClauseError {
    if chain.is_empty() {
        return ClauseError::UnresolvableField {
            clause,
            field: field.to_string(),
        };
    }
    let mut names: Vec<String> = chain.iter().map(|s| s.to_string()).collect();
    names.push(failed_at.to_string());
    ClauseError::ResolutionChain {
        clause,
        field: field.to_string(),
        chain: names,
    }
}

fn member_path(
    mapping: &MemberMapping,
    property: &str,
    clause: ClauseKind,
    field: &str,
) -> Result<PropertyPath, ClauseError> {
    let path = match mapping.expression.as_deref() {
        Some(text) => expression::member_path(text),
        None => PropertyPath::parse(property),
    };
    path.map_err(|source| ClauseError::InvalidMapping {
        clause,
        field: field.to_string(),
        source,
    })
}
