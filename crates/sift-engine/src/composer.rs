use sift_query::{FilterClause, QueryOptions, SortClause};
use tracing::{debug, error, warn};

use crate::config::ComposerConfig;
use crate::error::{ClauseError, ClauseKind, QueryError};
use crate::mapping::{MappingRegistry, Resource};
use crate::ordering::{SortKey, compile_sort_key};
use crate::predicate::{Predicate, compile_predicate};
use crate::queryable::Queryable;
use crate::resolver::FieldResolver;
use crate::schema::Entity;

/// Applies client query options to a queryable.
///
/// Composition is best effort. A clause whose field does not resolve, whose
/// operator is unknown, or whose value does not fit the member is logged and
/// left out; every other clause still applies.
pub struct QueryComposer<M> {
    mappings: M,
    config: ComposerConfig,
}

/// A composed query and the clauses that were left out of it.
#[derive(Debug)]
pub struct Composition<Q> {
    pub query: Q,
    pub skipped: Vec<ClauseError>,
}

impl<M: MappingRegistry> QueryComposer<M> {
    pub fn new(mappings: M) -> Self {
        Self::with_config(mappings, ComposerConfig::default())
    }

    pub fn with_config(mappings: M, config: ComposerConfig) -> Self {
        Self { mappings, config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn mappings(&self) -> &M {
        &self.mappings
    }

    /// Filter, sort and page `query` as `options` describe. `options` names
    /// properties of resource `R`; the query runs over entity `E`.
    pub fn compose<E, R, Q>(&self, query: Q, options: &QueryOptions) -> Result<Q, QueryError>
    where
        E: Entity,
        R: Resource,
        Q: Queryable<E>,
    {
        self.compose_with_report::<E, R, Q>(query, options)
            .map(|composition| composition.query)
    }

    /// Like [`compose`](Self::compose), also returning the skipped clauses.
    pub fn compose_with_report<E, R, Q>(
        &self,
        query: Q,
        options: &QueryOptions,
    ) -> Result<Composition<Q>, QueryError>
    where
        E: Entity,
        R: Resource,
        Q: Queryable<E>,
    {
        let schema = E::schema();
        if schema.is_empty() {
            return Err(QueryError::EmptySchema(schema.name()));
        }
        if R::properties().is_empty() {
            return Err(QueryError::EmptyResource(R::name()));
        }

        let resolver = FieldResolver::new(&self.mappings, &self.config);
        let mut skipped = Vec::new();
        let mut query = query;

        let mut filters = 0;
        for clause in &options.filter {
            match filter_clause::<E, R, M>(&resolver, clause) {
                Ok(predicate) => {
                    query = query.filter(predicate);
                    filters += 1;
                }
                Err(err) => skip_clause(err, &mut skipped),
            }
        }

        let mut sorts = 0;
        for clause in &options.sort {
            match sort_clause::<E, R, M>(&resolver, clause) {
                Ok(key) if sorts == 0 => {
                    query = query.order_by(key);
                    sorts += 1;
                }
                Ok(key) => {
                    query = query.then_by(key);
                    sorts += 1;
                }
                Err(err) => skip_clause(err, &mut skipped),
            }
        }

        let take = self.config.effective_take(options.take);
        let query = query.skip(options.skip).take(take);

        debug!(
            entity = schema.name(),
            resource = R::name(),
            filters,
            sorts,
            skipped = skipped.len(),
            skip = options.skip,
            take,
            "composed query"
        );
        Ok(Composition { query, skipped })
    }
}

fn filter_clause<E: Entity, R: Resource, M: MappingRegistry>(
    resolver: &FieldResolver<'_, M>,
    clause: &FilterClause,
) -> Result<Predicate<E>, ClauseError> {
    let path = resolver.resolve::<E, R>(&clause.field, ClauseKind::Filter)?;
    compile_predicate(&path, &clause.operator, &clause.value)
        .map_err(|err| ClauseError::compile(ClauseKind::Filter, &clause.field, err))
}

fn sort_clause<E: Entity, R: Resource, M: MappingRegistry>(
    resolver: &FieldResolver<'_, M>,
    clause: &SortClause,
) -> Result<SortKey<E>, ClauseError> {
    let path = resolver.resolve::<E, R>(&clause.field, ClauseKind::Sort)?;
    compile_sort_key(&path, clause.dir)
        .map_err(|err| ClauseError::compile(ClauseKind::Sort, &clause.field, err))
}

fn skip_clause(err: ClauseError, skipped: &mut Vec<ClauseError>) {
    let (event, clause, field) = (err.event(), err.clause(), err.field());
    match err {
        ClauseError::InvalidPath { .. } | ClauseError::TypeConversion { .. } => {
            error!(event, %clause, field, error = %err, "clause dropped");
        }
        _ => warn!(event, %clause, field, error = %err, "clause dropped"),
    }
    skipped.push(err);
}
