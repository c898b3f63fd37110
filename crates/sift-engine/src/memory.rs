//! In-memory queryable: records a plan of operations and runs it over a slice.

use std::fmt::{self, Write};
use std::sync::Arc;

use crate::ordering::{SortKey, compare_by};
use crate::predicate::Predicate;
use crate::queryable::Queryable;

/// One step of a query plan. Each node reads the rows produced by `source`.
pub enum Node<T> {
    /// Every element of the source, in source order.
    Scan,

    /// Keep rows matching the predicate.
    Filter {
        predicate: Predicate<T>,
        source: Box<Node<T>>,
    },

    /// Stable sort by keys, first key primary.
    Sort {
        keys: Vec<SortKey<T>>,
        source: Box<Node<T>>,
    },

    /// Skip + take.
    Limit {
        skip: usize,
        take: Option<usize>,
        source: Box<Node<T>>,
    },
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Node::Scan => Node::Scan,
            Node::Filter { predicate, source } => Node::Filter {
                predicate: predicate.clone(),
                source: source.clone(),
            },
            Node::Sort { keys, source } => Node::Sort {
                keys: keys.clone(),
                source: source.clone(),
            },
            Node::Limit { skip, take, source } => Node::Limit {
                skip: *skip,
                take: *take,
                source: source.clone(),
            },
        }
    }
}

/// A query over a shared in-memory collection.
///
/// Building the query never touches the rows; [`MemoryQuery::execute`] does.
pub struct MemoryQuery<T> {
    rows: Arc<[T]>,
    plan: Node<T>,
}

impl<T> MemoryQuery<T> {
    pub fn new(rows: impl Into<Arc<[T]>>) -> Self {
        Self {
            rows: rows.into(),
            plan: Node::Scan,
        }
    }

    pub fn plan(&self) -> &Node<T> {
        &self.plan
    }

    /// Run the plan and return the surviving rows in result order.
    pub fn execute(&self) -> Vec<&T> {
        run(&self.plan, &self.rows)
    }

    /// Render the plan, outermost node first.
    pub fn explain(&self) -> String {
        let mut out = String::new();
        explain_node(&self.plan, self.rows.len(), 0, &mut out);
        out
    }

    fn wrap(self, build: impl FnOnce(Node<T>) -> Node<T>) -> Self {
        Self {
            rows: self.rows,
            plan: build(self.plan),
        }
    }
}

impl<T> Clone for MemoryQuery<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            plan: self.plan.clone(),
        }
    }
}

impl<T> fmt::Debug for MemoryQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQuery")
            .field("rows", &self.rows.len())
            .field("plan", &self.explain())
            .finish()
    }
}

impl<T> Queryable<T> for MemoryQuery<T> {
    fn filter(self, predicate: Predicate<T>) -> Self {
        self.wrap(|plan| Node::Filter {
            predicate,
            source: Box::new(plan),
        })
    }

    fn order_by(self, key: SortKey<T>) -> Self {
        self.wrap(|plan| Node::Sort {
            keys: vec![key],
            source: Box::new(plan),
        })
    }

    fn then_by(self, key: SortKey<T>) -> Self {
        self.wrap(|plan| match plan {
            Node::Sort { mut keys, source } => {
                keys.push(key);
                Node::Sort { keys, source }
            }
            other => Node::Sort {
                keys: vec![key],
                source: Box::new(other),
            },
        })
    }

    fn skip(self, count: usize) -> Self {
        self.wrap(|plan| match plan {
            Node::Limit {
                skip,
                take: None,
                source,
            } => Node::Limit {
                skip: skip.saturating_add(count),
                take: None,
                source,
            },
            other => Node::Limit {
                skip: count,
                take: None,
                source: Box::new(other),
            },
        })
    }

    fn take(self, count: usize) -> Self {
        self.wrap(|plan| match plan {
            Node::Limit { skip, take, source } => Node::Limit {
                skip,
                take: Some(take.map_or(count, |t| t.min(count))),
                source,
            },
            other => Node::Limit {
                skip: 0,
                take: Some(count),
                source: Box::new(other),
            },
        })
    }
}

fn run<'a, T>(node: &Node<T>, rows: &'a [T]) -> Vec<&'a T> {
    match node {
        Node::Scan => rows.iter().collect(),
        Node::Filter { predicate, source } => {
            let mut out = run(source, rows);
            out.retain(|row| predicate.matches(row));
            out
        }
        Node::Sort { keys, source } => {
            let mut out = run(source, rows);
            out.sort_by(|a, b| compare_by(keys, a, b));
            out
        }
        Node::Limit { skip, take, source } => run(source, rows)
            .into_iter()
            .skip(*skip)
            .take(take.unwrap_or(usize::MAX))
            .collect(),
    }
}

fn explain_node<T>(node: &Node<T>, rows: usize, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let source = match node {
        Node::Scan => {
            let _ = writeln!(out, "{indent}Scan rows={rows}");
            return;
        }
        Node::Filter { predicate, source } => {
            let _ = writeln!(out, "{indent}Filter {predicate}");
            source
        }
        Node::Sort { keys, source } => {
            let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "{indent}Sort {}", keys.join(", "));
            source
        }
        Node::Limit { skip, take, source } => {
            match take {
                Some(take) => {
                    let _ = writeln!(out, "{indent}Limit skip={skip} take={take}");
                }
                None => {
                    let _ = writeln!(out, "{indent}Limit skip={skip}");
                }
            }
            source
        }
    };
    explain_node(source, rows, depth + 1, out);
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use sift_query::{FilterOperator, Operator, SortDirection};

    use super::*;
    use crate::ordering::compile_sort_key;
    use crate::path::PropertyPath;
    use crate::predicate::compile_predicate;
    use crate::schema::{Entity, Schema};

    #[derive(Debug, PartialEq)]
    struct Score {
        player: &'static str,
        points: i64,
    }

    impl Entity for Score {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Score>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                Schema::<Score>::new("Score")
                    .string("player", |s| s.player)
                    .int("points", |s| s.points)
            })
        }
    }

    fn scores() -> MemoryQuery<Score> {
        MemoryQuery::new(vec![
            Score { player: "cy", points: 7 },
            Score { player: "al", points: 9 },
            Score { player: "bo", points: 7 },
            Score { player: "al", points: 3 },
        ])
    }

    fn key(field: &str, dir: SortDirection) -> SortKey<Score> {
        compile_sort_key(&PropertyPath::parse(field).unwrap(), dir).unwrap()
    }

    fn filter(field: &str, op: Operator, value: i64) -> Predicate<Score> {
        compile_predicate(
            &PropertyPath::parse(field).unwrap(),
            &FilterOperator::from(op),
            &value.into(),
        )
        .unwrap()
    }

    fn players(query: &MemoryQuery<Score>) -> Vec<(&'static str, i64)> {
        query.execute().iter().map(|s| (s.player, s.points)).collect()
    }

    #[test]
    fn scan_keeps_source_order() {
        assert_eq!(
            players(&scores()),
            [("cy", 7), ("al", 9), ("bo", 7), ("al", 3)]
        );
    }

    #[test]
    fn filters_combine() {
        let query = scores()
            .filter(filter("points", Operator::Gte, 5))
            .filter(filter("points", Operator::Lt, 9));
        assert_eq!(players(&query), [("cy", 7), ("bo", 7)]);
    }

    #[test]
    fn then_by_extends_current_sort() {
        let query = scores()
            .order_by(key("points", SortDirection::Desc))
            .then_by(key("player", SortDirection::Asc));
        match query.plan() {
            Node::Sort { keys, source } => {
                assert_eq!(keys.len(), 2);
                assert!(matches!(**source, Node::Scan));
            }
            _ => panic!("expected sort node"),
        }
        assert_eq!(
            players(&query),
            [("al", 9), ("bo", 7), ("cy", 7), ("al", 3)]
        );
    }

    #[test]
    fn sort_is_stable() {
        let query = scores().order_by(key("points", SortDirection::Asc));
        assert_eq!(
            players(&query),
            [("al", 3), ("cy", 7), ("bo", 7), ("al", 9)]
        );
    }

    #[test]
    fn then_by_without_order_starts_one() {
        let query = scores().then_by(key("player", SortDirection::Asc));
        assert_eq!(players(&query)[0].0, "al");
    }

    #[test]
    fn skip_and_take_merge_into_one_limit() {
        let query = scores().skip(1).take(2);
        match query.plan() {
            Node::Limit { skip, take, .. } => {
                assert_eq!((*skip, *take), (1, Some(2)));
            }
            _ => panic!("expected limit node"),
        }
        assert_eq!(players(&query), [("al", 9), ("bo", 7)]);
    }

    #[test]
    fn skip_after_take_applies_to_taken_rows() {
        let query = scores().take(2).skip(1);
        assert_eq!(players(&query), [("al", 9)]);
    }

    #[test]
    fn take_zero_is_empty() {
        assert!(scores().take(0).execute().is_empty());
    }

    #[test]
    fn skip_past_end_is_empty() {
        assert!(scores().skip(10).execute().is_empty());
    }

    #[test]
    fn building_does_not_consume_source() {
        let base = scores();
        let narrowed = base.clone().filter(filter("points", Operator::Eq, 7));
        assert_eq!(base.execute().len(), 4);
        assert_eq!(narrowed.execute().len(), 2);
    }

    #[test]
    fn explain_renders_plan() {
        let query = scores()
            .filter(filter("points", Operator::Gt, 4))
            .order_by(key("points", SortDirection::Desc))
            .then_by(key("player", SortDirection::Asc))
            .skip(1)
            .take(2);
        assert_eq!(
            query.explain(),
            "Limit skip=1 take=2\n  Sort points desc, player asc\n    Filter points gt 4\n      Scan rows=4\n"
        );
    }
}
