use crate::ordering::SortKey;
use crate::predicate::Predicate;

/// A composable, not yet executed query over elements of `T`.
///
/// Every operation consumes the query and returns the extended one.
pub trait Queryable<T>: Sized {
    /// Keep only elements matching `predicate`. Repeated filters combine with AND.
    fn filter(self, predicate: Predicate<T>) -> Self;

    /// Order by `key`, making it the primary key.
    fn order_by(self, key: SortKey<T>) -> Self;

    /// Add `key` as a tie breaker for the current ordering.
    fn then_by(self, key: SortKey<T>) -> Self;

    fn skip(self, count: usize) -> Self;

    fn take(self, count: usize) -> Self;
}
