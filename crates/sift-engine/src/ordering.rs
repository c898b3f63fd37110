use std::cmp::Ordering;
use std::fmt;

use sift_query::SortDirection;

use crate::compare::compare_keys;
use crate::error::{CompileError, ConversionError};
use crate::path::PropertyPath;
use crate::schema::{Entity, Member};

/// A compiled sort key: a member to read and a direction.
pub struct SortKey<T> {
    member: Member<T>,
    direction: SortDirection,
}

impl<T> SortKey<T> {
    pub fn path(&self) -> &PropertyPath {
        self.member.path()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Absent values come first in ascending order and last in descending.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ord = compare_keys(self.member.get(a).as_ref(), self.member.get(b).as_ref());
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self {
            member: self.member.clone(),
            direction: self.direction,
        }
    }
}

impl<T> fmt::Display for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.member.path(), self.direction)
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("path", self.member.path())
            .field("direction", &self.direction)
            .finish()
    }
}

pub fn compile_sort_key<T: Entity>(
    path: &PropertyPath,
    direction: SortDirection,
) -> Result<SortKey<T>, CompileError> {
    let member = T::schema().resolve(path)?;
    if !member.ty().is_sortable() {
        return Err(ConversionError::NotSortable(member.ty().clone()).into());
    }
    Ok(SortKey { member, direction })
}

/// Lexicographic comparison over `keys`: the first key that differs decides.
pub(crate) fn compare_by<T>(keys: &[SortKey<T>], a: &T, b: &T) -> Ordering {
    for key in keys {
        let ord = key.compare(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
