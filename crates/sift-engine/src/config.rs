use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Longest redirect chain followed before the field is treated as unresolvable.
    pub max_redirect_depth: usize,
    /// Match external field names ignoring case.
    pub case_insensitive_fields: bool,
    /// Upper bound applied to `take`. `None` applies the requested value as is.
    pub max_take: Option<usize>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_redirect_depth: 8,
            case_insensitive_fields: true,
            max_take: None,
        }
    }
}

impl ComposerConfig {
    pub(crate) fn effective_take(&self, take: usize) -> usize {
        match self.max_take {
            Some(max) => take.min(max),
            None => take,
        }
    }
}
