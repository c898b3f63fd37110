mod filter;
mod operator;
mod parse;
mod query;
mod sort;
mod value;

pub use filter::FilterClause;
pub use operator::{FilterOperator, Operator};
pub use parse::{ParseError, parse_filters, parse_options, parse_sorts};
pub use query::QueryOptions;
pub use sort::{SortClause, SortDirection};
pub use value::FilterValue;
