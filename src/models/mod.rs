pub mod filter;
pub mod movie;
pub mod query;
pub mod sort;

pub use filter::{FilterBounds, FilterField, FilterIntent, Interval};
pub use movie::{MovieDetail, MovieSummary, PageResult, ProductionCountry};
pub use query::{FilterVariables, MoviesVariables, QueryKey, QuerySpec};
pub use sort::{SortDirection, SortField, SortIntent};
