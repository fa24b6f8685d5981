pub mod browser;
pub mod error;
pub mod filter_draft;
pub mod pagination;
pub mod query_builder;
pub mod sort_policy;
pub mod store;
pub mod viewport;

pub use browser::MovieBrowser;
pub use error::{BrowseError, BrowseResult};
pub use filter_draft::FilterDraftReconciler;
pub use pagination::{BrowseStatus, PageRequest, PageTicket, PaginationEngine, PaginationState};
pub use query_builder::QueryBuilder;
pub use store::{Field, FieldStore, SubscriptionId};
pub use viewport::ViewportFill;
