//! In-memory core of a civic dashboard: a municipal policy catalog with
//! voting, commenting and derived ordering, plus a finance period selector
//! over static revenue/expenditure data.
//!
//! All state lives in memory and is seeded from static fixtures; the only
//! external call is the optional policy summarization request.

pub mod config;
pub mod error;
pub mod finance;
pub mod fixtures;
pub mod store;
pub mod summary;
pub mod types;

pub use config::{Granularity, SortOrder, StoreConfig, StoreConfigBuilder};
pub use error::{Error, Result};
pub use finance::{select_default_period, FinanceBook, PeriodSelector};
pub use store::PolicyStore;
pub use summary::{SummaryCell, SummaryOutcome, SummaryState, Summarizer};
pub use types::{
    Comment, FinanceIndicator, FinanceKind, FinanceRecord, PeriodOption, Policy, PolicyDraft,
    PopularityTier, StatusClass, VoteDirection,
};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Granularity, SortOrder, StoreConfig, StoreConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::finance::{FinanceBook, PeriodSelector};
    pub use crate::store::PolicyStore;
    pub use crate::summary::{SummaryCell, SummaryOutcome, Summarizer};
    pub use crate::types::{FinanceKind, Policy, PolicyDraft, VoteDirection};
}
