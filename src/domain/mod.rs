//! Domain model.
//!
//! # Data Flow
//! ```text
//! client JSON
//!     → *Input / *Draft (unvalidated, every field optional)
//!     → validate() → ValidationError on schema violation
//!     → HistoryEntry / Collection (valid by construction)
//!     → store layer
//! ```

pub mod collection;
pub mod history;
pub mod method;
pub mod page;
pub mod validation;

pub use collection::{Collection, CollectionFields, CollectionInput, SavedRequest, SavedRequestInput};
pub use history::{HistoryDraft, HistoryEntry, RecordedResponse};
pub use method::{HttpMethod, SavedRequestMethod};
pub use page::{PageInfo, PageQuery, Pagination};
pub use validation::ValidationError;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision the store keeps (microseconds).
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
