//! Domain models for gift tracking.
//!
//! This module contains the people and gift records, the rules for accepting
//! them, the values derived from them, and the store that owns them.

mod clock;
pub use clock::{Clock, FixedClock, SystemClock};

mod config;
pub use config::Config;

/// Gift records and their editable fields.
pub mod gift;
pub use gift::{Gift, GiftDraft, Priority};

mod id;
pub use id::Id;

/// Person records and their editable fields.
pub mod person;
pub use person::{Person, PersonDraft};

/// Filtering and sorting of gifts and people for display.
pub mod query;
pub use query::{GiftQuery, SortOrder, StatusFilter, TagFilter};

/// The record store and its mutation operations.
pub mod store;
pub use store::{ConfirmationToken, DeleteTarget, Store};

/// Totals and budget status.
pub mod summary;
pub use summary::{BudgetStatus, CurrencyFormatter, Summary, UsdFormatter};

pub mod validation;
pub use validation::{Field, ValidationError, is_valid_url};
