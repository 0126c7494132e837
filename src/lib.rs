//! Gift tracking for the people in your life
//!
//! Keep a list of people, note gift ideas for each of them with prices,
//! priorities, tags and due dates, and see how planned spending compares with
//! each person's budget. Data is kept in a JSON file that can be exported as
//! a dated backup and imported again.

pub mod domain;
pub use domain::{
    BudgetStatus, Config, Gift, GiftDraft, GiftQuery, Id, Person, PersonDraft, Priority,
    SortOrder, StatusFilter, Store, TagFilter, ValidationError,
};

/// Saved data, backups and imports.
pub mod storage;
pub use storage::{AppData, Backend, FileBackend, ImportError};
