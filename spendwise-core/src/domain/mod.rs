//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod category;
mod mood;
pub mod result;
pub mod settings;
mod transaction;

pub use category::Category;
pub use mood::Mood;
pub use settings::{BudgetLimits, Goal, GoalStatus, NotificationPreferences, Reflection};
pub use transaction::{
    truncate_description, Transaction, TransactionType, MAX_AMOUNT, MAX_DESCRIPTION_LEN,
};
