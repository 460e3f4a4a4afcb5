//! Read-only input records consumed by the forecast engine.

pub mod budget;
pub mod category;
pub mod period;
pub mod transaction;

pub use budget::{Budget, PeriodKind};
pub use category::{Category, CategoryDirectory, NoCategories};
pub use period::Period;
pub use transaction::{Transaction, TransactionType};
