//! zbb-domain
//!
//! Pure domain models for the zero-based budget ledger (money, months,
//! categories, transactions, stored budget rows and computed views).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod account;
pub mod budget;
pub mod category;
pub mod ledger;
pub mod money;
pub mod month;
pub mod transaction;
pub mod user;

pub use account::*;
pub use budget::*;
pub use category::*;
pub use ledger::*;
pub use money::*;
pub use month::*;
pub use transaction::*;
pub use user::*;
