//! zbb-core
//!
//! Zero-based budget engine: rollover, month views, initialization,
//! assignment, "To Be Budgeted" summaries, suggestions and safe-to-spend.
//! Depends on zbb-domain. No CLI, no terminal I/O; persistence is reached
//! only through [`LedgerRepository`].

pub mod error;
pub mod ledger_service;
pub mod memory_repository;
pub mod month_service;
pub mod public_api;
pub mod repository;
pub mod rollover;
pub mod safe_to_spend_service;
pub mod suggestion_service;
pub mod summary_service;
pub mod time;


pub use error::{CoreError, CoreResult, RepositoryError};
pub use ledger_service::*;
pub use memory_repository::InMemoryLedgerRepository;
pub use month_service::*;
pub use repository::LedgerRepository;
pub use rollover::*;
pub use safe_to_spend_service::*;
pub use suggestion_service::*;
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
