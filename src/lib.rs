#![doc(test(attr(deny(warnings))))]

//! Zero-based budgeting ledger: month views with category rollover,
//! "To Be Budgeted" summaries, assignment suggestions and safe-to-spend,
//! plus the `zbb_cli` front end over a JSON store.

pub mod cli;
pub mod errors;
pub mod utils;

pub use errors::BudgetError;
pub use zbb_config as config;
pub use zbb_core as engine;
pub use zbb_domain as domain;
pub use zbb_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing once; later calls are no-ops. `RUST_LOG`
/// takes precedence over `filter`.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::debug!("zbb budget tracing initialized");
    });
}
