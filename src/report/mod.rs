//! Read-only rollups over the usage log. Every query reads usage joined with the category each
//! application has at query time, so a recategorization shows up in all of them on the next call.
//!
//! Each rollup is a pure function over [CategorizedUsage](crate::daemon::storage::entities::CategorizedUsage)
//! plus an async wrapper that fetches the rows it needs from a [UsageStore](crate::daemon::storage::usage_store::UsageStore).

pub mod daily;
pub mod monthly;
pub mod suggestions;
pub mod weekly;
