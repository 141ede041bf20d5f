//! Tool definitions.
//!
//! One file per tool, grouped by what the tools look at. Each group exposes an
//! `entries()` list; [`all_tools`] concatenates them into the catalog.

pub mod alerts;
pub mod common;
pub mod metrics;
pub mod query;
pub mod status;
pub mod targets;

#[cfg(test)]
pub mod test_support;

use super::ToolEntry;

/// Every tool in the catalog, in listing order.
pub fn all_tools() -> Vec<ToolEntry> {
    let mut entries = targets::entries();
    entries.extend(query::entries());
    entries.extend(metrics::entries());
    entries.extend(alerts::entries());
    entries.extend(status::entries());
    entries
}
