//! Connectivity and scrape target tools.

pub mod get_target;
pub mod list_targets;
pub mod test_connection;

pub use get_target::{GetTargetParams, GetTargetTool};
pub use list_targets::{HealthFilter, ListTargetsParams, ListTargetsTool};
pub use test_connection::TestConnectionTool;

use crate::domains::tools::ToolEntry;

/// Catalog entries for this group.
pub fn entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry::of::<TestConnectionTool>(),
        ToolEntry::of::<ListTargetsTool>(),
        ToolEntry::of::<GetTargetTool>(),
    ]
}
