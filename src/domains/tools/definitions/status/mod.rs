//! Server status tools.

pub mod server_info;
pub mod tsdb;

pub use server_info::{InfoSection, ServerInfoParams, ServerInfoTool};
pub use tsdb::{TsdbStatusParams, TsdbStatusTool};

use crate::domains::tools::ToolEntry;

/// Catalog entries for this group.
pub fn entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry::of::<ServerInfoTool>(),
        ToolEntry::of::<TsdbStatusTool>(),
    ]
}
