//! PromQL query tools: raw instant/range queries and canned exporter helpers.

pub mod exporter_queries;
pub mod instant;
pub mod node_exporter;
pub mod probes;
pub mod range;
pub mod windows_exporter;

pub use exporter_queries::{NodeCategory, SubQuery, WindowsCategory};
pub use instant::{QueryInstantParams, QueryInstantTool};
pub use node_exporter::{NodeExporterParams, NodeExporterTool};
pub use probes::{ProbeParams, ProbesTool};
pub use range::{QueryRangeParams, QueryRangeTool};
pub use windows_exporter::{WindowsExporterParams, WindowsExporterTool};

use crate::domains::tools::ToolEntry;

/// Catalog entries for this group.
pub fn entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry::of::<QueryInstantTool>(),
        ToolEntry::of::<QueryRangeTool>(),
        ToolEntry::of::<WindowsExporterTool>(),
        ToolEntry::of::<NodeExporterTool>(),
        ToolEntry::of::<ProbesTool>(),
    ]
}
