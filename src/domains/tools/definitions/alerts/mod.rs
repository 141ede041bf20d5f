//! Alerting tools: active alerts, rules and alert history.

pub mod history;
pub mod list;
pub mod recording_rules;
pub mod rules;

pub use history::{AlertHistoryParams, AlertHistoryTool};
pub use list::{AlertStateFilter, ListAlertsParams, ListAlertsTool};
pub use recording_rules::{ListRecordingRulesParams, ListRecordingRulesTool};
pub use rules::{ListAlertRulesParams, ListAlertRulesTool, RuleStateFilter};

use crate::domains::tools::ToolEntry;

/// Catalog entries for this group.
pub fn entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry::of::<ListAlertsTool>(),
        ToolEntry::of::<ListAlertRulesTool>(),
        ToolEntry::of::<ListRecordingRulesTool>(),
        ToolEntry::of::<AlertHistoryTool>(),
    ]
}
