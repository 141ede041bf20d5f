//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! STDIO/TCP transports serve tools through rmcp's router. Every route
//! delegates to [`ToolRegistry::call_tool`], so all transports share one
//! dispatch path.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};
use serde_json::Value;

use super::registry::ToolRegistry;

/// Build the tool router with one route per registered tool.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .entries()
        .iter()
        .fold(ToolRouter::new(), |router, entry| {
            let registry = registry.clone();
            let name = entry.name().to_string();
            router.with_route(ToolRoute::new_dyn(
                entry.tool.clone(),
                move |ctx: ToolCallContext<'_, S>| {
                    let args = ctx.arguments.clone().map(Value::Object).unwrap_or(Value::Null);
                    let registry = registry.clone();
                    let name = name.clone();
                    async move { Ok(registry.call_tool(&name, args).await) }.boxed()
                },
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PrometheusConfig;
    use crate::domains::prometheus::PrometheusClient;

    struct TestServer {}

    fn test_registry() -> Arc<ToolRegistry> {
        let config = PrometheusConfig::new("http://localhost:9090").unwrap();
        let client = Arc::new(PrometheusClient::new(&config).unwrap());
        Arc::new(ToolRegistry::new(client).unwrap())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_registry());
        let tools = router.list_all();
        assert_eq!(tools.len(), 18);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"test_connection"));
        assert!(names.contains(&"query_range"));
        assert!(names.contains(&"get_tsdb_status"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = test_registry();
        let router: ToolRouter<TestServer> = build_tool_router(registry.clone());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        let registry_names = registry.tool_names();
        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
