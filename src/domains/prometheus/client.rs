//! HTTP client for the Prometheus query API.
//!
//! One method per `/api/v1` endpoint. Every call is a single GET with the
//! configured timeout and optional basic auth; the response envelope is
//! unwrapped here so callers only ever see typed `data` or a [`PrometheusError`].

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::error::PrometheusError;
use super::types::{
    AlertsData, ApiResponse, BuildInfo, ConfigData, FlagsData, Labels, MetadataData, QueryData,
    RulesData, RuntimeInfo, TargetsData, TimeRange, TsdbStatus,
};
use crate::core::config::PrometheusConfig;

/// Basic auth credentials attached to every request.
#[derive(Clone)]
struct Credentials {
    username: String,
    password: Option<String>,
}

/// Which probe established connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// `/api/v1/status/buildinfo` answered.
    BuildInfo,
    /// Build info failed, the fallback `up` query answered.
    Query,
}

/// Outcome of [`PrometheusClient::check_connection`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCheck {
    pub probe: ProbeKind,
    pub version: Option<String>,
    /// Set when only the fallback probe succeeded.
    pub degraded: bool,
    pub build_info_error: Option<String>,
}

/// Client for a single Prometheus server.
///
/// Holds no mutable state; the inner `reqwest::Client` pools connections and
/// is safe to share between concurrent tool calls.
#[derive(Clone)]
pub struct PrometheusClient {
    base_url: String,
    credentials: Option<Credentials>,
    http: reqwest::Client,
}

impl std::fmt::Debug for PrometheusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusClient")
            .field("base_url", &self.base_url)
            .field("basic_auth", &self.credentials.is_some())
            .finish()
    }
}

impl PrometheusClient {
    /// Build a client from validated connection settings.
    pub fn new(config: &PrometheusConfig) -> Result<Self, PrometheusError> {
        let base_url = config.url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| PrometheusError::InvalidConfig(format!("'{base_url}': {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("prometheus-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PrometheusError::InvalidConfig(e.to_string()))?;

        let credentials = config.username.as_ref().map(|username| Credentials {
            username: username.clone(),
            password: config.password.clone(),
        });

        Ok(Self {
            base_url,
            credentials,
            http,
        })
    }

    /// The configured base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for `/api/v1/<segments...>`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PrometheusError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PrometheusError::InvalidConfig(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| PrometheusError::InvalidConfig(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    /// Issue one GET and unwrap the response envelope.
    #[instrument(skip(self, params), fields(endpoint = %segments.join("/")))]
    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, PrometheusError> {
        let url = self.endpoint(segments)?;
        debug!("GET {}", url);

        let mut request = self.http.get(url).query(params);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, creds.password.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PrometheusError::unreachable(&self.base_url, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PrometheusError::unreachable(&self.base_url, e.to_string()))?;

        Self::decode(status, &body)
    }

    /// Interpret a response body.
    ///
    /// An error envelope wins over the HTTP status, so `200` with
    /// `status: "error"` is still a failure and a `400` carrying an envelope
    /// reports the envelope's message.
    fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, PrometheusError> {
        let envelope: ApiResponse<Value> = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(PrometheusError::invalid_response(format!(
                    "response is not a Prometheus API envelope: {e}"
                )));
            }
            Err(_) => {
                let message = match body.trim() {
                    "" => status.canonical_reason().unwrap_or("unknown status").to_string(),
                    text => text.chars().take(500).collect(),
                };
                return Err(PrometheusError::Http {
                    status: status.as_u16(),
                    message,
                });
            }
        };

        if !envelope.is_success() {
            return Err(PrometheusError::query(
                envelope.error_type.unwrap_or_else(|| "unknown".to_string()),
                envelope
                    .error
                    .unwrap_or_else(|| format!("request failed with HTTP {status}")),
            ));
        }

        for warning in &envelope.warnings {
            warn!("Prometheus warning: {}", warning);
        }

        let data = envelope
            .data
            .ok_or_else(|| PrometheusError::invalid_response("success envelope without data"))?;
        serde_json::from_value(data)
            .map_err(|e| PrometheusError::invalid_response(format!("unexpected data shape: {e}")))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// `GET /api/v1/query`
    pub async fn query(&self, query: &str, time: Option<&str>) -> Result<QueryData, PrometheusError> {
        let mut params = vec![("query", query.to_string())];
        if let Some(time) = time {
            params.push(("time", time.to_string()));
        }
        self.get(&["query"], &params).await
    }

    /// `GET /api/v1/query_range`
    pub async fn query_range(
        &self,
        query: &str,
        range: &TimeRange,
    ) -> Result<QueryData, PrometheusError> {
        let params = [
            ("query", query.to_string()),
            ("start", range.start.clone()),
            ("end", range.end.clone()),
            ("step", range.step.clone()),
        ];
        self.get(&["query_range"], &params).await
    }

    // ========================================================================
    // Targets and discovery
    // ========================================================================

    /// `GET /api/v1/targets`
    pub async fn targets(&self) -> Result<TargetsData, PrometheusError> {
        self.get(&["targets"], &[]).await
    }

    /// `GET /api/v1/label/__name__/values`
    pub async fn metric_names(&self) -> Result<Vec<String>, PrometheusError> {
        self.label_values("__name__").await
    }

    /// `GET /api/v1/metadata`, optionally for one metric.
    pub async fn metadata(&self, metric: Option<&str>) -> Result<MetadataData, PrometheusError> {
        let params: Vec<_> = metric.map(|m| ("metric", m.to_string())).into_iter().collect();
        self.get(&["metadata"], &params).await
    }

    /// `GET /api/v1/label/{name}/values`
    pub async fn label_values(&self, label: &str) -> Result<Vec<String>, PrometheusError> {
        self.get(&["label", label, "values"], &[]).await
    }

    /// `GET /api/v1/series`
    pub async fn series(
        &self,
        selector: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<Labels>, PrometheusError> {
        let mut params = vec![("match[]", selector.to_string())];
        if let Some(start) = start {
            params.push(("start", start.to_string()));
        }
        if let Some(end) = end {
            params.push(("end", end.to_string()));
        }
        self.get(&["series"], &params).await
    }

    // ========================================================================
    // Alerting
    // ========================================================================

    /// `GET /api/v1/alerts`
    pub async fn alerts(&self) -> Result<AlertsData, PrometheusError> {
        self.get(&["alerts"], &[]).await
    }

    /// `GET /api/v1/rules`
    pub async fn rules(&self) -> Result<RulesData, PrometheusError> {
        self.get(&["rules"], &[]).await
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// `GET /api/v1/status/buildinfo`
    pub async fn build_info(&self) -> Result<BuildInfo, PrometheusError> {
        self.get(&["status", "buildinfo"], &[]).await
    }

    /// `GET /api/v1/status/runtimeinfo`
    pub async fn runtime_info(&self) -> Result<RuntimeInfo, PrometheusError> {
        self.get(&["status", "runtimeinfo"], &[]).await
    }

    /// `GET /api/v1/status/config`
    pub async fn config(&self) -> Result<ConfigData, PrometheusError> {
        self.get(&["status", "config"], &[]).await
    }

    /// `GET /api/v1/status/flags`
    pub async fn flags(&self) -> Result<FlagsData, PrometheusError> {
        self.get(&["status", "flags"], &[]).await
    }

    /// `GET /api/v1/status/tsdb`
    pub async fn tsdb_status(&self, limit: Option<usize>) -> Result<TsdbStatus, PrometheusError> {
        let params: Vec<_> = limit.map(|l| ("limit", l.to_string())).into_iter().collect();
        self.get(&["status", "tsdb"], &params).await
    }

    // ========================================================================
    // Connectivity
    // ========================================================================

    /// Probe the server: build info first, then a minimal `up` query.
    ///
    /// Some deployments restrict the status endpoints while leaving queries
    /// open; that case is reported as connected but `degraded`.
    pub async fn check_connection(&self) -> Result<ConnectionCheck, PrometheusError> {
        let build_err = match self.build_info().await {
            Ok(info) => {
                return Ok(ConnectionCheck {
                    probe: ProbeKind::BuildInfo,
                    version: Some(info.version).filter(|v| !v.is_empty()),
                    degraded: false,
                    build_info_error: None,
                });
            }
            Err(e) => e,
        };

        warn!("Build info probe failed, falling back to query probe: {}", build_err);

        match self.query("up", None).await {
            Ok(_) => Ok(ConnectionCheck {
                probe: ProbeKind::Query,
                version: None,
                degraded: true,
                build_info_error: Some(build_err.to_string()),
            }),
            Err(query_err) => Err(PrometheusError::unreachable(
                &self.base_url,
                format!("build info probe failed ({build_err}); fallback query failed ({query_err})"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(url: &str) -> PrometheusClient {
        PrometheusClient::new(&PrometheusConfig::new(url).unwrap()).unwrap()
    }

    fn success(data: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": data}))
    }

    #[tokio::test]
    async fn test_query_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .and(query_param("query", "up"))
            .and(query_param("time", "2024-01-01T00:00:00Z"))
            .respond_with(success(json!({"resultType": "vector", "result": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let data = client.query("up", Some("2024-01-01T00:00:00Z")).await.unwrap();
        assert_eq!(data.result_type, "vector");
    }

    #[tokio::test]
    async fn test_error_envelope_with_http_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "parse error at char 4"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).query("up{", None).await.unwrap_err();
        assert!(matches!(err, PrometheusError::Query { .. }));
        let msg = err.to_string();
        assert!(msg.contains("bad_data"));
        assert!(msg.contains("parse error at char 4"));
    }

    #[tokio::test]
    async fn test_http_400_prefers_envelope_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query_range"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "exceeded maximum resolution"
            })))
            .mount(&server)
            .await;

        let range = TimeRange {
            start: "0".to_string(),
            end: "1".to_string(),
            step: "1ms".to_string(),
        };
        let err = client_for(&server.uri())
            .query_range("up", &range)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exceeded maximum resolution"));
    }

    #[tokio::test]
    async fn test_http_error_without_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/targets"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).targets().await.unwrap_err();
        match err {
            PrometheusError::Http { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_names_base_url() {
        let client = client_for("http://127.0.0.1:1");
        let err = client.alerts().await.unwrap_err();
        assert!(err.is_unreachable());
        assert!(err.to_string().contains("http://127.0.0.1:1"));
    }

    #[tokio::test]
    async fn test_basic_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/status/flags"))
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .respond_with(success(json!({"storage.tsdb.retention.time": "15d"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = PrometheusConfig::new(&server.uri())
            .unwrap()
            .with_credentials(Some("admin".to_string()), Some("secret".to_string()));
        let client = PrometheusClient::new(&config).unwrap();
        let flags = client.flags().await.unwrap();
        assert_eq!(flags["storage.tsdb.retention.time"], "15d");
    }

    #[tokio::test]
    async fn test_label_values_path_and_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prom/api/v1/label/job/values"))
            .respond_with(success(json!(["node", "prometheus"])))
            .mount(&server)
            .await;

        let client = client_for(&format!("{}/prom/", server.uri()));
        assert_eq!(client.base_url(), format!("{}/prom", server.uri()));
        let values = client.label_values("job").await.unwrap();
        assert_eq!(values, vec!["node", "prometheus"]);
    }

    #[tokio::test]
    async fn test_series_sends_match_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/series"))
            .and(query_param("match[]", "up{job=\"node\"}"))
            .respond_with(success(json!([{"__name__": "up", "job": "node"}])))
            .expect(1)
            .mount(&server)
            .await;

        let series = client_for(&server.uri())
            .series("up{job=\"node\"}", None, None)
            .await
            .unwrap();
        assert_eq!(series[0]["job"], "node");
    }

    #[tokio::test]
    async fn test_unexpected_data_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/label/__name__/values"))
            .respond_with(success(json!({"not": "a list"})))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).metric_names().await.unwrap_err();
        assert!(matches!(err, PrometheusError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_check_connection_uses_build_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/status/buildinfo"))
            .respond_with(success(json!({"version": "2.48.0", "revision": "abc"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .respond_with(success(json!({"resultType": "vector", "result": []})))
            .expect(0)
            .mount(&server)
            .await;

        let check = client_for(&server.uri()).check_connection().await.unwrap();
        assert_eq!(check.probe, ProbeKind::BuildInfo);
        assert_eq!(check.version.as_deref(), Some("2.48.0"));
        assert!(!check.degraded);
    }

    #[tokio::test]
    async fn test_check_connection_falls_back_to_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/status/buildinfo"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .and(query_param("query", "up"))
            .respond_with(success(json!({"resultType": "vector", "result": []})))
            .expect(1)
            .mount(&server)
            .await;

        let check = client_for(&server.uri()).check_connection().await.unwrap();
        assert_eq!(check.probe, ProbeKind::Query);
        assert!(check.degraded);
        assert!(check.build_info_error.unwrap().contains("403"));
    }

    #[tokio::test]
    async fn test_check_connection_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).check_connection().await.unwrap_err();
        assert!(err.is_unreachable());
        assert!(err.to_string().contains(&server.uri()));
    }
}
