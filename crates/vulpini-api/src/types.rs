// Wire models for the management API.
//
// The proxy's JSON is not perfectly uniform across builds: the health
// payload exists in two shapes, the IP list is sometimes wrapped in an
// object, and enum-ish strings occasionally grow new values. Decoding is
// deliberately tolerant -- unknown strings are preserved, missing numeric
// fields default to zero -- because a monitoring view should degrade, not
// reject.

use serde::{Deserialize, Serialize};

/// Liveness probe result.
///
/// Decodes both `{"success":true,"status":"healthy"}` and the wrapped
/// `{"success":true,"data":{"status":"healthy"}}` variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "HealthWire")]
pub struct HealthStatus {
    pub success: bool,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct HealthWire {
    #[serde(default)]
    success: bool,
    status: Option<String>,
    data: Option<HealthWireData>,
}

#[derive(Debug, Deserialize)]
struct HealthWireData {
    status: Option<String>,
}

impl From<HealthWire> for HealthStatus {
    fn from(wire: HealthWire) -> Self {
        let status = wire
            .status
            .or(wire.data.and_then(|d| d.status))
            .unwrap_or_else(|| "unknown".to_string());
        Self {
            success: wire.success,
            status,
        }
    }
}

/// Aggregate traffic metrics, replaced wholesale on every poll.
///
/// `error_rate` is a 0..1 fraction, not a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub total_bytes_in: u64,
    pub total_bytes_out: u64,
    pub active_connections: u32,
    pub requests_per_second: f64,
    pub bytes_per_second: f64,
    pub avg_latency_ms: f64,
    pub error_rate: f64,
}

/// Health classification of a pool node as reported by the proxy.
///
/// Proxy builds have shipped ad-hoc status strings; anything outside the
/// known set is carried through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeHealth {
    Healthy,
    Degraded,
    Unhealthy,
    #[default]
    Unknown,
    Other(String),
}

impl NodeHealth {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NodeHealth {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "healthy" => Self::Healthy,
            "degraded" => Self::Degraded,
            "unhealthy" => Self::Unhealthy,
            "unknown" | "" => Self::Unknown,
            _ => Self::Other(s),
        }
    }
}

impl From<NodeHealth> for String {
    fn from(h: NodeHealth) -> Self {
        h.as_str().to_string()
    }
}

impl std::fmt::Display for NodeHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the managed IP pool.
///
/// `address` is the unique key; the collection is always replaced as a
/// whole, never diffed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpRecord {
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub isp: Option<String>,
    #[serde(default)]
    pub latency_ms: f64,
    #[serde(default)]
    pub avg_latency_ms: f64,
    #[serde(default)]
    pub status: NodeHealth,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub total_uses: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failure_count: u64,
    #[serde(default)]
    pub use_count: u64,
}

fn default_true() -> bool {
    true
}

impl Default for IpRecord {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: 0,
            country: None,
            isp: None,
            latency_ms: 0.0,
            avg_latency_ms: 0.0,
            status: NodeHealth::Unknown,
            enabled: true,
            total_uses: 0,
            success_count: 0,
            failure_count: 0,
            use_count: 0,
        }
    }
}

/// Request body for adding a pool node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIp {
    pub address: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
}

/// Anomaly classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnomalyKind {
    TrafficSpike,
    LatencySpike,
    ErrorRateHigh,
    ConnectionFlood,
    #[default]
    Unknown,
    Other(String),
}

impl AnomalyKind {
    /// Short human label for list rendering.
    pub fn label(&self) -> &str {
        match self {
            Self::TrafficSpike => "traffic spike",
            Self::LatencySpike => "latency spike",
            Self::ErrorRateHigh => "error rate",
            Self::ConnectionFlood => "conn flood",
            Self::Unknown => "unknown",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for AnomalyKind {
    fn from(s: String) -> Self {
        // The proxy lowercases its Debug names, so "trafficspike"; accept
        // snake_case spellings from older builds too.
        match s.to_ascii_lowercase().replace('_', "").as_str() {
            "trafficspike" => Self::TrafficSpike,
            "latencyspike" => Self::LatencySpike,
            "errorratehigh" => Self::ErrorRateHigh,
            "connectionflood" => Self::ConnectionFlood,
            "" | "unknown" => Self::Unknown,
            _ => Self::Other(s),
        }
    }
}

impl From<AnomalyKind> for String {
    fn from(k: AnomalyKind) -> Self {
        match k {
            AnomalyKind::TrafficSpike => "trafficspike".to_string(),
            AnomalyKind::LatencySpike => "latencyspike".to_string(),
            AnomalyKind::ErrorRateHigh => "errorratehigh".to_string(),
            AnomalyKind::ConnectionFlood => "connectionflood".to_string(),
            AnomalyKind::Unknown => "unknown".to_string(),
            AnomalyKind::Other(s) => s,
        }
    }
}

/// Anomaly severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "low" | "" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.as_str().to_string()
    }
}

/// One detected anomaly, as produced by the proxy's detector.
///
/// The type field is `anomaly_type` on the wire; older builds used plain
/// `type`, accepted here as an alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    pub id: String,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(rename = "anomaly_type", alias = "type")]
    pub kind: AnomalyKind,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
}

/// Result of a remote mutation (add/delete/toggle IP, config reload).
///
/// Mutations never error out of the client; a transport failure becomes a
/// failed outcome with a generic message, a server rejection becomes a
/// failed outcome carrying the server's own error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub success: bool,
    pub message: String,
}

impl MutationOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn health_decodes_flat_shape() {
        let h: HealthStatus =
            serde_json::from_str(r#"{"success":true,"status":"healthy"}"#).unwrap();
        assert!(h.success);
        assert_eq!(h.status, "healthy");
    }

    #[test]
    fn health_decodes_wrapped_shape() {
        let h: HealthStatus =
            serde_json::from_str(r#"{"success":true,"data":{"status":"healthy"}}"#).unwrap();
        assert!(h.success);
        assert_eq!(h.status, "healthy");
    }

    #[test]
    fn health_missing_status_falls_back() {
        let h: HealthStatus = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!h.success);
        assert_eq!(h.status, "unknown");
    }

    #[test]
    fn node_health_preserves_unknown_strings() {
        assert_eq!(NodeHealth::from("Degraded".to_string()), NodeHealth::Degraded);
        assert_eq!(
            NodeHealth::from("quarantined".to_string()),
            NodeHealth::Other("quarantined".to_string())
        );
    }

    #[test]
    fn anomaly_kind_accepts_both_spellings() {
        assert_eq!(
            AnomalyKind::from("trafficspike".to_string()),
            AnomalyKind::TrafficSpike
        );
        assert_eq!(
            AnomalyKind::from("traffic_spike".to_string()),
            AnomalyKind::TrafficSpike
        );
    }

    #[test]
    fn anomaly_event_accepts_type_alias() {
        let json = r#"{
            "id": "a1",
            "timestamp": 1700000000,
            "type": "latencyspike",
            "value": 850.0,
            "threshold": 500.0,
            "description": "latency above threshold",
            "severity": "high"
        }"#;
        let event: AnomalyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, AnomalyKind::LatencySpike);
        assert_eq!(event.severity, Severity::High);
    }

    #[test]
    fn ip_record_defaults_optional_fields() {
        let rec: IpRecord =
            serde_json::from_str(r#"{"address":"10.0.0.1","port":1080}"#).unwrap();
        assert!(rec.enabled);
        assert_eq!(rec.status, NodeHealth::Unknown);
        assert_eq!(rec.country, None);
        assert_eq!(rec.total_uses, 0);
    }
}
