// Management API HTTP client
//
// Wraps `reqwest::Client` with vulpini-specific URL construction and
// `{success, data, message, error}` envelope unwrapping. The public
// methods form the neutral-fallback surface: reads return `None`/empty
// on any failure, mutations return a failed outcome. Internals use
// `Result` so failures can be logged with their real cause.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::types::{
    AnomalyEvent, HealthStatus, IpRecord, MutationOutcome, NewIp, StatsSnapshot,
};

/// Message substituted when the backend cannot be reached at all.
const UNREACHABLE: &str = "proxy backend unreachable";

/// The `{success, data, message, error}` envelope every endpoint uses.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    message: Option<String>,
    error: Option<String>,
}

/// The IP list arrives either as a bare array or wrapped in an object
/// with a count, depending on the proxy build.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IpListWire {
    Flat(Vec<IpRecord>),
    Wrapped { ips: Vec<IpRecord> },
}

impl IpListWire {
    fn into_vec(self) -> Vec<IpRecord> {
        match self {
            Self::Flat(list) => list,
            Self::Wrapped { ips } => ips,
        }
    }
}

/// HTTP client for the proxy's management API.
///
/// Cheap to clone; all clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    http: reqwest::Client,
    base: Url,
}

impl MonitorClient {
    /// Create a client for the given management base URL
    /// (e.g. `http://localhost:9090`).
    pub fn new(base: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// The management base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // ── Reads (fallback: None / empty) ───────────────────────────────

    /// Liveness probe. `None` means the backend is unreachable, which
    /// callers treat the same as a failed probe.
    pub async fn health(&self) -> Option<HealthStatus> {
        match self.fetch_health().await {
            Ok(h) => Some(h),
            Err(err) => {
                debug!("health probe failed: {err}");
                None
            }
        }
    }

    /// Current traffic metrics snapshot.
    pub async fn stats(&self) -> Option<StatsSnapshot> {
        match self.get_data::<StatsSnapshot>("api/stats").await {
            Ok(stats) => Some(stats),
            Err(err) => {
                debug!("stats fetch failed: {err}");
                None
            }
        }
    }

    /// The managed IP pool. Accepts both wire shapes of the list.
    pub async fn ips(&self) -> Vec<IpRecord> {
        match self.get_data::<IpListWire>("api/ips").await {
            Ok(list) => list.into_vec(),
            Err(err) => {
                debug!("ip list fetch failed: {err}");
                Vec::new()
            }
        }
    }

    /// Recent anomalies, most recent first as the detector reports them.
    pub async fn anomalies(&self) -> Vec<AnomalyEvent> {
        match self.get_data::<Vec<AnomalyEvent>>("api/anomalies").await {
            Ok(list) => list,
            Err(err) => {
                debug!("anomaly fetch failed: {err}");
                Vec::new()
            }
        }
    }

    // ── Mutations (fallback: failed outcome) ─────────────────────────

    /// Add a node to the pool. Local state is not touched; callers
    /// re-fetch the list on success.
    pub async fn add_ip(&self, ip: &NewIp) -> MutationOutcome {
        self.try_add_ip(ip).await.unwrap_or_else(|err| {
            warn!("add ip failed: {err}");
            MutationOutcome::failed(UNREACHABLE)
        })
    }

    /// Remove a node by address.
    pub async fn delete_ip(&self, address: &str) -> MutationOutcome {
        self.try_delete_ip(address).await.unwrap_or_else(|err| {
            warn!("delete ip failed: {err}");
            MutationOutcome::failed(UNREACHABLE)
        })
    }

    /// Flip a node's enabled flag.
    pub async fn toggle_ip(&self, address: &str) -> MutationOutcome {
        self.try_toggle_ip(address).await.unwrap_or_else(|err| {
            warn!("toggle ip failed: {err}");
            MutationOutcome::failed(UNREACHABLE)
        })
    }

    /// Ask the proxy to hot-reload its configuration file.
    pub async fn reload_config(&self) -> MutationOutcome {
        self.try_reload_config().await.unwrap_or_else(|err| {
            warn!("config reload failed: {err}");
            MutationOutcome::failed(UNREACHABLE)
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let full = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path);
        Ok(Url::parse(&full)?)
    }

    /// `api/ips/{address}` with the address percent-encoded as a path
    /// segment.
    fn ip_endpoint(&self, address: &str) -> Result<Url, Error> {
        let mut url = self.endpoint("api/ips")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidPath)?
            .push(address);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Health is parsed straight from the body (both shapes) and the
    /// HTTP status is ignored: a `success:false` body from a degraded
    /// backend is still a valid probe result.
    async fn fetch_health(&self) -> Result<HealthStatus, Error> {
        let url = self.endpoint("api/health")?;
        debug!("GET {url}");
        let body = self.http.get(url).send().await?.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// GET a data-bearing endpoint and unwrap the envelope.
    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: extract_error(&body),
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if !envelope.success {
            return Err(Error::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .or(envelope.message)
                    .unwrap_or_else(|| "request rejected".to_string()),
            });
        }

        envelope.data.ok_or_else(|| Error::Deserialization {
            message: "missing data field".to_string(),
            body,
        })
    }

    async fn try_add_ip(&self, ip: &NewIp) -> Result<MutationOutcome, Error> {
        let url = self.endpoint("api/ips")?;
        debug!("POST {url}");
        self.mutate(self.http.post(url).json(ip)).await
    }

    async fn try_delete_ip(&self, address: &str) -> Result<MutationOutcome, Error> {
        let url = self.ip_endpoint(address)?;
        debug!("DELETE {url}");
        self.mutate(self.http.delete(url)).await
    }

    async fn try_toggle_ip(&self, address: &str) -> Result<MutationOutcome, Error> {
        let url = self.ip_endpoint(address)?;
        debug!("PATCH {url}");
        self.mutate(self.http.patch(url)).await
    }

    async fn try_reload_config(&self) -> Result<MutationOutcome, Error> {
        let url = self.endpoint("api/config/reload")?;
        debug!("POST {url}");
        self.mutate(self.http.post(url)).await
    }

    /// Send a mutation and fold the reply into an outcome. A non-2xx or
    /// `success:false` reply is a *failed outcome*, not an error: the
    /// server's message must reach the user.
    async fn mutate(&self, req: reqwest::RequestBuilder) -> Result<MutationOutcome, Error> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        let envelope: Envelope<Value> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        let message = envelope
            .message
            .or(envelope.error)
            .or_else(|| toggle_message(envelope.data.as_ref()));

        if status.is_success() && envelope.success {
            Ok(MutationOutcome::ok(
                message.unwrap_or_else(|| "done".to_string()),
            ))
        } else {
            Ok(MutationOutcome::failed(message.unwrap_or_else(|| {
                format!("request failed (HTTP {})", status.as_u16())
            })))
        }
    }
}

/// Pull the `error` field out of a failure body, falling back to a
/// trimmed raw body when it is not the usual envelope.
fn extract_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.error.or(parsed.message) {
            return msg;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty error body".to_string()
    } else {
        trimmed.chars().take(120).collect()
    }
}

/// The toggle endpoint replies with `data:{enabled}` and no message.
fn toggle_message(data: Option<&Value>) -> Option<String> {
    let enabled = data?.get("enabled")?.as_bool()?;
    Some(if enabled {
        "node enabled".to_string()
    } else {
        "node disabled".to_string()
    })
}
