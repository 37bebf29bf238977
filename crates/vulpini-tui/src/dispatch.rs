//! Action dispatcher — pool mutations and config reload.
//!
//! Each operation is an async function from the client to the list of
//! actions it produces, so the app loop can spawn it and forward the
//! results through the action queue. Validation happens before any
//! transport call; a failed mutation never touches local state, and a
//! successful one re-fetches the IP pool exactly once so the table
//! reflects the backend's view rather than an optimistic guess.

use tracing::debug;

use vulpini_api::{MonitorClient, NewIp};

use crate::action::{Action, Notification};

/// Port assumed when the add-IP form leaves the field empty.
pub const DEFAULT_PORT: u16 = 1080;

/// Validate raw add-IP form fields into a request body.
///
/// The address is required; the port defaults but must parse when
/// given; country and ISP are free-form and optional.
pub fn validate_new_ip(
    address: &str,
    port: &str,
    country: &str,
    isp: &str,
) -> Result<NewIp, String> {
    let address = address.trim();
    if address.is_empty() {
        return Err("address is required".to_owned());
    }

    let port = match port.trim() {
        "" => DEFAULT_PORT,
        raw => raw
            .parse()
            .map_err(|_| format!("invalid port: {raw}"))?,
    };

    let optional = |raw: &str| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    };

    Ok(NewIp {
        address: address.to_owned(),
        port,
        country: optional(country),
        isp: optional(isp),
    })
}

/// Add a node to the pool, re-fetching the list on success.
pub async fn add_ip(client: &MonitorClient, ip: NewIp) -> Vec<Action> {
    let outcome = client.add_ip(&ip).await;
    if outcome.success {
        debug!(address = %ip.address, "ip added, re-fetching pool");
        vec![
            Action::Notify(Notification::success(format!("added {}", ip.address))),
            Action::IpsUpdated(client.ips().await),
        ]
    } else {
        vec![Action::Notify(Notification::error(outcome.message))]
    }
}

/// Delete a node by address. Callers must have confirmed already.
pub async fn delete_ip(client: &MonitorClient, address: &str) -> Vec<Action> {
    let outcome = client.delete_ip(address).await;
    if outcome.success {
        debug!(address, "ip deleted, re-fetching pool");
        vec![
            Action::Notify(Notification::success(format!("deleted {address}"))),
            Action::IpsUpdated(client.ips().await),
        ]
    } else {
        vec![Action::Notify(Notification::error(outcome.message))]
    }
}

/// Flip a node's enabled flag.
pub async fn toggle_ip(client: &MonitorClient, address: &str) -> Vec<Action> {
    let outcome = client.toggle_ip(address).await;
    if outcome.success {
        vec![
            Action::Notify(Notification::success(outcome.message)),
            Action::IpsUpdated(client.ips().await),
        ]
    } else {
        vec![Action::Notify(Notification::error(outcome.message))]
    }
}

/// Ask the proxy to hot-reload its configuration. No state refresh is
/// implied either way; the outcome is surfaced and that is all.
pub async fn reload_config(client: &MonitorClient) -> Vec<Action> {
    let outcome = client.reload_config().await;
    let notification = if outcome.success {
        Notification::success(outcome.message)
    } else {
        Notification::error(outcome.message)
    };
    vec![Action::Notify(notification)]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::action::NotificationLevel;

    use super::*;

    async fn setup() -> (MockServer, MonitorClient) {
        let server = MockServer::start().await;
        let client =
            MonitorClient::new(server.uri().parse().unwrap(), Duration::from_secs(2)).unwrap();
        (server, client)
    }

    fn ok_body() -> serde_json::Value {
        json!({"success": true, "message": "done"})
    }

    #[test]
    fn empty_address_is_rejected_before_any_call() {
        let err = validate_new_ip("", "1080", "", "").unwrap_err();
        assert_eq!(err, "address is required");
        assert!(validate_new_ip("   ", "", "", "").is_err());
    }

    #[test]
    fn port_defaults_but_must_parse() {
        let ip = validate_new_ip("10.0.0.9", "", "NL", "").unwrap();
        assert_eq!(ip.port, DEFAULT_PORT);
        assert_eq!(ip.country.as_deref(), Some("NL"));
        assert_eq!(ip.isp, None);

        let err = validate_new_ip("10.0.0.9", "not-a-port", "", "").unwrap_err();
        assert_eq!(err, "invalid port: not-a-port");
    }

    #[tokio::test]
    async fn confirmed_delete_refetches_the_pool_exactly_once() {
        let (server, client) = setup().await;

        Mock::given(method("DELETE"))
            .and(path("/api/ips/10.0.0.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/ips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"address": "10.0.0.6", "port": 1080}],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let actions = delete_ip(&client, "10.0.0.5").await;

        assert_eq!(actions.len(), 2);
        assert!(matches!(
            &actions[0],
            Action::Notify(n) if n.level == NotificationLevel::Success
        ));
        assert!(matches!(
            &actions[1],
            Action::IpsUpdated(ips) if ips.len() == 1 && ips[0].address == "10.0.0.6"
        ));
    }

    #[tokio::test]
    async fn rejected_mutation_surfaces_the_server_message_without_refetch() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/ips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "address already in pool",
            })))
            .expect(1)
            .mount(&server)
            .await;
        // A failed add must leave the list alone.
        Mock::given(method("GET"))
            .and(path("/api/ips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(0)
            .mount(&server)
            .await;

        let ip = validate_new_ip("10.0.0.5", "1080", "", "").unwrap();
        let actions = add_ip(&client, ip).await;

        assert_eq!(
            actions,
            vec![Action::Notify(Notification::error("address already in pool"))]
        );
    }

    #[tokio::test]
    async fn unreachable_backend_degrades_to_a_notice() {
        // Point at a closed port: the transport absorbs the failure and
        // the dispatcher turns it into an error toast.
        let client = MonitorClient::new(
            "http://127.0.0.1:1".parse().unwrap(),
            Duration::from_millis(200),
        )
        .unwrap();

        let actions = delete_ip(&client, "10.0.0.5").await;

        assert_eq!(actions.len(), 1);
        assert!(matches!(
            &actions[0],
            Action::Notify(n) if n.level == NotificationLevel::Error
        ));
    }

    #[tokio::test]
    async fn reload_reports_outcome_without_state_refresh() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/config/reload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "configuration reloaded",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let actions = reload_config(&client).await;

        assert_eq!(
            actions,
            vec![Action::Notify(Notification::success(
                "configuration reloaded"
            ))]
        );
    }

    #[tokio::test]
    async fn toggle_refetches_on_success() {
        let (server, client) = setup().await;

        Mock::given(method("PATCH"))
            .and(path("/api/ips/10.0.0.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"enabled": false},
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/ips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let actions = toggle_ip(&client, "10.0.0.5").await;

        assert_eq!(actions.len(), 2);
        assert!(matches!(&actions[1], Action::IpsUpdated(_)));
    }
}
