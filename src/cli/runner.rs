//! Command execution

use super::commands::{Cli, Commands};
use super::server::{self, ServerConfig};
use crate::config::{ConnectorConfig, TriggerConfig};
use crate::dispatch::{run_items, OperationRequest};
use crate::transport::ApiClient;
use crate::types::JsonValue;
use crate::webhook::SubscriptionStore;
use anyhow::Context;
use std::io::Read;

/// Executes the parsed CLI command
pub struct Runner {
    cli: Cli,
}

impl Runner {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.resolve_config()?;
        config.validate()?;
        let client = ApiClient::new(config.client_config());

        match &self.cli.command {
            Commands::Check => {
                client
                    .check_connection()
                    .await
                    .context("connection check failed")?;
                println!("Connection check succeeded");
                Ok(())
            }

            Commands::Run {
                request,
                request_json,
                continue_on_fail,
            } => {
                let raw = match (request, request_json) {
                    (_, Some(inline)) => inline.clone(),
                    (Some(path), None) => std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?,
                    (None, None) => {
                        let mut buffer = String::new();
                        std::io::stdin().read_to_string(&mut buffer)?;
                        buffer
                    }
                };

                let requests = parse_requests(&raw)?;
                let items = run_items(&client, requests, *continue_on_fail).await?;

                for item in items {
                    let line = serde_json::json!({
                        "json": item.json,
                        "pairedItem": item.source_item,
                    });
                    println!("{line}");
                }
                Ok(())
            }

            Commands::Serve {
                trigger,
                port,
                skip_register,
            } => {
                let trigger_config = TriggerConfig::from_file(trigger)
                    .with_context(|| format!("failed to load {}", trigger.display()))?;

                let store = match &trigger_config.state_path {
                    Some(path) => SubscriptionStore::from_file(path)?,
                    None => SubscriptionStore::in_memory(),
                };

                server::serve(
                    client,
                    store,
                    trigger_config.subscription,
                    ServerConfig {
                        port: *port,
                        register: !skip_register,
                    },
                )
                .await?;
                Ok(())
            }
        }
    }

    /// Config file if given, environment otherwise, with CLI overrides on
    /// top.
    fn resolve_config(&self) -> anyhow::Result<ConnectorConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ConnectorConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ConnectorConfig::from_env(),
        };

        if let Some(token) = &self.cli.token {
            config.api_token.clone_from(token);
        }
        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }

        Ok(config)
    }
}

/// A request file holds either one request object or an array of them.
fn parse_requests(raw: &str) -> anyhow::Result<Vec<OperationRequest>> {
    let value: JsonValue = serde_json::from_str(raw).context("request input is not valid JSON")?;

    let requests = match value {
        JsonValue::Array(entries) => entries
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<OperationRequest>, _>>()?,
        object => vec![serde_json::from_value(object)?],
    };

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Resource;

    #[test]
    fn test_parse_single_request() {
        let requests = parse_requests(
            r#"{"resource": "vehicle", "operation": "get", "vehicleId": "v1"}"#,
        )
        .unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].resource, Resource::Vehicle);
    }

    #[test]
    fn test_parse_request_array() {
        let requests = parse_requests(
            r#"[
                {"resource": "tag", "operation": "getAll", "returnAll": true},
                {"resource": "driver", "operation": "get", "driverId": "d1"}
            ]"#,
        )
        .unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].resource, Resource::Driver);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_requests("not json").is_err());
        assert!(parse_requests(r#"{"operation": "get"}"#).is_err());
    }
}
