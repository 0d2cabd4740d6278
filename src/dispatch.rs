//! Operation routing and item packing
//!
//! The host hands this module one request per input item: a JSON object
//! with a `resource` field, an `operation` field, and the operation's
//! parameters. The parameters are deserialized into the resource's typed
//! operation enum exactly once, here, and passed by value into the handler.

use crate::error::{Error, Result};
use crate::resources::{
    address, asset, compliance, document, driver, route, safety, sensor, tag, vehicle, webhook,
};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The API resources this connector exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Address,
    Asset,
    Compliance,
    Document,
    Driver,
    Route,
    Safety,
    Sensor,
    Tag,
    Vehicle,
    Webhook,
}

/// One operation request, as supplied per input item
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRequest {
    pub resource: Resource,
    /// Operation name plus its parameters, parsed by the resource handler
    #[serde(flatten)]
    pub params: JsonObject,
}

/// One output item, paired with the input item that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub json: JsonValue,
    pub source_item: usize,
}

fn parse_operation<T: DeserializeOwned>(params: JsonObject) -> Result<T> {
    serde_json::from_value(JsonValue::Object(params))
        .map_err(|e| Error::invalid_parameter(e.to_string()))
}

/// Route one request to its resource handler.
pub async fn dispatch(client: &ApiClient, request: OperationRequest) -> Result<Payload> {
    crate::log_startup_notice();

    let params = request.params;
    match request.resource {
        Resource::Address => address::execute(client, parse_operation(params)?).await,
        Resource::Asset => asset::execute(client, parse_operation(params)?).await,
        Resource::Compliance => compliance::execute(client, parse_operation(params)?).await,
        Resource::Document => document::execute(client, parse_operation(params)?).await,
        Resource::Driver => driver::execute(client, parse_operation(params)?).await,
        Resource::Route => route::execute(client, parse_operation(params)?).await,
        Resource::Safety => safety::execute(client, parse_operation(params)?).await,
        Resource::Sensor => sensor::execute(client, parse_operation(params)?).await,
        Resource::Tag => tag::execute(client, parse_operation(params)?).await,
        Resource::Vehicle => vehicle::execute(client, parse_operation(params)?).await,
        Resource::Webhook => webhook::execute(client, parse_operation(params)?).await,
    }
}

/// Execute a batch of requests strictly sequentially.
///
/// Each payload flattens to one output item per entity, paired with its
/// input index. With `continue_on_fail`, a failing item yields a single
/// error-shaped item and processing continues; otherwise the first failure
/// aborts the batch.
pub async fn run_items(
    client: &ApiClient,
    requests: Vec<OperationRequest>,
    continue_on_fail: bool,
) -> Result<Vec<OutputItem>> {
    let mut items = Vec::new();

    for (index, request) in requests.into_iter().enumerate() {
        match dispatch(client, request).await {
            Ok(payload) => {
                items.extend(payload.into_records().into_iter().map(|json| OutputItem {
                    json,
                    source_item: index,
                }));
            }
            Err(error) if continue_on_fail => {
                items.push(OutputItem {
                    json: serde_json::json!({"error": error.to_string()}),
                    source_item: index,
                });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(items)
}
