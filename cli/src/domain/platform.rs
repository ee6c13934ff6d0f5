//! Strict decoding of platform API and sample-app responses, plus request
//! bodies for the `cf curl` calls the scenarios make.
//!
//! Pure functions only. A decode failure is an ordinary error value so probe
//! code can treat it as "not yet satisfied".

use cats_common::{CurlResponse, InstanceEndpoint, ResourceList, StatsResponse, VcapApplication};
use serde::de::DeserializeOwned;

use crate::domain::error::DecodeError;

fn decode<T: DeserializeOwned>(what: &'static str, body: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(|source| DecodeError::Malformed { what, source })
}

fn first_resource(what: &'static str, body: &[u8]) -> Result<cats_common::Resource, DecodeError> {
    let list: ResourceList = decode(what, body)?;
    list.resources
        .into_iter()
        .next()
        .ok_or(DecodeError::Missing {
            what,
            field: "resources",
        })
}

/// API path (`/v2/apps/<guid>`) of the first app in a `/v2/apps?q=name:` listing.
///
/// # Errors
///
/// Returns an error if the body is not a resource listing or is empty.
pub fn decode_app_url(body: &[u8]) -> Result<String, DecodeError> {
    Ok(first_resource("apps", body)?.metadata.url)
}

/// GUID of the first resource in a `/v2/apps` or `/v2/routes` listing.
///
/// # Errors
///
/// Returns an error if the body is not a resource listing or is empty.
pub fn decode_first_guid(what: &'static str, body: &[u8]) -> Result<String, DecodeError> {
    Ok(first_resource(what, body)?.metadata.guid)
}

/// Cell-private host and port of instance `0` from `/v2/apps/<guid>/stats`.
///
/// # Errors
///
/// Returns an error if the body is not a stats map or has no instance `0`.
pub fn decode_instance_endpoint(body: &[u8]) -> Result<InstanceEndpoint, DecodeError> {
    let mut stats: StatsResponse = decode("stats", body)?;
    stats
        .remove("0")
        .map(|instance| instance.stats)
        .ok_or(DecodeError::Missing {
            what: "stats",
            field: "instance 0",
        })
}

/// Result of the sample app's in-container curl.
///
/// # Errors
///
/// Returns an error if the body lacks `return_code` or is not JSON.
pub fn decode_curl_response(body: &[u8]) -> Result<CurlResponse, DecodeError> {
    decode("curl response", body)
}

/// Container port from the sample app's `/env/VCAP_APPLICATION`.
///
/// # Errors
///
/// Returns an error if the body lacks a numeric `port`.
pub fn decode_vcap_port(body: &[u8]) -> Result<u16, DecodeError> {
    let vcap: VcapApplication = decode("VCAP_APPLICATION", body)?;
    Ok(vcap.port)
}

/// `PUT /v2/apps/<guid>` body switching the app onto (or off) the diego backend.
#[must_use]
pub fn diego_update_body(enabled: bool) -> String {
    serde_json::json!({ "diego": enabled }).to_string()
}

/// `PUT /v2/apps/<guid>` body setting the ports an app listens on.
#[must_use]
pub fn ports_update_body(ports: &[u16]) -> String {
    serde_json::json!({ "ports": ports }).to_string()
}

/// `POST /v3/route_mappings` body mapping a route to one app port.
#[must_use]
pub fn route_mapping_body(app_guid: &str, route_guid: &str, app_port: u16) -> String {
    serde_json::json!({
        "relationships": {
            "app": { "guid": app_guid },
            "route": { "guid": route_guid },
        },
        "app_port": app_port,
    })
    .to_string()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
