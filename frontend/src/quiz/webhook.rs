use gloo_net::http::Request;
use log::info;
use serde_json::{Map, Value};

use super::error::NetworkError;

/// POSTs the answers as JSON. The response body is never read; any
/// non-2xx status counts as a failed delivery.
pub async fn post_submission(url: &str, payload: &Map<String, Value>) -> Result<(), NetworkError> {
    let request = Request::post(url)
        .header("Content-Type", "application/json")
        .json(payload)
        .map_err(|e| NetworkError::Request(e.to_string()))?;

    let response = request
        .send()
        .await
        .map_err(|e| NetworkError::Request(e.to_string()))?;

    if !response.ok() {
        return Err(NetworkError::Status(response.status()));
    }
    info!("Quiz answers delivered");
    Ok(())
}
