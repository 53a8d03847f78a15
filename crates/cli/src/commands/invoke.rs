//! `chatwhisk invoke` — Invoke a packaged action through OpenWhisk.

use chatwhisk_actions::{ActionClient, OpenWhiskInvoker};
use chatwhisk_config::HelperConfig;
use serde_json::{Map, Value};
use std::sync::Arc;

pub async fn run(
    action: &str,
    params: Option<&str>,
    no_wait: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = HelperConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let params = parse_params(params)?;

    let invoker = OpenWhiskInvoker::new(&config.openwhisk)?;
    let client = ActionClient::new(Arc::new(invoker), config.openwhisk.clone());
    tracing::debug!(action = %client.action_name(action), no_wait, "Invoking from the command line");

    let response = if no_wait {
        client.cast(action, params).await?
    } else {
        client.call(action, params).await?
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} answered with status {}",
            client.action_name(action),
            response.status_code
        )
        .into())
    }
}

/// Parameters must be a JSON object; none means `{}`.
fn parse_params(raw: Option<&str>) -> Result<Value, String> {
    let Some(raw) = raw else {
        return Ok(Value::Object(Map::new()));
    };
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(Value::Object(map)),
        Ok(_) => Err("--params must be a JSON object".into()),
        Err(e) => Err(format!("--params is not valid JSON: {e}")),
    }
}
