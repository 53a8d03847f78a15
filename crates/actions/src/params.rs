//! Raw action parameters split into configuration and turn payload.

use chatwhisk_config::{ConfigError, HelperConfig};
use chatwhisk_core::Payload;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct ActionParams {
    pub config: HelperConfig,
    pub payload: Payload,
}

impl ActionParams {
    /// Read `config` and `payload` from the parameters an action was invoked
    /// with. Either may be absent.
    pub fn from_value(params: &Value) -> Result<Self, ConfigError> {
        let config = HelperConfig::from_params(params)?;
        let payload = match params.get("payload") {
            None | Some(Value::Null) => Payload::empty(),
            Some(payload) => Payload::new(payload.clone()),
        };
        Ok(Self { config, payload })
    }
}
