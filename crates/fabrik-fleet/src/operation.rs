//! Broker-internal operations smuggled through request parameters

use serde_json::Value;

/// Parameter key marking a broker-internal operation
pub const BROKER_OPERATION_PARAMETER: &str = "service-fabrik-operation";

/// Does the request carry a broker-internal operation token?
///
/// `request` is an update/provision body; the marker lives in its
/// `parameters` object.
pub fn is_broker_operation(request: &Value) -> bool {
    request
        .get("parameters")
        .and_then(Value::as_object)
        .is_some_and(|params| params.contains_key(BROKER_OPERATION_PARAMETER))
}
