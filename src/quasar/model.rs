//! Device and property records as returned by the Quasar cloud API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A device known to the cloud account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    /// Device type tag, e.g. `devices.types.sensor`.
    #[serde(rename = "type")]
    pub device_type: String,
}

impl Device {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            device_type: device_type.into(),
        }
    }
}

/// Current property readings for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl DeviceSnapshot {
    /// Properties whose instance equals `instance`, in snapshot order.
    pub fn instances<'a>(&'a self, instance: &'a str) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.parameters.instance == instance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub parameters: PropertyParameters,
    #[serde(default)]
    pub state: Option<PropertyState>,
    /// Epoch seconds of the last reported change.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_updated: Option<f64>,
}

impl Property {
    pub fn instance(&self) -> &str {
        &self.parameters.instance
    }

    /// Human-readable name, if the cloud sent one.
    pub fn name(&self) -> Option<&str> {
        self.parameters.name.as_deref()
    }

    /// Raw `state.value`. `None` when the state or its `value` key is missing;
    /// an explicit `null` comes back as `Some(Value::Null)`.
    pub fn value(&self) -> Option<&Value> {
        self.state.as_ref().and_then(|s| s.value.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyParameters {
    pub instance: String,
    /// Human-readable property name shown in the vendor app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyState {
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

/// Keeps an explicit `null` apart from a missing key.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// The cloud sends `last_updated` either as a number or as a numeric string.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
