//! Host platform seam.
//!
//! The home-automation host owns entity lifecycle, config entries and update
//! ticking. This module models just enough of it for the adapters to plug
//! into: the [`Entity`] contract every sensor implements, the namespaced
//! [`HostData`] store the setup functions read from, and the
//! [`EntityPlatform`] registry that collects entities and supervises their
//! updates.

mod host;
mod registry;

pub use host::{ConfigEntry, HostData};
pub use registry::{EntityPlatform, UpdateReport};

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;
use strum::{AsRefStr, Display};

/// Typed reading exposed as an entity's native value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NativeValue {
    /// Kept as sent, so large integers are not rounded through `f64`.
    Number(Number),
    Text(String),
    Bool(bool),
}

impl NativeValue {
    /// Map a raw `state.value` to a typed reading.
    ///
    /// `null` maps to `Ok(None)`. Objects and arrays are not sensor readings
    /// and are rejected with a short reason.
    pub fn from_state(value: &Value) -> std::result::Result<Option<Self>, &'static str> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(NativeValue::Bool(*b))),
            Value::Number(n) => Ok(Some(NativeValue::Number(n.clone()))),
            Value::String(s) => Ok(Some(NativeValue::Text(s.clone()))),
            Value::Array(_) => Err("array is not a sensor value"),
            Value::Object(_) => Err("object is not a sensor value"),
        }
    }

    /// `None` for NaN and infinities, which JSON cannot carry.
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(NativeValue::Number)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NativeValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        NativeValue::Number(value.into())
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::Text(value.to_string())
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Number(n) => write!(f, "{}", n),
            NativeValue::Text(s) => f.write_str(s),
            NativeValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Device class hint the host uses for icons and semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DeviceClass {
    Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StateClass {
    Measurement,
}

/// Contract every entity exposed to the host implements.
///
/// `unique_id` and `name` are fixed at construction. `native_value` reflects
/// only the entity's own cache, which only `update` rewrites.
#[async_trait]
pub trait Entity: Send + Sync {
    fn unique_id(&self) -> String;

    fn name(&self) -> String;

    fn native_value(&self) -> Option<NativeValue>;

    fn unit_of_measurement(&self) -> Option<&'static str> {
        None
    }

    fn device_class(&self) -> Option<DeviceClass> {
        None
    }

    fn state_class(&self) -> Option<StateClass> {
        None
    }

    /// Refresh the cached state from the device directory.
    async fn update(&mut self) -> Result<()>;
}
