//! Quasar sensors library.
//!
//! This library exposes Yandex Quasar smart-home sensors (motion,
//! temperature, humidity, pressure, illumination) as home-automation
//! platform entities.

pub mod config;
pub mod error;
pub mod platform;
pub mod quasar;
pub mod sensors;
