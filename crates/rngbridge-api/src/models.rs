// Wire types for the device's `state` endpoint.
//
// The firmware uses one- and two-letter keys to keep payloads small on
// the ESP side. Fields not listed here are ignored.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Decoded body of `GET {base}/state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResponse {
    #[serde(rename = "p")]
    pub pv: PvReading,
    #[serde(rename = "c")]
    pub controller: ControllerReading,
    #[serde(rename = "b")]
    pub battery: BatteryReading,
    #[serde(rename = "o")]
    pub output: OutputReading,
    #[serde(rename = "l")]
    pub load: LoadReading,
}

/// PV array input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvReading {
    #[serde(rename = "vo")]
    pub voltage: f64,
    #[serde(rename = "cu")]
    pub current: f64,
}

/// Charge controller status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerReading {
    /// Raw charge state code. Signed so that out-of-range values reach the
    /// mapping layer instead of failing as a shape error.
    #[serde(rename = "st")]
    pub state: i64,
}

/// Battery side, including the energy counters (Wh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Lifetime yield in Wh.
    #[serde(rename = "to")]
    pub total_yield: f64,
    /// Recent (resettable) yield in Wh.
    #[serde(rename = "ge")]
    pub generated_yield: f64,
    #[serde(rename = "vo")]
    pub voltage: f64,
    #[serde(rename = "cu")]
    pub current: f64,
}

/// Switched outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReading {
    #[serde(rename = "l", deserialize_with = "bool_or_flag")]
    pub load: bool,
}

/// Load output measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadReading {
    #[serde(rename = "cu")]
    pub current: f64,
}

/// Accepts `true`/`false` as well as the `0`/`1` some firmware builds emit.
fn bool_or_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(de::Error::custom(format!("invalid load flag {n}"))),
    }
}
