// rngbridge-api: Async Rust client for the RNG bridge device HTTP/JSON API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DeviceClient;
pub use error::{Error, FaultKind};
pub use models::{
    BatteryReading, ControllerReading, LoadReading, OutputReading, PvReading, StateResponse,
};
pub use transport::{DEFAULT_REQUEST_TIMEOUT, TransportConfig};
