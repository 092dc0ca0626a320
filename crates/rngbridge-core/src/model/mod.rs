// ── Domain model ──

pub mod charge_state;
pub mod snapshot;
pub mod value;

pub use charge_state::{ChargeState, PublishedState};
pub use snapshot::{DeviceSnapshot, fallback_properties};
pub use value::{PropertyValue, ValueKind};
