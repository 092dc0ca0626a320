//! Bus object paths exposed by the bridge.

// ── Published electrical state (rewritten every cycle) ──

/// PV array voltage. Only meaningful for single-tracker products.
pub const PV_VOLTAGE: &str = "/Pv/V";
/// Total PV power in watts.
pub const YIELD_POWER: &str = "/Yield/Power";
/// Lifetime PV energy in kWh.
pub const YIELD_SYSTEM: &str = "/Yield/System";
/// Resettable PV energy in kWh.
pub const YIELD_USER: &str = "/Yield/User";
pub const STATE: &str = "/State";
pub const DC_VOLTAGE: &str = "/Dc/0/Voltage";
pub const DC_CURRENT: &str = "/Dc/0/Current";
pub const LOAD_STATE: &str = "/Load/State";
pub const LOAD_CURRENT: &str = "/Load/I";

/// Every path the sync loop writes, in publish order.
pub const PUBLISHED: [&str; 9] = [
    PV_VOLTAGE,
    YIELD_POWER,
    YIELD_SYSTEM,
    YIELD_USER,
    STATE,
    DC_VOLTAGE,
    DC_CURRENT,
    LOAD_STATE,
    LOAD_CURRENT,
];

// ── Cycle counter ──

pub const UPDATE_INDEX: &str = "/UpdateIndex";

// ── Management and identity (set once) ──

pub const MGMT_PROCESS_NAME: &str = "/Mgmt/ProcessName";
pub const MGMT_PROCESS_VERSION: &str = "/Mgmt/ProcessVersion";
pub const MGMT_CONNECTION: &str = "/Mgmt/Connection";
pub const DEVICE_INSTANCE: &str = "/DeviceInstance";
pub const PRODUCT_ID: &str = "/ProductId";
pub const PRODUCT_NAME: &str = "/ProductName";
pub const CUSTOM_NAME: &str = "/CustomName";
pub const LATENCY: &str = "/Latency";
pub const FIRMWARE_VERSION: &str = "/FirmwareVersion";
pub const HARDWARE_VERSION: &str = "/HardwareVersion";
pub const CONNECTED: &str = "/Connected";
pub const ROLE: &str = "/Role";
pub const SERIAL: &str = "/Serial";
pub const NR_OF_TRACKERS: &str = "/NrOfTrackers";
