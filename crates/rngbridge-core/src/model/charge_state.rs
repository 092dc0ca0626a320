// ── Charge state mapping ──
//
// Device-reported charge controller states and the bus-facing state codes
// they are published as. The table below is the literal mapping shipped
// with the bridge; the bus-side names it lands on do not match the device
// meanings for codes 2, 3 and 6 (see DESIGN.md). Keep the array as-is
// until the vendor documents the intended mapping.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr};

use crate::error::CoreError;

/// Charge state as reported by the device (`c.st`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum ChargeState {
    Off = 0,
    /// Never observed in practice.
    ChargingActivated = 1,
    Fault = 2,
    Bulk = 3,
    Absorption = 4,
    Float = 5,
    Storage = 6,
}

/// Charger state as published on `/State`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum PublishedState {
    Off = 0,
    MpptCharging = 2,
    Equalizing = 3,
    Boost = 4,
    Floating = 5,
    CurrentLimiting = 7,
}

/// Indexed by device code: `[0, 0, 3, 7, 4, 5, 2]`.
const PUBLISHED_STATE_TABLE: [PublishedState; 7] = [
    PublishedState::Off,
    PublishedState::Off,
    PublishedState::Equalizing,
    PublishedState::CurrentLimiting,
    PublishedState::Boost,
    PublishedState::Floating,
    PublishedState::MpptCharging,
];

impl ChargeState {
    /// Decode a raw device code. Anything outside 0-6 is rejected.
    pub fn from_code(code: i64) -> Result<Self, CoreError> {
        u8::try_from(code)
            .ok()
            .and_then(Self::from_repr)
            .ok_or(CoreError::UnknownChargeState { code })
    }

    #[allow(clippy::as_conversions)]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Bus-facing state for this device state.
    pub fn published(self) -> PublishedState {
        PUBLISHED_STATE_TABLE[usize::from(self.code())]
    }
}

impl PublishedState {
    #[allow(clippy::as_conversions)]
    pub fn code(self) -> u8 {
        self as u8
    }
}
