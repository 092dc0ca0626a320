// ── Device snapshot ──
//
// Typed projection of one successful `state` fetch. Lives for a single
// sync cycle and is immediately written into the property store.

use rngbridge_api::StateResponse;

use super::charge_state::ChargeState;
use super::value::PropertyValue;
use crate::error::CoreError;
use crate::paths;

/// Raw energy counters are in Wh; the bus publishes kWh.
const WH_PER_KWH: f64 = 1000.0;

/// Decoded measurements from one successful fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceSnapshot {
    pub pv_voltage: f64,
    pub pv_current: f64,
    pub battery_voltage: f64,
    pub battery_current: f64,
    /// Lifetime yield, raw device units (Wh).
    pub total_yield_raw: f64,
    /// Recent yield, raw device units (Wh).
    pub generated_yield_raw: f64,
    pub load_on: bool,
    pub load_current: f64,
    pub charge_state: ChargeState,
}

impl DeviceSnapshot {
    /// Instantaneous PV power, unrounded.
    pub fn pv_power(&self) -> f64 {
        self.pv_voltage * self.pv_current
    }

    pub fn system_yield_kwh(&self) -> f64 {
        self.total_yield_raw / WH_PER_KWH
    }

    pub fn user_yield_kwh(&self) -> f64 {
        self.generated_yield_raw / WH_PER_KWH
    }

    /// Values for every published path, in [`paths::PUBLISHED`] order.
    pub fn to_properties(&self) -> [(&'static str, PropertyValue); 9] {
        [
            (paths::PV_VOLTAGE, self.pv_voltage.into()),
            (paths::YIELD_POWER, self.pv_power().into()),
            (paths::YIELD_SYSTEM, self.system_yield_kwh().into()),
            (paths::YIELD_USER, self.user_yield_kwh().into()),
            (paths::STATE, self.charge_state.published().code().into()),
            (paths::DC_VOLTAGE, self.battery_voltage.into()),
            (paths::DC_CURRENT, self.battery_current.into()),
            (paths::LOAD_STATE, self.load_on.into()),
            (paths::LOAD_CURRENT, self.load_current.into()),
        ]
    }
}

impl TryFrom<&StateResponse> for DeviceSnapshot {
    type Error = CoreError;

    fn try_from(state: &StateResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            pv_voltage: state.pv.voltage,
            pv_current: state.pv.current,
            battery_voltage: state.battery.voltage,
            battery_current: state.battery.current,
            total_yield_raw: state.battery.total_yield,
            generated_yield_raw: state.battery.generated_yield,
            load_on: state.output.load,
            load_current: state.load.current,
            charge_state: ChargeState::from_code(state.controller.state)?,
        })
    }
}

/// Safe defaults published while the device is unreachable.
pub fn fallback_properties() -> [(&'static str, PropertyValue); 9] {
    [
        (paths::PV_VOLTAGE, PropertyValue::Float(0.0)),
        (paths::YIELD_POWER, PropertyValue::Float(0.0)),
        (paths::YIELD_SYSTEM, PropertyValue::Float(0.0)),
        (paths::YIELD_USER, PropertyValue::Float(0.0)),
        (paths::STATE, PropertyValue::Int(0)),
        (paths::DC_VOLTAGE, PropertyValue::Float(0.0)),
        (paths::DC_CURRENT, PropertyValue::Float(0.0)),
        (paths::LOAD_STATE, PropertyValue::Bool(false)),
        (paths::LOAD_CURRENT, PropertyValue::Float(0.0)),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;
    use rngbridge_api::{
        BatteryReading, ControllerReading, LoadReading, OutputReading, PvReading,
    };

    use super::*;

    fn state(code: i64) -> StateResponse {
        StateResponse {
            pv: PvReading {
                voltage: 40.0,
                current: 5.0,
            },
            controller: ControllerReading { state: code },
            battery: BatteryReading {
                total_yield: 123_000.0,
                generated_yield: 4500.0,
                voltage: 26.0,
                current: 4.8,
            },
            output: OutputReading { load: true },
            load: LoadReading { current: 1.2 },
        }
    }

    #[test]
    fn derived_values() {
        let snap = DeviceSnapshot::try_from(&state(3)).unwrap();
        assert_eq!(snap.pv_power(), 200.0);
        assert_eq!(snap.system_yield_kwh(), 123.0);
        assert_eq!(snap.user_yield_kwh(), 4.5);
        assert_eq!(snap.charge_state, ChargeState::Bulk);
    }

    #[test]
    fn yield_division_is_exact() {
        let mut s = state(0);
        s.battery.total_yield = 12_345.0;
        let snap = DeviceSnapshot::try_from(&s).unwrap();
        assert_eq!(snap.system_yield_kwh(), 12.345);
    }

    #[test]
    fn power_is_not_rounded() {
        let mut s = state(0);
        s.pv.voltage = 38.7;
        s.pv.current = 3.33;
        let snap = DeviceSnapshot::try_from(&s).unwrap();
        assert_eq!(snap.pv_power(), 38.7 * 3.33);
    }

    #[test]
    fn unknown_charge_state_fails_the_snapshot() {
        let err = DeviceSnapshot::try_from(&state(9)).unwrap_err();
        assert!(matches!(err, CoreError::UnknownChargeState { code: 9 }));
    }

    #[test]
    fn properties_follow_published_order() {
        let snap = DeviceSnapshot::try_from(&state(3)).unwrap();
        let published: Vec<&str> = snap.to_properties().iter().map(|(p, _)| *p).collect();
        assert_eq!(published, paths::PUBLISHED.to_vec());

        let fallback: Vec<&str> = fallback_properties().iter().map(|(p, _)| *p).collect();
        assert_eq!(fallback, paths::PUBLISHED.to_vec());
    }
}
