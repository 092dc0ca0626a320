// ── Text formatters ──
//
// Pure renderers used for the bus `GetText` view of a property. They must
// accept any value, since external writers are not type-checked.

use crate::model::PropertyValue;

/// Renders a property value as human-readable text.
pub type Formatter = fn(&PropertyValue) -> String;

pub fn volts(value: &PropertyValue) -> String {
    with_unit(value, 1, "V")
}

pub fn amps(value: &PropertyValue) -> String {
    with_unit(value, 1, "A")
}

pub fn watts(value: &PropertyValue) -> String {
    with_unit(value, 1, "W")
}

pub fn kilowatt_hours(value: &PropertyValue) -> String {
    with_unit(value, 2, "KWh")
}

pub fn plain(value: &PropertyValue) -> String {
    value.to_string()
}

/// `On`/`Off` for booleans and 0/1 integers.
pub fn on_off(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Bool(true) => "On".into(),
        PropertyValue::Bool(false) | PropertyValue::Int(0) => "Off".into(),
        PropertyValue::Int(_) => "On".into(),
        other => other.to_string(),
    }
}

fn with_unit(value: &PropertyValue, decimals: usize, unit: &str) -> String {
    match value.as_f64() {
        Some(v) => format!("{v:.decimals$} {unit}"),
        None => value.to_string(),
    }
}
