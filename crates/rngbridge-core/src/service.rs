// ── Bus service registration ──
//
// Creates every property the bridge exposes, once, before the first sync
// cycle. Published paths get type-consistent zero values so that the
// first successful cycle never changes a path's type family.

use crate::config::ServiceIdentity;
use crate::error::CoreError;
use crate::model::PropertyValue;
use crate::paths;
use crate::store::{Formatter, PropertyStore, format};

/// Firmware version reported on `/FirmwareVersion`.
const FIRMWARE_VERSION: f64 = 0.2;

/// Device-backed paths with their initial values and formatters.
fn published_properties() -> [(&'static str, PropertyValue, Formatter); 9] {
    [
        (paths::PV_VOLTAGE, PropertyValue::Float(0.0), format::volts),
        (paths::YIELD_POWER, PropertyValue::Float(0.0), format::watts),
        (
            paths::YIELD_SYSTEM,
            PropertyValue::Float(0.0),
            format::kilowatt_hours,
        ),
        (
            paths::YIELD_USER,
            PropertyValue::Float(0.0),
            format::kilowatt_hours,
        ),
        (paths::STATE, PropertyValue::Int(0), format::plain),
        (paths::DC_VOLTAGE, PropertyValue::Float(0.0), format::volts),
        (paths::DC_CURRENT, PropertyValue::Float(0.0), format::amps),
        (paths::LOAD_STATE, PropertyValue::Bool(false), format::on_off),
        (paths::LOAD_CURRENT, PropertyValue::Float(0.0), format::amps),
    ]
}

/// Register management, identity, counter and published paths.
///
/// All paths are writable by bus clients, matching the solarcharger
/// service contract.
pub fn register_service(store: &PropertyStore, identity: &ServiceIdentity) -> Result<(), CoreError> {
    let metadata: [(&str, PropertyValue); 15] = [
        (paths::MGMT_PROCESS_NAME, identity.process_name.as_str().into()),
        (
            paths::MGMT_PROCESS_VERSION,
            identity.process_version.as_str().into(),
        ),
        (paths::MGMT_CONNECTION, identity.connection.as_str().into()),
        (paths::DEVICE_INSTANCE, identity.device_instance.into()),
        (paths::PRODUCT_ID, PropertyValue::Int(0)),
        (paths::PRODUCT_NAME, identity.product_name.as_str().into()),
        (paths::CUSTOM_NAME, identity.custom_name.as_str().into()),
        (paths::LATENCY, PropertyValue::Empty),
        (paths::FIRMWARE_VERSION, FIRMWARE_VERSION.into()),
        (paths::HARDWARE_VERSION, PropertyValue::Int(0)),
        (paths::CONNECTED, PropertyValue::Int(1)),
        (paths::ROLE, "solarcharger".into()),
        (paths::SERIAL, identity.serial.as_str().into()),
        (paths::UPDATE_INDEX, PropertyValue::Int(0)),
        (paths::NR_OF_TRACKERS, PropertyValue::Int(1)),
    ];

    for (path, value) in metadata {
        store.register(path, value, format::plain, true)?;
    }

    for (path, initial, formatter) in published_properties() {
        store.register(path, initial, formatter, true)?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::snapshot::fallback_properties;

    fn registered() -> PropertyStore {
        let store = PropertyStore::new();
        let identity = ServiceIdentity::new(40, "Shed MPPT".into(), "RNG-0001".into());
        register_service(&store, &identity).unwrap();
        store
    }

    #[test]
    fn registers_identity_paths() {
        let store = registered();
        assert_eq!(*store.get(paths::DEVICE_INSTANCE).unwrap(), PropertyValue::Int(40));
        assert_eq!(
            *store.get(paths::CUSTOM_NAME).unwrap(),
            PropertyValue::from("Shed MPPT")
        );
        assert_eq!(*store.get(paths::SERIAL).unwrap(), PropertyValue::from("RNG-0001"));
        assert_eq!(*store.get(paths::UPDATE_INDEX).unwrap(), PropertyValue::Int(0));
        assert!(store.get(paths::LATENCY).unwrap().is_empty());
    }

    #[test]
    fn every_published_path_exists_before_first_cycle() {
        let store = registered();
        for path in paths::PUBLISHED {
            assert!(store.contains(path), "{path} missing");
        }
        assert_eq!(store.len(), 24);
    }

    #[test]
    fn initial_values_share_kind_with_fallbacks() {
        let store = registered();
        for (path, fallback) in fallback_properties() {
            assert_eq!(store.get(path).unwrap().kind(), fallback.kind(), "{path}");
        }
    }

    #[test]
    fn registering_twice_fails() {
        let store = registered();
        let identity = ServiceIdentity::new(40, "x".into(), "y".into());
        assert!(matches!(
            register_service(&store, &identity),
            Err(CoreError::DuplicatePath { .. })
        ));
    }
}
