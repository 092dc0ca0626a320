// ── Bus property store ──
//
// Named properties with atomic per-value swaps and push-based change
// notification.

pub mod format;
mod property;
mod property_store;

pub use format::Formatter;
pub use property::Property;
pub use property_store::{ChangeOrigin, PropertyChange, PropertyReader, PropertyStore};
