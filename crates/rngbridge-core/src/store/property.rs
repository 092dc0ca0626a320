// ── A single bus property ──

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::format::Formatter;
use crate::model::PropertyValue;

/// A named, typed slot in the store.
///
/// The value is swapped atomically, so a reader racing a writer sees
/// either the old or the new value, never a mix.
pub struct Property {
    path: String,
    value: ArcSwap<PropertyValue>,
    formatter: Formatter,
    writable: bool,
}

impl Property {
    pub(crate) fn new(
        path: String,
        initial: PropertyValue,
        formatter: Formatter,
        writable: bool,
    ) -> Self {
        Self {
            path,
            value: ArcSwap::from_pointee(initial),
            formatter,
            writable,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Current value (cheap `Arc` clone).
    pub fn value(&self) -> Arc<PropertyValue> {
        self.value.load_full()
    }

    /// Current value rendered through the formatter.
    pub fn text(&self) -> String {
        (self.formatter)(self.value().as_ref())
    }

    /// Replace the value, returning the new `Arc` for notification.
    pub(crate) fn replace(&self, value: PropertyValue) -> Arc<PropertyValue> {
        let value = Arc::new(value);
        self.value.store(Arc::clone(&value));
        value
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("path", &self.path)
            .field("value", &self.value())
            .field("writable", &self.writable)
            .finish_non_exhaustive()
    }
}
