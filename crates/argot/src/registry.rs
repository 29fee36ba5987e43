//! Process-wide custom converter registry.
//!
//! Converters registered here are keyed by their output type and picked up
//! by any field of that type that has no matching attached converter. The
//! registry lives for the whole process; mutate it between `process` calls,
//! not during one.
//!
//! ```
//! use std::sync::Arc;
//! use argot::{registry, ConverterError, CustomConverter};
//!
//! #[derive(Debug, PartialEq)]
//! struct Celsius(f64);
//!
//! struct CelsiusConverter;
//!
//! impl CustomConverter for CelsiusConverter {
//!     type Output = Celsius;
//!
//!     fn convert(&self, _: &str, argument: &str, _: &str) -> Result<Celsius, ConverterError> {
//!         Ok(Celsius(argument.trim_end_matches('C').parse()?))
//!     }
//! }
//!
//! registry::add_converter(Arc::new(CelsiusConverter));
//! assert!(registry::has_converter::<Celsius>());
//! assert_eq!(
//!     registry::convert_with::<Celsius>("temp", "21.5C", ",").unwrap(),
//!     Celsius(21.5)
//! );
//! registry::remove_converter::<Celsius>();
//! ```

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::converter::{CustomConverter, ErasedConverter};
use crate::error::{ArgumentError, Result};

type Entries = HashMap<TypeId, Arc<dyn ErasedConverter>>;

static CONVERTERS: Lazy<Mutex<Entries>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn entries() -> MutexGuard<'static, Entries> {
    // A panic while holding the lock cannot leave the map half-updated.
    CONVERTERS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registers `converter` for its output type.
///
/// Adding the instance that is already registered is a no-op and returns
/// `false`. A different instance for the same type replaces the old one.
pub fn add_converter<C: CustomConverter>(converter: Arc<C>) -> bool {
    let key = TypeId::of::<C::Output>();
    let mut map = entries();

    if let Some(existing) = map.get(&key) {
        let same = existing
            .as_any()
            .downcast_ref::<C>()
            .is_some_and(|existing| std::ptr::eq(existing, Arc::as_ptr(&converter)));
        if same {
            return false;
        }
    }

    debug!(output = type_name::<C::Output>(), "converter registered");
    map.insert(key, converter as Arc<dyn ErasedConverter>);
    true
}

/// Removes the converter registered for `T`. Returns `true` if one existed.
pub fn remove_converter<T: ?Sized + 'static>() -> bool {
    let removed = entries().remove(&TypeId::of::<T>()).is_some();
    if removed {
        debug!(output = type_name::<T>(), "converter removed");
    }
    removed
}

/// Returns `true` if a converter is registered for `T`.
pub fn has_converter<T: ?Sized + 'static>() -> bool {
    entries().contains_key(&TypeId::of::<T>())
}

/// Removes every registered converter.
pub fn clear_converters() {
    entries().clear();
}

/// Converts `argument` with the converter registered for `T`.
///
/// Fails with [`ArgumentError::CustomConverter`] if none is registered or
/// the converter fails.
pub fn convert_with<T: 'static>(parameter: &str, argument: &str, delimiter: &str) -> Result<T> {
    let converter = lookup(TypeId::of::<T>()).ok_or_else(|| {
        ArgumentError::converter(
            parameter,
            format!("no converter registered for {}", type_name::<T>()),
        )
    })?;

    let value = converter
        .convert_boxed(parameter, argument, delimiter)
        .map_err(|error| ArgumentError::from_converter(parameter, error))?;

    value
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| ArgumentError::converter(parameter, "converter produced an unexpected type"))
}

/// Looks up a converter by output type. The lock is released on return.
pub(crate) fn lookup(output: TypeId) -> Option<Arc<dyn ErasedConverter>> {
    entries().get(&output).cloned()
}
