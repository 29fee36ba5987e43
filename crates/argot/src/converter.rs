//! Custom converters.
//!
//! A field may attach a [`CustomConverter`] through a [`ConverterRef`], or a
//! converter may be registered process-wide for the field's type (see the
//! [`registry`](crate::registry) module). Resolution happens once per
//! binding; a converter whose output type differs from the field type is
//! dropped silently and the built-in conversion applies instead.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ArgumentError, ConverterError, Result};
use crate::field::FieldSpec;
use crate::field_type::BoxedValue;
use crate::registry;

/// Converts a raw argument into a value of [`Self::Output`].
///
/// # Example
///
/// ```
/// use argot::{ConverterError, CustomConverter};
///
/// #[derive(Default)]
/// struct Numbers;
///
/// impl CustomConverter for Numbers {
///     type Output = Vec<i32>;
///
///     fn convert(&self, _parameter: &str, argument: &str, delimiter: &str)
///         -> Result<Vec<i32>, ConverterError>
///     {
///         argument
///             .split(delimiter)
///             .map(|part| part.trim().parse::<i32>().map_err(Into::into))
///             .collect()
///     }
/// }
///
/// assert_eq!(Numbers.convert("n", "1, 2,3", ",").unwrap(), vec![1, 2, 3]);
/// ```
pub trait CustomConverter: Send + Sync + 'static {
    /// The produced field type.
    type Output: Send + 'static;

    /// Converts `argument`, given for `parameter`, splitting composite
    /// values on `delimiter` where that makes sense.
    fn convert(
        &self,
        parameter: &str,
        argument: &str,
        delimiter: &str,
    ) -> std::result::Result<Self::Output, ConverterError>;
}

/// Object-safe view of a [`CustomConverter`].
pub(crate) trait ErasedConverter: Send + Sync {
    fn output_type(&self) -> TypeId;
    fn output_name(&self) -> &'static str;
    fn convert_boxed(
        &self,
        parameter: &str,
        argument: &str,
        delimiter: &str,
    ) -> std::result::Result<BoxedValue, ConverterError>;
    fn as_any(&self) -> &dyn Any;
}

impl<C: CustomConverter> ErasedConverter for C {
    fn output_type(&self) -> TypeId {
        TypeId::of::<C::Output>()
    }

    fn output_name(&self) -> &'static str {
        type_name::<C::Output>()
    }

    fn convert_boxed(
        &self,
        parameter: &str,
        argument: &str,
        delimiter: &str,
    ) -> std::result::Result<BoxedValue, ConverterError> {
        self.convert(parameter, argument, delimiter)
            .map(|value| Box::new(value) as BoxedValue)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Reference to a converter type attached to a field.
///
/// Records the converter's output type so resolution can reject a mismatch
/// without building the converter.
#[derive(Clone, Copy)]
pub struct ConverterRef {
    output: TypeId,
    output_name: &'static str,
    converter_name: &'static str,
    build: fn() -> Arc<dyn ErasedConverter>,
}

impl ConverterRef {
    /// Creates a reference to converter type `C`.
    pub fn of<C: CustomConverter + Default>() -> Self {
        fn build<C: CustomConverter + Default>() -> Arc<dyn ErasedConverter> {
            Arc::new(C::default())
        }

        ConverterRef {
            output: TypeId::of::<C::Output>(),
            output_name: type_name::<C::Output>(),
            converter_name: type_name::<C>(),
            build: build::<C>,
        }
    }

    /// Name of the converter type.
    pub fn converter_name(&self) -> &'static str {
        self.converter_name
    }

    /// Name of the produced type.
    pub fn output_name(&self) -> &'static str {
        self.output_name
    }

    /// Returns `true` if the converter produces a `T`.
    pub fn produces<T: ?Sized + 'static>(&self) -> bool {
        self.output == TypeId::of::<T>()
    }
}

impl fmt::Debug for ConverterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRef")
            .field("converter", &self.converter_name)
            .field("output", &self.output_name)
            .finish()
    }
}

/// A converter resolved for one binding.
#[derive(Clone)]
pub struct ResolvedConverter {
    inner: Arc<dyn ErasedConverter>,
    source: ConverterSource,
}

/// Where a resolved converter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterSource {
    /// Attached to the field declaration.
    Attached,
    /// Looked up in the process-wide registry.
    Registry,
}

impl ResolvedConverter {
    pub(crate) fn new(inner: Arc<dyn ErasedConverter>, source: ConverterSource) -> Self {
        ResolvedConverter { inner, source }
    }

    /// Where this converter came from.
    pub fn source(&self) -> ConverterSource {
        self.source
    }

    /// Name of the produced type.
    pub fn output_name(&self) -> &'static str {
        self.inner.output_name()
    }

    /// Returns `true` if this is an instance of converter type `C`.
    pub fn is<C: CustomConverter>(&self) -> bool {
        self.inner.as_any().is::<C>()
    }

    pub(crate) fn invoke(
        &self,
        parameter: &str,
        argument: &str,
        delimiter: &str,
    ) -> Result<BoxedValue> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.inner.convert_boxed(parameter, argument, delimiter)
        }));
        match outcome {
            Ok(converted) => {
                converted.map_err(|error| ArgumentError::from_converter(parameter, error))
            }
            Err(_) => {
                debug!(parameter, converter = self.inner.output_name(), "converter panicked");
                Err(ArgumentError::converter(parameter, "converter panicked"))
            }
        }
    }
}

impl fmt::Debug for ResolvedConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConverter")
            .field("output", &self.inner.output_name())
            .field("source", &self.source)
            .finish()
    }
}

/// Resolves the converter for a field declaration.
///
/// The attached reference wins when its output type matches the field type;
/// otherwise the registry is consulted. Any mismatch yields `None`.
pub(crate) fn resolve(spec: &FieldSpec) -> Option<ResolvedConverter> {
    if let Some(reference) = &spec.converter {
        if reference.output == spec.type_id {
            let Ok(inner) = catch_unwind(reference.build) else {
                debug!(
                    field = %spec.name,
                    converter = reference.converter_name,
                    "attached converter could not be built"
                );
                return None;
            };
            debug!(
                field = %spec.name,
                converter = reference.converter_name,
                "attached converter resolved"
            );
            return Some(ResolvedConverter::new(inner, ConverterSource::Attached));
        }
        debug!(
            field = %spec.name,
            converter = reference.converter_name,
            produces = reference.output_name,
            expected = spec.type_name,
            "attached converter ignored, output type does not match field"
        );
    }

    registry::lookup(spec.type_id).map(|inner| {
        debug!(field = %spec.name, "registered converter resolved");
        ResolvedConverter::new(inner, ConverterSource::Registry)
    })
}

/// Invokes a possibly missing converter.
///
/// Fails with [`ArgumentError::CustomConverter`] when `converter` is `None`.
pub(crate) fn invoke(
    converter: Option<&ResolvedConverter>,
    parameter: &str,
    argument: &str,
    delimiter: &str,
) -> Result<BoxedValue> {
    match converter {
        Some(converter) => converter.invoke(parameter, argument, delimiter),
        None => Err(ArgumentError::converter(
            parameter,
            "no custom converter available",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Default)]
    struct Doubler;

    impl CustomConverter for Doubler {
        type Output = i32;

        fn convert(
            &self,
            _parameter: &str,
            argument: &str,
            _delimiter: &str,
        ) -> std::result::Result<i32, ConverterError> {
            Ok(argument.trim().parse::<i32>()? * 2)
        }
    }

    #[derive(Default)]
    struct Words;

    impl CustomConverter for Words {
        type Output = Vec<String>;

        fn convert(
            &self,
            _parameter: &str,
            argument: &str,
            delimiter: &str,
        ) -> std::result::Result<Vec<String>, ConverterError> {
            Ok(argument.split(delimiter).map(str::to_string).collect())
        }
    }

    #[test]
    fn attached_converter_resolves_when_types_match() {
        let spec = FieldSpec::option::<i32>("level").converter::<Doubler>();
        let resolved = resolve(&spec).expect("converter");
        assert_eq!(resolved.source(), ConverterSource::Attached);
        assert!(resolved.is::<Doubler>());

        let value = resolved.invoke("level", "21", ",").unwrap();
        assert_eq!(*value.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn attached_converter_with_other_output_is_ignored() {
        let spec = FieldSpec::option::<i64>("level").converter::<Doubler>();
        assert!(resolve(&spec).is_none());
    }

    #[test]
    fn converter_errors_are_wrapped() {
        let spec = FieldSpec::option::<i32>("level").converter::<Doubler>();
        let resolved = resolve(&spec).unwrap();
        let err = resolved.invoke("level", "abc", ",").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CustomConverter);
    }

    #[test]
    fn invoking_without_converter_fails() {
        let err = invoke(None, "level", "1", ",").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CustomConverter);
    }

    #[test]
    fn converter_ref_reports_output() {
        let reference = ConverterRef::of::<Words>();
        assert!(reference.produces::<Vec<String>>());
        assert!(!reference.produces::<String>());
    }
}
