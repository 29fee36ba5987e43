//! Declared field types.
//!
//! The processor never inspects a target struct directly. Each field is
//! described by a [`FieldType`], classified once from the Rust type through
//! its `TypeId`, and values travel to the field as a type-erased
//! [`BoxedValue`].

use std::any::{type_name, Any, TypeId};
use std::fmt;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::error::{ArgumentError, Result};

/// Type-erased value handed to a field setter.
pub type BoxedValue = Box<dyn Any + Send>;

/// Scalar types a field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    String,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    DateTime,
}

impl Primitive {
    /// Returns `true` for the integer primitives.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Primitive::U8
                | Primitive::I16
                | Primitive::U16
                | Primitive::I32
                | Primitive::U32
                | Primitive::I64
                | Primitive::U64
        )
    }

    /// Returns `true` for `f32`, `f64` and decimal.
    pub fn is_fractional(self) -> bool {
        matches!(self, Primitive::F32 | Primitive::F64 | Primitive::Decimal)
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::String => "string",
            Primitive::U8 => "u8",
            Primitive::I16 => "i16",
            Primitive::U16 => "u16",
            Primitive::I32 => "i32",
            Primitive::U32 => "u32",
            Primitive::I64 => "i64",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Decimal => "decimal",
            Primitive::DateTime => "date-time",
        }
    }
}

/// Container shape of a verbal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceShape {
    /// `Vec<String>`
    List,
    /// `Box<[String]>`
    Array,
}

/// Classification of a field's Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A plain primitive, e.g. `i32`.
    Value(Primitive),
    /// An `Option` of a primitive, e.g. `Option<i32>`.
    Nullable(Primitive),
    /// A sequence of strings.
    Sequence(SequenceShape),
    /// Anything else; carries the Rust type name.
    Unsupported(&'static str),
}

macro_rules! type_table {
    ($($ty:ty => $prim:ident),* $(,)?) => {
        vec![
            $(
                (TypeId::of::<$ty>(), FieldType::Value(Primitive::$prim)),
                (TypeId::of::<Option<$ty>>(), FieldType::Nullable(Primitive::$prim)),
            )*
            (TypeId::of::<Vec<String>>(), FieldType::Sequence(SequenceShape::List)),
            (TypeId::of::<Box<[String]>>(), FieldType::Sequence(SequenceShape::Array)),
        ]
    };
}

static TYPE_TABLE: Lazy<Vec<(TypeId, FieldType)>> = Lazy::new(|| {
    type_table! {
        bool => Bool,
        char => Char,
        String => String,
        u8 => U8,
        i16 => I16,
        u16 => U16,
        i32 => I32,
        u32 => U32,
        i64 => I64,
        u64 => U64,
        f32 => F32,
        f64 => F64,
        Decimal => Decimal,
        NaiveDateTime => DateTime,
    }
});

impl FieldType {
    /// Classifies the Rust type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_type_id(TypeId::of::<T>(), type_name::<T>())
    }

    /// Classifies a type by id, falling back to `Unsupported(name)`.
    pub fn from_type_id(id: TypeId, name: &'static str) -> Self {
        TYPE_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, ty)| *ty)
            .unwrap_or(FieldType::Unsupported(name))
    }

    /// The primitive behind `Value` and `Nullable`.
    pub fn primitive(self) -> Option<Primitive> {
        match self {
            FieldType::Value(p) | FieldType::Nullable(p) => Some(p),
            _ => None,
        }
    }

    /// Returns `true` for `bool` and `Option<bool>`.
    pub fn is_boolean(self) -> bool {
        self.primitive() == Some(Primitive::Bool)
    }

    /// Returns `true` for `Option<_>` primitives.
    pub fn is_nullable(self) -> bool {
        matches!(self, FieldType::Nullable(_))
    }

    /// Returns `true` for string sequences.
    pub fn is_sequence(self) -> bool {
        matches!(self, FieldType::Sequence(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Value(p) => f.write_str(p.name()),
            FieldType::Nullable(p) => write!(f, "optional {}", p.name()),
            FieldType::Sequence(SequenceShape::List) => f.write_str("string list"),
            FieldType::Sequence(SequenceShape::Array) => f.write_str("string array"),
            FieldType::Unsupported(name) => f.write_str(name),
        }
    }
}

/// Boxes `value` as `T` or `Option<T>` depending on nullability.
pub(crate) fn box_scalar<T: Send + 'static>(value: T, nullable: bool) -> BoxedValue {
    if nullable {
        Box::new(Some(value))
    } else {
        Box::new(value)
    }
}

/// Boxes a `None` for the nullable primitive `p`.
pub(crate) fn box_none(p: Primitive) -> BoxedValue {
    match p {
        Primitive::Bool => Box::new(None::<bool>),
        Primitive::Char => Box::new(None::<char>),
        Primitive::String => Box::new(None::<String>),
        Primitive::U8 => Box::new(None::<u8>),
        Primitive::I16 => Box::new(None::<i16>),
        Primitive::U16 => Box::new(None::<u16>),
        Primitive::I32 => Box::new(None::<i32>),
        Primitive::U32 => Box::new(None::<u32>),
        Primitive::I64 => Box::new(None::<i64>),
        Primitive::U64 => Box::new(None::<u64>),
        Primitive::F32 => Box::new(None::<f32>),
        Primitive::F64 => Box::new(None::<f64>),
        Primitive::Decimal => Box::new(None::<Decimal>),
        Primitive::DateTime => Box::new(None::<NaiveDateTime>),
    }
}

/// Boxes a list of strings in the given shape.
pub(crate) fn box_sequence(values: Vec<String>, shape: SequenceShape) -> BoxedValue {
    match shape {
        SequenceShape::List => Box::new(values),
        SequenceShape::Array => Box::new(values.into_boxed_slice()),
    }
}

/// Stores a boxed value into `slot`.
///
/// Fails with [`ArgumentError::Assignment`] when the value is not a `T`.
/// Generated setters call this for every field.
pub fn assign_boxed<T: 'static>(slot: &mut T, field: &str, value: BoxedValue) -> Result<()> {
    match value.downcast::<T>() {
        Ok(value) => {
            *slot = *value;
            Ok(())
        }
        Err(_) => Err(ArgumentError::Assignment {
            field: field.to_string(),
            expected: type_name::<T>(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_primitives() {
        assert_eq!(FieldType::of::<i32>(), FieldType::Value(Primitive::I32));
        assert_eq!(FieldType::of::<u8>(), FieldType::Value(Primitive::U8));
        assert_eq!(FieldType::of::<String>(), FieldType::Value(Primitive::String));
        assert_eq!(
            FieldType::of::<Decimal>(),
            FieldType::Value(Primitive::Decimal)
        );
    }

    #[test]
    fn classifies_nullables() {
        assert_eq!(
            FieldType::of::<Option<bool>>(),
            FieldType::Nullable(Primitive::Bool)
        );
        assert_eq!(
            FieldType::of::<Option<NaiveDateTime>>(),
            FieldType::Nullable(Primitive::DateTime)
        );
    }

    #[test]
    fn classifies_sequences() {
        assert_eq!(
            FieldType::of::<Vec<String>>(),
            FieldType::Sequence(SequenceShape::List)
        );
        assert_eq!(
            FieldType::of::<Box<[String]>>(),
            FieldType::Sequence(SequenceShape::Array)
        );
    }

    #[test]
    fn unknown_types_are_unsupported() {
        assert!(matches!(
            FieldType::of::<Vec<i32>>(),
            FieldType::Unsupported(_)
        ));
        assert!(matches!(FieldType::of::<i8>(), FieldType::Unsupported(_)));
    }

    #[test]
    fn assign_boxed_downcasts() {
        let mut slot = 0i32;
        assign_boxed(&mut slot, "level", Box::new(42i32)).unwrap();
        assert_eq!(slot, 42);
    }

    #[test]
    fn assign_boxed_rejects_wrong_type() {
        let mut slot = 0i32;
        let err = assign_boxed(&mut slot, "level", Box::new(42i64)).unwrap_err();
        assert!(matches!(err, ArgumentError::Assignment { .. }));
        assert_eq!(slot, 0);
    }

    #[test]
    fn box_none_matches_nullable_type() {
        let mut slot = Some(3u16);
        assign_boxed(&mut slot, "port", box_none(Primitive::U16)).unwrap();
        assert_eq!(slot, None);
    }

    #[test]
    fn box_sequence_shapes() {
        let mut list: Vec<String> = Vec::new();
        assign_boxed(&mut list, "files", box_sequence(vec!["a".into()], SequenceShape::List))
            .unwrap();
        assert_eq!(list, vec!["a".to_string()]);

        let mut array: Box<[String]> = Box::new([]);
        assign_boxed(
            &mut array,
            "files",
            box_sequence(vec!["a".into(), "b".into()], SequenceShape::Array),
        )
        .unwrap();
        assert_eq!(array.len(), 2);
    }
}
