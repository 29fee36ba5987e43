//! Field declarations and the [`Arguments`] trait.
//!
//! A [`FieldSpec`] is the data-only description of one target field: its
//! kind, labels, constraints, default value and optional converter. Specs
//! are produced by `#[derive(Arguments)]` or written by hand; the processor
//! only ever works on the resulting records.

use std::any::{type_name, TypeId};
use std::fmt;

use rust_decimal::Decimal;

use crate::converter::{ConverterRef, CustomConverter};
use crate::error::{ArgumentError, Result};
use crate::field_type::{box_scalar, BoxedValue, FieldType, Primitive};

/// Default separator between an option label and its inline value.
pub const DEFAULT_SEPARATOR: char = ' ';

/// Default delimiter handed to custom converters.
pub const DEFAULT_DELIMITER: &str = ",";

/// How a field is addressed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// A boolean flag, e.g. `--verbose`.
    Switch,
    /// A labelled value, e.g. `--level 3` or `--level:3`.
    Option,
    /// Free-form positional values.
    Verbal,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::Switch => "switch",
            ArgKind::Option => "option",
            ArgKind::Verbal => "verbal",
        })
    }
}

/// How the declared dependencies of a field are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencyType {
    /// At least one dependency must be present.
    #[default]
    Optional,
    /// Every dependency must be present.
    Required,
}

/// A pre-conversion default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i128),
    Float(f64),
    Char(char),
    Text(String),
}

macro_rules! default_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DefaultValue {
                fn from(value: $ty) -> Self {
                    DefaultValue::Integer(value as i128)
                }
            }
        )*
    };
}

default_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Bool(value)
    }
}

impl From<f32> for DefaultValue {
    fn from(value: f32) -> Self {
        DefaultValue::Float(value as f64)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Float(value)
    }
}

impl From<char> for DefaultValue {
    fn from(value: char) -> Self {
        DefaultValue::Char(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(v) => write!(f, "{v}"),
            DefaultValue::Integer(v) => write!(f, "{v}"),
            DefaultValue::Float(v) => write!(f, "{v}"),
            DefaultValue::Char(v) => write!(f, "{v}"),
            DefaultValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl DefaultValue {
    fn type_label(&self) -> &'static str {
        match self {
            DefaultValue::Bool(_) => "bool",
            DefaultValue::Integer(_) => "integer",
            DefaultValue::Float(_) => "float",
            DefaultValue::Char(_) => "char",
            DefaultValue::Text(_) => "text",
        }
    }

    /// Produces a boxed value of `ty`, or `None` if the default does not fit.
    ///
    /// Integers fit any integer type that can hold them as well as floats and
    /// decimals. Floats fit floats and decimals. Everything else must match
    /// exactly.
    pub fn to_boxed(&self, ty: FieldType) -> Option<BoxedValue> {
        let (primitive, nullable) = match ty {
            FieldType::Value(p) => (p, false),
            FieldType::Nullable(p) => (p, true),
            _ => return None,
        };

        match (self, primitive) {
            (DefaultValue::Bool(v), Primitive::Bool) => Some(box_scalar(*v, nullable)),
            (DefaultValue::Char(v), Primitive::Char) => Some(box_scalar(*v, nullable)),
            (DefaultValue::Text(v), Primitive::String) => Some(box_scalar(v.clone(), nullable)),
            (DefaultValue::Integer(v), p) => integer_to_boxed(*v, p, nullable),
            (DefaultValue::Float(v), Primitive::F64) => Some(box_scalar(*v, nullable)),
            (DefaultValue::Float(v), Primitive::F32) => {
                let narrow = *v as f32;
                (narrow.is_finite() || !v.is_finite()).then(|| box_scalar(narrow, nullable))
            }
            (DefaultValue::Float(v), Primitive::Decimal) => Decimal::try_from(*v)
                .ok()
                .map(|d| box_scalar(d, nullable)),
            _ => None,
        }
    }

    /// Checks the default against `ty`.
    pub fn check(&self, field: &str, ty: FieldType) -> Result<()> {
        match self.to_boxed(ty) {
            Some(_) => Ok(()),
            None => Err(ArgumentError::default_value(
                field,
                format!(
                    "{} default '{}' is not compatible with {}",
                    self.type_label(),
                    self,
                    ty
                ),
            )),
        }
    }
}

fn integer_to_boxed(v: i128, primitive: Primitive, nullable: bool) -> Option<BoxedValue> {
    fn fit<T>(v: i128, nullable: bool) -> Option<BoxedValue>
    where
        T: TryFrom<i128> + Send + 'static,
    {
        T::try_from(v).ok().map(|n| box_scalar(n, nullable))
    }

    match primitive {
        Primitive::U8 => fit::<u8>(v, nullable),
        Primitive::I16 => fit::<i16>(v, nullable),
        Primitive::U16 => fit::<u16>(v, nullable),
        Primitive::I32 => fit::<i32>(v, nullable),
        Primitive::U32 => fit::<u32>(v, nullable),
        Primitive::I64 => fit::<i64>(v, nullable),
        Primitive::U64 => fit::<u64>(v, nullable),
        Primitive::F32 => Some(box_scalar(v as f32, nullable)),
        Primitive::F64 => Some(box_scalar(v as f64, nullable)),
        Primitive::Decimal => Decimal::try_from_i128_with_scale(v, 0)
            .ok()
            .map(|d| box_scalar(d, nullable)),
        _ => None,
    }
}

/// Declaration of one target field.
///
/// # Example
///
/// ```
/// use argot::{DependencyType, FieldSpec};
///
/// let spec = FieldSpec::option::<u16>("port")
///     .solid("port")
///     .brief("p")
///     .separator('=')
///     .default_value(8080)
///     .depends_on(["host"])
///     .dependency(DependencyType::Required);
/// assert_eq!(spec.name(), "port");
/// ```
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) kind: ArgKind,
    pub(crate) field_type: FieldType,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) solid: Option<String>,
    pub(crate) brief: Option<String>,
    pub(crate) separator: Option<char>,
    pub(crate) delimiter: Option<String>,
    pub(crate) required: bool,
    pub(crate) exclusive: bool,
    pub(crate) depends_on: Vec<String>,
    pub(crate) dependency: DependencyType,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) converter: Option<ConverterRef>,
    pub(crate) help: Option<String>,
    pub(crate) value_name: Option<String>,
}

impl FieldSpec {
    /// Creates a spec for field `name` of Rust type `T`.
    pub fn new<T: ?Sized + 'static>(name: impl Into<String>, kind: ArgKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            field_type: FieldType::of::<T>(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            solid: None,
            brief: None,
            separator: None,
            delimiter: None,
            required: false,
            exclusive: false,
            depends_on: Vec::new(),
            dependency: DependencyType::default(),
            default: None,
            converter: None,
            help: None,
            value_name: None,
        }
    }

    /// Creates a switch spec.
    pub fn switch<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new::<T>(name, ArgKind::Switch)
    }

    /// Creates an option spec.
    pub fn option<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new::<T>(name, ArgKind::Option)
    }

    /// Creates a verbal (positional) spec.
    pub fn verbal<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new::<T>(name, ArgKind::Verbal)
    }

    /// Sets the long label, e.g. `verbose`.
    pub fn solid(mut self, label: impl Into<String>) -> Self {
        self.solid = Some(label.into());
        self
    }

    /// Sets the short label, e.g. `v`.
    pub fn brief(mut self, label: impl Into<String>) -> Self {
        self.brief = Some(label.into());
        self
    }

    /// Sets the inline value separator of an option.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Sets the delimiter handed to custom converters.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as exclusive.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// Adds field names this field depends on.
    pub fn depends_on<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sets how dependencies are checked.
    pub fn dependency(mut self, dependency: DependencyType) -> Self {
        self.dependency = dependency;
        self
    }

    /// Sets the default value.
    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attaches a custom converter type.
    pub fn converter<C: CustomConverter + Default>(mut self) -> Self {
        self.converter = Some(ConverterRef::of::<C>());
        self
    }

    /// Attaches an already built converter reference.
    pub fn converter_ref(mut self, converter: ConverterRef) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Sets the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the value placeholder shown in help output.
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    /// The Rust field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared kind.
    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    /// The classified field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// Program level text used by the help processor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub program: Option<String>,
    pub about: Option<String>,
    pub footer: Option<String>,
}

/// A struct whose fields can be populated from command-line arguments.
///
/// Usually derived with `#[derive(Arguments)]` from `argot-macros`, but
/// can be implemented by hand.
///
/// # Manual Implementation
///
/// ```
/// use argot::{assign_boxed, Arguments, ArgumentError, BoxedValue, FieldSpec, Result};
///
/// #[derive(Default)]
/// struct Options {
///     debug: bool,
///     level: i32,
/// }
///
/// impl Arguments for Options {
///     fn argument_fields() -> Vec<FieldSpec> {
///         vec![
///             FieldSpec::switch::<bool>("debug").solid("debug").brief("d"),
///             FieldSpec::option::<i32>("level").solid("level"),
///         ]
///     }
///
///     fn assign_argument(&mut self, field: &str, value: BoxedValue) -> Result<()> {
///         match field {
///             "debug" => assign_boxed(&mut self.debug, field, value),
///             "level" => assign_boxed(&mut self.level, field, value),
///             _ => Err(ArgumentError::Support(format!("unknown field '{field}'"))),
///         }
///     }
/// }
///
/// let options: Options = argot::parse(&["-d", "--level", "3"]).unwrap();
/// assert!(options.debug);
/// assert_eq!(options.level, 3);
/// ```
pub trait Arguments {
    /// Field declarations in declaration order.
    fn argument_fields() -> Vec<FieldSpec>
    where
        Self: Sized;

    /// Stores `value` into the field called `field`.
    fn assign_argument(&mut self, field: &str, value: BoxedValue) -> Result<()>;

    /// Program level help text.
    fn usage_info() -> UsageInfo
    where
        Self: Sized,
    {
        UsageInfo::default()
    }
}
