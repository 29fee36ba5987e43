//! Binding discovery.
//!
//! [`discover_bindings`] turns the field declarations of a target into
//! validated [`FieldBinding`]s. It fails fast, before any argument is looked
//! at, on:
//!
//! - malformed metadata for the field kind
//! - switches or options with no usable label
//! - solid or brief labels used twice
//! - more than one verbal field
//! - field types the kind cannot hold
//! - default values that do not fit the field type

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::convert::PrimitiveConverter;
use crate::converter::{self, ResolvedConverter};
use crate::error::{ArgumentError, Result};
use crate::field::{
    ArgKind, DefaultValue, DependencyType, FieldSpec, DEFAULT_DELIMITER, DEFAULT_SEPARATOR,
};
use crate::field_type::{BoxedValue, FieldType};
use crate::token::{normalize_label, LONG_PREFIX, SHORT_PREFIX};

/// A validated field declaration, ready for matching.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    spec: FieldSpec,
    solid: Option<String>,
    brief: Option<String>,
    separator: char,
    delimiter: String,
    depends_on: Vec<String>,
    converter: Option<ResolvedConverter>,
}

impl FieldBinding {
    /// The Rust field name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The field kind.
    pub fn kind(&self) -> ArgKind {
        self.spec.kind
    }

    /// The classified field type.
    pub fn field_type(&self) -> FieldType {
        self.spec.field_type
    }

    /// Long label without prefix.
    pub fn solid_label(&self) -> Option<&str> {
        self.solid.as_deref()
    }

    /// Short label without prefix.
    pub fn brief_label(&self) -> Option<&str> {
        self.brief.as_deref()
    }

    /// Inline value separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Delimiter handed to custom converters.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn is_required(&self) -> bool {
        self.spec.required
    }

    pub fn is_exclusive(&self) -> bool {
        self.spec.exclusive
    }

    /// Names of the fields this one depends on.
    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    pub fn dependency_type(&self) -> DependencyType {
        self.spec.dependency
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.spec.default.as_ref()
    }

    /// The resolved custom converter, if any.
    pub fn converter(&self) -> Option<&ResolvedConverter> {
        self.converter.as_ref()
    }

    pub fn help(&self) -> Option<&str> {
        self.spec.help.as_deref()
    }

    pub fn value_name(&self) -> Option<&str> {
        self.spec.value_name.as_deref()
    }

    /// The label used in messages: `--solid`, else `-brief`, else the field name.
    pub fn display_label(&self) -> String {
        match (&self.solid, &self.brief) {
            (Some(solid), _) => format!("{LONG_PREFIX}{solid}"),
            (None, Some(brief)) => format!("{SHORT_PREFIX}{brief}"),
            (None, None) => self.spec.name.clone(),
        }
    }

    /// Returns `true` if the prefix-stripped token addresses this binding.
    ///
    /// Options compare only the part before their separator, so `option2:42`
    /// matches the label `option2` when the separator is `:`.
    pub(crate) fn matches(&self, stripped: &str) -> bool {
        if self.kind() == ArgKind::Verbal {
            return false;
        }
        let candidate = if self.kind() == ArgKind::Option {
            stripped
                .split_once(self.separator)
                .map_or(stripped, |(label, _)| label)
        } else {
            stripped
        };
        self.solid.as_deref() == Some(candidate) || self.brief.as_deref() == Some(candidate)
    }

    /// Boxes the default value, if one is declared.
    pub(crate) fn boxed_default(&self) -> Option<BoxedValue> {
        self.spec
            .default
            .as_ref()
            .and_then(|value| value.to_boxed(self.field_type()))
    }

    /// Converts a raw option argument.
    pub(crate) fn convert_argument(&self, parameter: &str, argument: &str) -> Result<BoxedValue> {
        if self.converter.is_some() {
            return converter::invoke(self.converter.as_ref(), parameter, argument, &self.delimiter);
        }
        PrimitiveConverter::try_convert(argument, self.field_type()).ok_or_else(|| {
            ArgumentError::Conversion {
                parameter: parameter.to_string(),
                argument: argument.to_string(),
                type_name: self.spec.type_name,
            }
        })
    }
}

/// Validates declarations and builds their bindings, in declaration order.
pub fn discover_bindings(specs: Vec<FieldSpec>) -> Result<Vec<FieldBinding>> {
    let mut solids: HashSet<String> = HashSet::new();
    let mut briefs: HashSet<String> = HashSet::new();
    let mut verbal: Option<String> = None;
    let mut bindings = Vec::with_capacity(specs.len());

    for spec in specs {
        check_attributes(&spec)?;

        let (solid, brief) = match spec.kind {
            ArgKind::Verbal => (None, None),
            ArgKind::Switch | ArgKind::Option => {
                let solid = spec.solid.as_deref().and_then(normalize_label);
                let brief = spec.brief.as_deref().and_then(normalize_label);
                if solid.is_none() && brief.is_none() {
                    return Err(ArgumentError::utilize(&spec.name, "neither label used"));
                }
                if spec.kind == ArgKind::Option {
                    let separator = spec.separator.unwrap_or(DEFAULT_SEPARATOR);
                    let clash = [&solid, &brief]
                        .into_iter()
                        .flatten()
                        .find(|label| label.contains(separator));
                    if let Some(label) = clash {
                        return Err(ArgumentError::utilize(
                            &spec.name,
                            format!("label '{label}' contains the separator '{separator}'"),
                        ));
                    }
                }
                (solid, brief)
            }
        };

        if let Some(label) = &solid {
            if !solids.insert(label.clone()) {
                return Err(ArgumentError::utilize(
                    &spec.name,
                    format!("solid label '{label}' is already in use"),
                ));
            }
        }
        if let Some(label) = &brief {
            if !briefs.insert(label.clone()) {
                return Err(ArgumentError::utilize(
                    &spec.name,
                    format!("brief label '{label}' is already in use"),
                ));
            }
        }

        if spec.kind == ArgKind::Verbal {
            if let Some(first) = &verbal {
                return Err(ArgumentError::Verbal(format!(
                    "field '{}' is a second verbal field, '{}' already is one",
                    spec.name, first
                )));
            }
            verbal = Some(spec.name.clone());
        }

        let converter = match spec.kind {
            ArgKind::Option => converter::resolve(&spec),
            ArgKind::Switch | ArgKind::Verbal => None,
        };

        let supported = match spec.kind {
            ArgKind::Switch => spec.field_type.is_boolean(),
            ArgKind::Option => {
                converter.is_some() || PrimitiveConverter::supports(spec.field_type)
            }
            ArgKind::Verbal => spec.field_type.is_sequence(),
        };
        if !supported {
            return Err(ArgumentError::Support(format!(
                "field '{}' of type {} cannot be used as {}",
                spec.name, spec.type_name, spec.kind
            )));
        }

        if let Some(default) = &spec.default {
            if converter.is_none() || PrimitiveConverter::supports(spec.field_type) {
                default.check(&spec.name, spec.field_type)?;
            } else {
                return Err(ArgumentError::default_value(
                    &spec.name,
                    format!("no default can be expressed for {}", spec.type_name),
                ));
            }
        }

        let depends_on = spec
            .depends_on
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        trace!(field = %spec.name, kind = %spec.kind, "binding discovered");

        bindings.push(FieldBinding {
            separator: spec.separator.unwrap_or(DEFAULT_SEPARATOR),
            delimiter: spec
                .delimiter
                .clone()
                .unwrap_or_else(|| DEFAULT_DELIMITER.to_string()),
            solid,
            brief,
            depends_on,
            converter,
            spec,
        });
    }

    debug!(count = bindings.len(), "argument bindings discovered");
    Ok(bindings)
}

fn check_attributes(spec: &FieldSpec) -> Result<()> {
    let fail = |reason: &str| Err(ArgumentError::attribute(spec.kind, &spec.name, reason));

    match spec.kind {
        ArgKind::Switch => {
            if spec.separator.is_some() {
                return fail("switches take no separator");
            }
            if spec.converter.is_some() {
                return fail("switches take no converter");
            }
        }
        ArgKind::Option => {
            if let Some(separator) = spec.separator {
                if separator.is_control() {
                    return fail("separator must not be a control character");
                }
            }
            if spec.delimiter.as_deref() == Some("") {
                return fail("delimiter must not be empty");
            }
        }
        ArgKind::Verbal => {
            if spec.solid.is_some() || spec.brief.is_some() {
                return fail("verbal fields take no labels");
            }
            if spec.separator.is_some() {
                return fail("verbal fields take no separator");
            }
            if spec.default.is_some() {
                return fail("verbal fields take no default value");
            }
            if spec.converter.is_some() {
                return fail("verbal fields take no converter");
            }
        }
    }
    Ok(())
}
