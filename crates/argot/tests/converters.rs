//! Custom converter tests, attached and registered.
//!
//! The registry is process-wide, so every test here runs serially and
//! leaves it empty.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use argot::{
    discover, parse, registry, ArgumentError, ConverterError, ConverterSource, CustomConverter,
    ErrorKind,
};
use argot_macros::Arguments;
use serial_test::serial;

// ============================================================================
// Converters
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct Levels(Vec<u8>);

#[derive(Default)]
struct LevelsConverter;

impl CustomConverter for LevelsConverter {
    type Output = Levels;

    fn convert(&self, _: &str, argument: &str, delimiter: &str) -> Result<Levels, ConverterError> {
        argument
            .split(delimiter)
            .map(|part| part.trim().parse::<u8>().map_err(Into::into))
            .collect::<Result<Vec<u8>, ConverterError>>()
            .map(Levels)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Celsius(f64);

#[derive(Default)]
struct CelsiusConverter;

impl CustomConverter for CelsiusConverter {
    type Output = Celsius;

    fn convert(&self, _: &str, argument: &str, _: &str) -> Result<Celsius, ConverterError> {
        let degrees = argument
            .strip_suffix('C')
            .ok_or_else(|| format!("'{argument}' has no unit"))?;
        Ok(Celsius(degrees.parse()?))
    }
}

/// Rejects everything with a domain error.
#[derive(Default)]
struct Refusing;

impl CustomConverter for Refusing {
    type Output = Levels;

    fn convert(&self, parameter: &str, _: &str, _: &str) -> Result<Levels, ConverterError> {
        Err(Box::new(ArgumentError::Support(format!(
            "{parameter} is switched off"
        ))))
    }
}

#[derive(Debug)]
struct Wrapped(ArgumentError);

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("conversion machinery failed")
    }
}

impl Error for Wrapped {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Fails with a domain error buried under a wrapper.
#[derive(Default)]
struct Burying;

impl CustomConverter for Burying {
    type Output = Levels;

    fn convert(&self, _: &str, _: &str, _: &str) -> Result<Levels, ConverterError> {
        Err(Box::new(Wrapped(ArgumentError::Support(
            "levels are capped at 3".into(),
        ))))
    }
}

/// Panics on every conversion.
#[derive(Default)]
struct Exploding;

impl CustomConverter for Exploding {
    type Output = Levels;

    fn convert(&self, _: &str, _: &str, _: &str) -> Result<Levels, ConverterError> {
        panic!("exploding converter");
    }
}

/// Panics while being built.
struct Unbuildable;

impl Default for Unbuildable {
    fn default() -> Self {
        panic!("unbuildable converter");
    }
}

impl CustomConverter for Unbuildable {
    type Output = i32;

    fn convert(&self, _: &str, _: &str, _: &str) -> Result<i32, ConverterError> {
        Ok(-1)
    }
}

// ============================================================================
// Targets
// ============================================================================

#[derive(Arguments, Default, Debug)]
struct Tuning {
    #[args(option, solid = "levels", delimiter = ";", converter = LevelsConverter)]
    levels: Levels,
}

#[derive(Arguments, Default, Debug)]
struct Mismatched {
    #[args(option, solid = "count", converter = LevelsConverter)]
    count: i32,
}

#[derive(Arguments, Default, Debug)]
struct Weather {
    #[args(option, solid = "temp", brief = "t")]
    temp: Celsius,
}

#[derive(Arguments, Default, Debug)]
struct Strict {
    #[args(option, solid = "levels", converter = Refusing)]
    levels: Levels,
}

#[derive(Arguments, Default, Debug)]
struct Layered {
    #[args(option, solid = "levels", converter = Burying)]
    levels: Levels,
}

#[derive(Arguments, Default, Debug)]
struct DefaultedLevels {
    #[args(option, solid = "levels", converter = LevelsConverter, default = 1)]
    levels: Levels,
}

#[derive(Arguments, Default, Debug)]
struct Fragile {
    #[args(option, solid = "level", converter = Exploding)]
    level: Levels,
}

#[derive(Arguments, Default, Debug)]
struct Fallback {
    #[args(option, solid = "level", converter = Unbuildable)]
    level: i32,
}

// ============================================================================
// Attached converters
// ============================================================================

#[test]
#[serial]
fn attached_converter_receives_delimiter() {
    let t: Tuning = parse(&["--levels", "1;2; 3"]).unwrap();
    assert_eq!(t.levels, Levels(vec![1, 2, 3]));

    let bindings = discover::<Tuning>().unwrap();
    let converter = bindings[0].converter().unwrap();
    assert_eq!(converter.source(), ConverterSource::Attached);
    assert!(converter.is::<LevelsConverter>());
}

#[test]
#[serial]
fn attached_converter_for_another_type_is_ignored() {
    let bindings = discover::<Mismatched>().unwrap();
    assert!(bindings[0].converter().is_none());

    let m: Mismatched = parse(&["--count", "4"]).unwrap();
    assert_eq!(m.count, 4);
}

#[test]
#[serial]
fn converter_failure_names_the_parameter() {
    let err = parse::<Tuning, _>(&["--levels", "1;x"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CustomConverter);
    assert!(err.to_string().contains("levels"));
    assert!(err.source().is_some());
}

#[test]
#[serial]
fn domain_error_from_converter_is_surfaced() {
    let err = parse::<Strict, _>(&["--levels", "1"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Support);
    assert!(err.to_string().contains("switched off"));
}

#[test]
#[serial]
fn innermost_domain_error_becomes_the_reason() {
    let err = parse::<Layered, _>(&["--levels", "9"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CustomConverter);
    assert!(err.to_string().contains("capped at 3"), "{err}");

    let inner = argot::innermost_domain_error(err.source().unwrap()).unwrap();
    assert_eq!(inner.kind(), ErrorKind::Support);
}

#[test]
#[serial]
fn converted_fields_take_no_default() {
    let err = discover::<DefaultedLevels>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Default);
}

// ============================================================================
// Registry
// ============================================================================

#[test]
#[serial]
fn unsupported_type_without_converter_fails() {
    registry::clear_converters();
    assert_eq!(
        discover::<Weather>().unwrap_err().kind(),
        ErrorKind::Support
    );
}

#[test]
#[serial]
fn registered_converter_is_used() {
    registry::clear_converters();
    registry::add_converter(Arc::new(CelsiusConverter));

    let w: Weather = parse(&["-t", "21.5C"]).unwrap();
    assert_eq!(w.temp, Celsius(21.5));

    let bindings = discover::<Weather>().unwrap();
    assert_eq!(
        bindings[0].converter().map(|c| c.source()),
        Some(ConverterSource::Registry)
    );

    let err = parse::<Weather, _>(&["-t", "21.5"]).unwrap_err();
    assert!(err.to_string().contains("no unit"), "{err}");

    registry::clear_converters();
}

#[test]
#[serial]
fn attached_converter_wins_over_registry() {
    registry::clear_converters();

    #[derive(Default)]
    struct Constant;

    impl CustomConverter for Constant {
        type Output = Levels;

        fn convert(&self, _: &str, _: &str, _: &str) -> Result<Levels, ConverterError> {
            Ok(Levels(vec![0]))
        }
    }

    registry::add_converter(Arc::new(Constant));
    let t: Tuning = parse(&["--levels", "4;5"]).unwrap();
    assert_eq!(t.levels, Levels(vec![4, 5]));

    registry::clear_converters();
}

#[test]
#[serial]
fn adding_the_same_instance_twice_is_a_no_op() {
    registry::clear_converters();

    let converter = Arc::new(CelsiusConverter);
    assert!(registry::add_converter(converter.clone()));
    assert!(!registry::add_converter(converter.clone()));
    assert!(registry::add_converter(Arc::new(CelsiusConverter)));
    assert!(registry::has_converter::<Celsius>());

    assert!(registry::remove_converter::<Celsius>());
    assert!(!registry::remove_converter::<Celsius>());
    assert!(!registry::has_converter::<Celsius>());
}

#[test]
#[serial]
fn convert_with_requires_registration() {
    registry::clear_converters();

    let err = registry::convert_with::<Celsius>("temp", "3C", ",").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CustomConverter);

    registry::add_converter(Arc::new(CelsiusConverter));
    assert_eq!(
        registry::convert_with::<Celsius>("temp", "3C", ",").unwrap(),
        Celsius(3.0)
    );
    registry::clear_converters();
}

#[test]
#[serial]
fn panicking_converter_becomes_a_converter_violation() {
    let err = parse::<Fragile, _>(&["--level", "1"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CustomConverter);
    assert!(err.to_string().contains("panicked"), "{err}");
}

#[test]
#[serial]
fn converter_that_cannot_be_built_is_dropped() {
    registry::clear_converters();

    let bindings = discover::<Fallback>().unwrap();
    assert!(bindings[0].converter().is_none());

    let f: Fallback = parse(&["--level", "7"]).unwrap();
    assert_eq!(f.level, 7);
}
