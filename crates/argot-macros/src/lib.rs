//! Proc macros for argot.
//!
//! # Derive Macros
//!
//! - [`Arguments`] - Generate argument metadata and the field setter from
//!   struct annotations
//!
//! # Examples
//!
//! For working examples, see `argot/tests/processing.rs`.

mod arguments;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Arguments` trait for a plain struct.
///
/// Only fields carrying `#[args(...)]` take part in processing; every other
/// field keeps whatever value `Default` gave it.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `switch` | Boolean flag, set to `true` when present |
/// | `option` | Labelled value, converted to the field type |
/// | `verbal` | Collects the free-form values (`Vec<String>` or `Box<[String]>`) |
/// | `solid = "..."` | Long label, given as `--label` |
/// | `brief = "..."` | Short label, given as `-l` |
/// | `separator = ':'` | Inline value separator for options (default `' '`) |
/// | `delimiter = "..."` | Passed through to custom converters (default `","`) |
/// | `required` | Must be present whenever any argument is given |
/// | `exclusive` | Must be the only argument given |
/// | `depends = "a, b"` | Fields this one depends on |
/// | `dependency = "required"` | All dependencies must be present (default `"optional"`: any one) |
/// | `default = <literal>` | Assigned before matching |
/// | `converter = Type` | A `CustomConverter` with a `Default` impl |
/// | `help = "..."` | Help text (falls back to the doc comment) |
/// | `value_name = "..."` | Placeholder shown in help output |
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `program = "..."` | Program name in the usage line (defaults to the package name) |
/// | `about = "..."` | Text under the usage line (falls back to the doc comment) |
/// | `footer = "..."` | Text at the end of the help output |
///
/// # Example
///
/// ```ignore
/// use argot_macros::Arguments;
///
/// #[derive(Arguments, Default)]
/// #[args(program = "fetch")]
/// struct Fetch {
///     /// Seconds before giving up.
///     #[args(option, solid = "timeout", brief = "t", separator = '=', default = 30)]
///     timeout: u32,
///
///     #[args(switch, solid = "quiet", brief = "q", exclusive)]
///     quiet: bool,
///
///     #[args(verbal, value_name = "url")]
///     urls: Vec<String>,
/// }
///
/// let fetch: Fetch = argot::parse(&["--timeout=5", "https://example.org"])?;
/// ```
///
/// Label collisions, unsupported field types and incompatible defaults are
/// reported by `argot` when the struct is first processed, not at compile
/// time.
#[proc_macro_derive(Arguments, attributes(args))]
pub fn arguments_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    arguments::arguments_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
