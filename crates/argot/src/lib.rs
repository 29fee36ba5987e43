//! Argot - Declarative command-line argument processing.
//!
//! Argot populates a plain struct from a raw argument list. Each field is
//! declared as one of three kinds:
//!
//! - **Switch**: a boolean flag, `--verbose` or `-v`
//! - **Option**: a labelled value, `--level 3`, or inline as `--level:3`
//!   with a per-field separator
//! - **Verbal**: the free-form positional values, collected into a
//!   `Vec<String>`
//!
//! After matching, the processor checks the declared constraints: exclusive
//! fields, required fields and dependencies between fields. The outcome
//! never depends on the order the arguments were given in.
//!
//! # Quick Start
//!
//! ```ignore
//! use argot::parse;
//! use argot_macros::Arguments;
//!
//! #[derive(Arguments, Default)]
//! #[args(program = "login", about = "Signs in to the service.")]
//! struct Login {
//!     #[args(option, solid = "username", brief = "u", required, depends = "password")]
//!     username: String,
//!     #[args(option, solid = "password", brief = "p", required, depends = "username")]
//!     password: String,
//!     #[args(option, solid = "retries", separator = ':', default = 3)]
//!     retries: u8,
//!     #[args(switch, solid = "verbose", brief = "v")]
//!     verbose: bool,
//!     #[args(verbal)]
//!     rest: Vec<String>,
//! }
//!
//! let login: Login = parse(&["--password", "p", "--username", "u", "--retries:5"])?;
//! ```
//!
//! # Token Grammar
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `--label`, `-label`, `/label` | a parameter |
//! | `--label<sep>value` | an option with an inline value |
//! | `--`, `-`, `/`, anything else | a plain value |
//!
//! Plain values are collected greedily into the verbal field until the next
//! parameter-looking token.
//!
//! # Custom Conversion
//!
//! Option values are converted by [`PrimitiveConverter`] unless a
//! [`CustomConverter`] is attached to the field or registered for its type
//! in the [`registry`].

mod binding;
mod convert;
mod converter;
mod error;
mod field;
mod field_type;
pub mod help;
mod matcher;
mod processor;
pub mod registry;
mod token;
mod validate;

// Re-export public API
pub use binding::{discover_bindings, FieldBinding};
pub use convert::{convert, PrimitiveConverter};
pub use converter::{ConverterRef, ConverterSource, CustomConverter, ResolvedConverter};
pub use error::{innermost_domain_error, ArgumentError, ConverterError, ErrorKind, Result};
pub use field::{
    ArgKind, Arguments, DefaultValue, DependencyType, FieldSpec, UsageInfo, DEFAULT_DELIMITER,
    DEFAULT_SEPARATOR,
};
pub use field_type::{assign_boxed, BoxedValue, FieldType, Primitive, SequenceShape};
pub use help::{render_help, HelpSettings};
pub use processor::{
    discover, parse, parse_command_line, parse_env, process, ArgumentProcessor,
};
pub use token::{looks_like_parameter, split_command_line, strip_prefix};
