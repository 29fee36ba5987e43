//! Entry points.
//!
//! [`ArgumentProcessor`] wraps a target and runs the full pipeline on each
//! [`process`](ArgumentProcessor::process) call:
//!
//! ```text
//! discover bindings → reject empty input → apply defaults → match tokens → validate
//! ```
//!
//! Discovery is repeated on every call; nothing is cached between calls.

use tracing::debug;

use crate::binding::{discover_bindings, FieldBinding};
use crate::error::{ArgumentError, Result};
use crate::field::Arguments;
use crate::matcher::Matcher;
use crate::token::split_command_line;
use crate::validate::validate;

/// Populates and validates a target from raw arguments.
///
/// # Example
///
/// ```
/// use argot::{assign_boxed, ArgumentError, ArgumentProcessor, Arguments, BoxedValue, FieldSpec};
///
/// #[derive(Default)]
/// struct Login {
///     user: String,
///     remember: bool,
/// }
///
/// impl Arguments for Login {
///     fn argument_fields() -> Vec<FieldSpec> {
///         vec![
///             FieldSpec::option::<String>("user").solid("user").brief("u").required(),
///             FieldSpec::switch::<bool>("remember").solid("remember"),
///         ]
///     }
///
///     fn assign_argument(&mut self, field: &str, value: BoxedValue) -> argot::Result<()> {
///         match field {
///             "user" => assign_boxed(&mut self.user, field, value),
///             "remember" => assign_boxed(&mut self.remember, field, value),
///             _ => Err(ArgumentError::Support(field.to_string())),
///         }
///     }
/// }
///
/// let mut login = Login::default();
/// ArgumentProcessor::new(&mut login)
///     .process(&["--remember", "-u", "alice"])
///     .unwrap();
/// assert_eq!(login.user, "alice");
/// assert!(login.remember);
/// ```
pub struct ArgumentProcessor<'t, T: Arguments> {
    target: &'t mut T,
}

impl<'t, T: Arguments> ArgumentProcessor<'t, T> {
    /// Wraps `target`.
    pub fn new(target: &'t mut T) -> Self {
        ArgumentProcessor { target }
    }

    /// Runs binding discovery only and returns the bindings.
    pub fn initialize(&self) -> Result<Vec<FieldBinding>> {
        discover::<T>()
    }

    /// Processes `arguments` into the target.
    ///
    /// On error the target may be partially populated.
    pub fn process<S: AsRef<str>>(&mut self, arguments: &[S]) -> Result<()> {
        let bindings = discover::<T>()?;

        if arguments.is_empty() {
            return Err(ArgumentError::EmptyArguments);
        }

        for binding in &bindings {
            if let Some(value) = binding.boxed_default() {
                self.target.assign_argument(binding.name(), value)?;
            }
        }

        let processed = Matcher::new(&bindings).run(&mut *self.target, arguments)?;
        validate(&bindings, &processed)?;

        debug!(
            arguments = arguments.len(),
            matched = processed.len(),
            "arguments processed"
        );
        Ok(())
    }

    /// Splits `line` with shell quoting rules and processes the tokens.
    pub fn process_command_line(&mut self, line: &str) -> Result<()> {
        let tokens = split_command_line(line)?;
        self.process(tokens.as_slice())
    }

    /// Returns the wrapped target.
    pub fn target(&self) -> &T {
        self.target
    }
}

/// Runs binding discovery for `T`.
pub fn discover<T: Arguments>() -> Result<Vec<FieldBinding>> {
    discover_bindings(T::argument_fields())
}

/// Processes `arguments` into `target`.
pub fn process<T: Arguments, S: AsRef<str>>(target: &mut T, arguments: &[S]) -> Result<()> {
    ArgumentProcessor::new(target).process(arguments)
}

/// Builds a default `T` and processes `arguments` into it.
pub fn parse<T: Arguments + Default, S: AsRef<str>>(arguments: &[S]) -> Result<T> {
    let mut target = T::default();
    process(&mut target, arguments)?;
    Ok(target)
}

/// Like [`parse`], taking a single command line string.
pub fn parse_command_line<T: Arguments + Default>(line: &str) -> Result<T> {
    parse(split_command_line(line)?.as_slice())
}

/// Parses the arguments of the running process, skipping the program name.
pub fn parse_env<T: Arguments + Default>() -> Result<T> {
    let arguments: Vec<String> = std::env::args().skip(1).collect();
    parse(arguments.as_slice())
}
