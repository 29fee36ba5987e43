//! The token matching loop.
//!
//! Tokens are consumed left to right from a working copy of the argument
//! list. A plain value starts a verbal run that greedily takes every
//! following plain value. A parameter is resolved against the bindings in
//! declaration order; the first binding whose label matches wins. Switches
//! are set to `true`, options take their value either inline after the
//! field's separator or from the next token.

use std::collections::VecDeque;

use tracing::trace;

use crate::binding::FieldBinding;
use crate::error::{ArgumentError, Result};
use crate::field::{ArgKind, Arguments};
use crate::field_type::{box_scalar, box_sequence, FieldType, SequenceShape};
use crate::token::{looks_like_parameter, strip_prefix};

/// Matches tokens to bindings and assigns the target's fields.
pub(crate) struct Matcher<'b> {
    bindings: &'b [FieldBinding],
    processed: Vec<usize>,
    verbal_values: Vec<String>,
}

impl<'b> Matcher<'b> {
    pub(crate) fn new(bindings: &'b [FieldBinding]) -> Self {
        Matcher {
            bindings,
            processed: Vec::new(),
            verbal_values: Vec::new(),
        }
    }

    /// Runs the loop to completion and returns the indices of the bindings
    /// that were matched, in first-match order.
    pub(crate) fn run<T, S>(mut self, target: &mut T, arguments: &[S]) -> Result<Vec<usize>>
    where
        T: Arguments + ?Sized,
        S: AsRef<str>,
    {
        let mut tokens: VecDeque<&str> = arguments.iter().map(AsRef::as_ref).collect();

        while let Some(token) = tokens.pop_front() {
            match strip_prefix(token) {
                Some(stripped) => self.parameter(target, token, stripped, &mut tokens)?,
                None => self.verbal(target, token, &mut tokens)?,
            }
        }

        Ok(self.processed)
    }

    fn verbal<T: Arguments + ?Sized>(
        &mut self,
        target: &mut T,
        first: &str,
        tokens: &mut VecDeque<&str>,
    ) -> Result<()> {
        let index = self
            .bindings
            .iter()
            .position(|b| b.kind() == ArgKind::Verbal)
            .ok_or_else(|| {
                ArgumentError::Verbal(format!(
                    "value '{first}' cannot be assigned, no verbal field is declared"
                ))
            })?;
        let bindings = self.bindings;
        let binding = &bindings[index];

        self.verbal_values.push(first.to_string());
        while let Some(next) = tokens.front() {
            if looks_like_parameter(next) {
                break;
            }
            self.verbal_values.push(next.to_string());
            tokens.pop_front();
        }
        trace!(field = binding.name(), count = self.verbal_values.len(), "verbal run matched");

        let shape = match binding.field_type() {
            FieldType::Sequence(shape) => shape,
            _ => SequenceShape::List,
        };
        let value = box_sequence(self.verbal_values.clone(), shape);
        target.assign_argument(binding.name(), value)?;
        self.mark(index);
        Ok(())
    }

    fn parameter<T: Arguments + ?Sized>(
        &mut self,
        target: &mut T,
        token: &str,
        stripped: &str,
        tokens: &mut VecDeque<&str>,
    ) -> Result<()> {
        let index = self
            .bindings
            .iter()
            .position(|b| b.matches(stripped))
            .ok_or_else(|| {
                ArgumentError::Support(format!("parameter '{}' is not supported", token.trim()))
            })?;
        let bindings = self.bindings;
        let binding = &bindings[index];

        match binding.kind() {
            ArgKind::Switch => {
                trace!(field = binding.name(), "switch matched");
                let value = box_scalar(true, binding.field_type().is_nullable());
                target.assign_argument(binding.name(), value)?;
            }
            ArgKind::Option => {
                let (label, argument) = match stripped.split_once(binding.separator()) {
                    Some((label, inline)) => (label, Some(inline)),
                    None => (stripped, tokens.pop_front()),
                };
                // the value, inline or next, must not itself be a parameter
                let argument = argument
                    .filter(|value| !looks_like_parameter(value))
                    .ok_or_else(|| ArgumentError::Option {
                        parameter: token.trim().to_string(),
                    })?;
                trace!(field = binding.name(), argument, "option matched");
                let value = binding.convert_argument(label, argument)?;
                target.assign_argument(binding.name(), value)?;
            }
            ArgKind::Verbal => {
                return Err(ArgumentError::Support(format!(
                    "parameter '{}' addresses a verbal field",
                    token.trim()
                )))
            }
        }

        self.mark(index);
        Ok(())
    }

    fn mark(&mut self, index: usize) {
        if !self.processed.contains(&index) {
            self.processed.push(index);
        }
    }
}
