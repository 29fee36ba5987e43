//! Implementation of the `#[derive(Arguments)]` macro.
//!
//! Turns `#[args(...)]` field annotations into the field metadata and
//! setter that `argot::ArgumentProcessor` works from.

mod attrs;
mod derive;

pub use derive::arguments_derive_impl;
