//! Helpers shared by the unit tests.
mod common;

pub(crate) use common::*;
