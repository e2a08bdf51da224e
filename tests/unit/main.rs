//! Unit test harness for stacking-rail.
//!
//! This module organizes unit tests for each component of the library.

mod command_parsing;
mod config_parsing;
mod config_validation;
