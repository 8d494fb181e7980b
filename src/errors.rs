//! Errors and error-related utilities.

use std::{error, fmt, result};

/// The result type used throughout this library.
pub type Result<T> = result::Result<T, Box<dyn error::Error>>;

/// The dataset could not be loaded.
///
/// This is fatal: no partially loaded table is ever returned.
#[derive(Debug)]
pub struct LoadError(pub String);

/// A selection refers to a category or region that we do not recognize.
///
/// These are reported as values, not returned as errors: the offending value
/// is excluded and the rest of the selection is still used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSelection(pub String);

/// Invalid command line argument or an invalid aggregation request.
#[derive(Debug)]
pub struct InvalidArgument(pub String);

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot load bookings: {}", self.0)
    }
}

impl fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid selection: {}", self.0)
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid argument: {}", self.0)
    }
}

impl error::Error for LoadError {}

impl error::Error for InvalidSelection {}

impl error::Error for InvalidArgument {}

/// A helper for constructing [LoadError].
pub fn load_error(s: String) -> Box<dyn error::Error> {
    LoadError(s).into()
}

/// A helper for constructing [LoadError].
pub fn load_error_ref(s: &str) -> Box<dyn error::Error> {
    LoadError(s.to_owned()).into()
}

/// A helper for constructing [InvalidArgument].
pub fn invalid_argument(s: String) -> Box<dyn error::Error> {
    InvalidArgument(s).into()
}

/// A helper for constructing [InvalidArgument].
pub fn invalid_argument_ref(s: &str) -> Box<dyn error::Error> {
    InvalidArgument(s.to_owned()).into()
}
