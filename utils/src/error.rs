
///
/// The error type used across the workspace. Typed errors are declared 
/// alongside the code that raises them and converted into this type at 
/// the boundary, so that callers can still downcast to the original.
///
pub use anyhow::{anyhow as error, bail, Context, Error, Result};
