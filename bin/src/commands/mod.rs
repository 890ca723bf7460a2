//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod info;
pub(crate) mod window;
