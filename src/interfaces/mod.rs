//! Console presentation: intent scripts in, rendered screens out.

pub mod console;
pub mod csv;
