mod compiler;
mod context;

pub use compiler::{compile_to_react, jsx_text};
pub use context::{pascal_case, sanitize_identifier, CompileOptions, CompilerContext};
