mod compiler;

pub use compiler::{compile_to_html, escape_html, CompileOptions};
