//! # Scenecraft Model
//!
//! The scene document tree: node variants, shared layout/style fields,
//! tree queries and the node factory.

pub mod ast;
pub mod error;
pub mod factory;
pub mod id_generator;

pub use ast::*;
pub use error::{ModelError, ModelResult};
pub use factory::NodeFactory;
pub use id_generator::{get_document_id, IDGenerator};
