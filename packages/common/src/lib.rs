pub mod assets;
pub mod error;
pub mod style;
pub mod tags;
pub mod visitor;

pub use assets::*;
pub use error::*;
pub use style::*;
pub use tags::*;
pub use visitor::*;
