pub mod loader;
pub mod model;
pub mod sanitize;

pub use model::Record;
