pub mod model;
pub mod popup;
pub mod service;

pub use model::MapDocument;
