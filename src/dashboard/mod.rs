pub mod page;
pub mod service;
pub mod v1;
