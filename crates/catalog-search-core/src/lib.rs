pub mod config;
pub mod errors;
pub mod model;
pub mod query;

pub use config::*;
pub use errors::*;
pub use model::*;
pub use query::*;
