pub mod mem;
pub mod mongo;
pub mod traits;

pub use mem::InMemoryCatalog;
pub use mongo::MongoCatalog;
pub use traits::*;
