//! Loading game config and the method tree from JSON, and roster persistence.

pub mod load;
pub mod persistence;
pub mod schema;

pub use load::*;
pub use persistence::*;
pub use schema::*;
