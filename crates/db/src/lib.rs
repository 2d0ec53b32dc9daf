pub mod schema;
pub mod repository;
pub mod memory;
pub mod migrations;
pub mod connection;

pub use schema::*;
pub use repository::*;
pub use memory::*;
pub use connection::*;
