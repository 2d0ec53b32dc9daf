pub mod models;
pub mod features;

pub use models::*;
pub use features::*;
