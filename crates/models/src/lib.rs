pub mod matches;
pub mod predictions;
pub mod reports;
pub mod error;

pub use matches::*;
pub use predictions::*;
pub use reports::*;
pub use error::*;
