pub mod form;
pub mod head_to_head;
pub mod map_performance;
pub mod analyzer;
pub mod predictor;

pub use form::*;
pub use head_to_head::*;
pub use map_performance::*;
pub use analyzer::*;
pub use predictor::*;
