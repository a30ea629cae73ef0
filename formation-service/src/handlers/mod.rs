pub mod fill;
pub mod health;

pub use fill::{fill_document, test_fill};
pub use health::health_check;
