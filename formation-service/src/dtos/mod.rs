pub mod report;

pub use report::{Learner, TrainingReport};
