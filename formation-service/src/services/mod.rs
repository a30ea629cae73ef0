pub mod filler;

pub use filler::{fill_report, output_filename, FilledDocument, MAX_LEARNERS};
