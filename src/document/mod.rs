pub mod paper;

pub use paper::{format_marks, PaperDocument, PaperHeader};
