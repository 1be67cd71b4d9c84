pub mod extract;
pub mod summarize;
