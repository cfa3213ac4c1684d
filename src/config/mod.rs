pub mod canned;
pub mod prompt;
