pub mod dates;
pub mod prompt;
