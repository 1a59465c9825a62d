pub mod generate;
pub mod input;
pub mod options;
pub mod output;
