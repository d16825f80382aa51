pub mod parse;
pub mod report;
pub mod serve;
