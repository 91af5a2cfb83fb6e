pub mod output;
pub mod parallel;
