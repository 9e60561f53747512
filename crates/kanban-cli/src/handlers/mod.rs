pub mod board;
pub mod serve;
pub mod task;
