pub mod batch;
pub mod solve;
