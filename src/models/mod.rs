pub mod completion;
pub mod review;
