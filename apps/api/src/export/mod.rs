pub mod handlers;
pub mod writer;
