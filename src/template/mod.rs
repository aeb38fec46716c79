pub mod extract;
pub mod parser;
pub mod pipeline;
pub mod reconcile;
pub mod render;
pub mod spans;
