pub mod constants;
pub mod entity;
pub mod tracer;
