pub mod auth;
pub mod common;
pub mod diagnostic;
pub mod suspension;
