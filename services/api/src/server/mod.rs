pub mod controller;
pub mod open_api;
