pub mod dto;
pub mod form;
pub mod hint;
pub mod repository;
pub mod routes;
pub mod service;
