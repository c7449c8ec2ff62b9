pub mod analyzer;
pub mod dto;
pub mod importer;
pub mod repository;
pub mod routes;
