pub mod dto;
pub mod error_codes;
pub mod extractors;
pub mod multipart_form_data;
pub mod responses;
pub mod validators;
