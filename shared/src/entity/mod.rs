pub mod prelude;

pub mod diagnostic_code;
pub mod diagnostic_session;
pub mod sensor_reading;
pub mod suspension_attachment;
pub mod suspension_inspection;
pub mod suspension_part;
pub mod suspension_part_type;
pub mod user_profile;
pub mod user_session;
