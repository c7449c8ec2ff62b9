pub use super::diagnostic_code::Entity as DiagnosticCode;
pub use super::diagnostic_session::Entity as DiagnosticSession;
pub use super::sensor_reading::Entity as SensorReading;
pub use super::suspension_attachment::Entity as SuspensionAttachment;
pub use super::suspension_inspection::Entity as SuspensionInspection;
pub use super::suspension_part::Entity as SuspensionPart;
pub use super::suspension_part_type::Entity as SuspensionPartType;
pub use super::user_profile::Entity as UserProfile;
pub use super::user_session::Entity as UserSession;
