/// a request to a endpoint was not authorized because it did
/// not contain the session id cookie in the request headers
pub static NO_SID_COOKIE: &str = "NO_SID_COOKIE";

/// a request to a endpoint was not authorized because the
/// session on the session id cookie is expired or does not exist
pub static INVALID_SESSION: &str = "INVALID_SESSION";

/// a suspension inspection or one of its parts could not be changed
/// because the inspection was already signed by the inspector
pub static INSPECTION_SIGNED: &str = "INSPECTION_SIGNED";

/// the submitted inspection form or one of its part rows is invalid,
/// the response info contains the errors of every field and row
pub static INVALID_INSPECTION: &str = "INVALID_INSPECTION";

/// a write referenced a entity that does not exist or
/// deleted a entity that is still referenced by others
pub static INVALID_REFERENCE: &str = "INVALID_REFERENCE";

/// the request query or body failed validation, the response info
/// lists every invalid field
pub static INVALID_DTO: &str = "INVALID_DTO";
