use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches a vehicle identification number or a partial one as typed by
    /// workshop staff: latin letters, digits and dashes only
    pub static ref REGEX_IS_VIN_LIKE: Regex = Regex::new(r"^[A-Za-z0-9-]*$").unwrap();
}
