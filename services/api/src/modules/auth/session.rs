use http::HeaderMap;

pub const SESSION_ID_COOKIE_NAME: &str = "sid";

/// a u128 that identifies a user session stored on the `user_session` database table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(u128);

impl SessionId {
    /// Converts the session id into a vec of bytes to be stored as binary
    pub fn into_database_value(self) -> Vec<u8> {
        self.0.to_le_bytes().to_vec()
    }
}

impl From<u128> for SessionId {
    fn from(v: u128) -> Self {
        SessionId(v)
    }
}

pub fn get_session_id_from_request_headers(headers: &HeaderMap) -> Option<u128> {
    headers
        .get_all("Cookie")
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_header| cookie_header.split(';'))
        .filter_map(|raw| cookie::Cookie::parse(raw.trim()).ok())
        .find_map(|cookie| {
            (cookie.name() == SESSION_ID_COOKIE_NAME).then(move || cookie.value().to_owned())
        })
        .and_then(|sid_cookie| sid_cookie.parse::<u128>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn session_ids_are_stored_as_16_little_endian_bytes() {
        let mut expected = vec![0u8; 16];
        expected[0] = 1;

        assert_eq!(SessionId::from(1).into_database_value(), expected);
        assert_eq!(SessionId::from(u128::MAX).into_database_value(), vec![255u8; 16]);

        assert_ne!(
            SessionId::from(256).into_database_value(),
            SessionId::from(1).into_database_value()
        );
    }

    #[test]
    fn finds_the_sid_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Cookie",
            HeaderValue::from_static("theme=dark; sid=123456789; lang=ru"),
        );

        assert_eq!(get_session_id_from_request_headers(&headers), Some(123456789));
    }

    #[test]
    fn ignores_non_numeric_sid_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert("Cookie", HeaderValue::from_static("sid=not-a-number"));

        assert_eq!(get_session_id_from_request_headers(&headers), None);
    }
}
