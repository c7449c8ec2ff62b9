use super::responses::SimpleError;
use axum::body::Bytes;
use axum_typed_multipart::FieldData;
use http::StatusCode;

/// extensions accepted for uploaded diagnostic reports
pub const REPORT_EXTENSIONS: [&str; 5] = ["json", "txt", "csv", "log", "pdf"];

/// extensions accepted for inspection evidence, photos and scanned documents
pub const EVIDENCE_EXTENSIONS: [&str; 6] = ["jpe", "jpg", "jpeg", "png", "webp", "pdf"];

/// asserts a file name has one of the allowed extensions, returning the lowercased extension
pub fn get_extension_or_fail_request(
    file_name: &str,
    allowed_extensions: &[&str],
) -> Result<String, (StatusCode, SimpleError)> {
    let (_, file_extension) = file_name.rsplit_once('.').ok_or((
        StatusCode::BAD_REQUEST,
        SimpleError::from("empty file extension"),
    ))?;

    let file_extension = file_extension.to_lowercase();

    if allowed_extensions.contains(&file_extension.as_str()) {
        Ok(file_extension)
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            SimpleError::from("invalid file extension"),
        ))
    }
}

/// validates the extension of a uploaded file and creates a unique filename with the format:
///
/// `<prefix>_<now_timestamp>_<short_uuid>.<uploaded_file_extension>`
///
/// eg: report_02-10-2023_10:20:59_1b9d6bcd.json
pub fn filename_from_field(
    prefix: &str,
    field: &FieldData<Bytes>,
    allowed_extensions: &[&str],
) -> Result<String, (StatusCode, SimpleError)> {
    let file_name = field
        .metadata
        .file_name
        .clone()
        .ok_or((StatusCode::BAD_REQUEST, SimpleError::from("empty filename")))?;

    let file_extension = get_extension_or_fail_request(&file_name, allowed_extensions)?;

    Ok(timestamped_filename(prefix, &file_extension))
}

/// `<prefix>_<now_timestamp>_<short_uuid>.<extension>`
pub fn timestamped_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%d-%m-%Y_%H:%M:%S");
    let uuid = uuid::Uuid::new_v4().simple().to_string();

    format!("{}_{}_{}.{}", prefix, timestamp, &uuid[..8], extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_report_extensions_case_insensitively() {
        assert_eq!(
            get_extension_or_fail_request("scan.JSON", &REPORT_EXTENSIONS).unwrap(),
            "json"
        );
        assert_eq!(
            get_extension_or_fail_request("obd.2024.log", &REPORT_EXTENSIONS).unwrap(),
            "log"
        );
    }

    #[test]
    fn rejects_unknown_or_missing_extensions() {
        let (status, _) = get_extension_or_fail_request("malware.exe", &REPORT_EXTENSIONS)
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(get_extension_or_fail_request("report", &REPORT_EXTENSIONS).is_err());
    }

    #[test]
    fn timestamped_filenames_keep_prefix_and_extension() {
        let name = timestamped_filename("report", "txt");

        assert!(name.starts_with("report_"));
        assert!(name.ends_with(".txt"));
        assert_ne!(name, timestamped_filename("report", "txt"));
    }
}
