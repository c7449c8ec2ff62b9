use super::{
    analyzer::DtcTable,
    repository::{self, NewSession},
};
use crate::services::s3::{S3Key, S3};
use anyhow::Context;
use axum::body::Bytes;
use sea_orm::DatabaseConnection;
use shared::entity::diagnostic_session;
use std::path::{Path, PathBuf};

/// extensions of the report files picked up from the import directory
pub const IMPORT_EXTENSIONS: [&str; 2] = ["json", "txt"];

/// VIN of imported sessions, reports dropped on the import directory carry no vehicle data
pub const UNKNOWN_VIN: &str = "UNKNOWN";

/// Lists the report files of the import directory sorted by name, subdirectories and
/// files with other extensions are ignored
pub fn report_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read import directory {}", dir.display()))?;

    let mut files = vec![];

    for entry in entries {
        let path = entry?.path();

        if !path.is_file() {
            continue;
        }

        let is_report = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMPORT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);

        if is_report {
            files.push(path);
        }
    }

    files.sort();

    Ok(files)
}

/// Imports a single report file as a new diagnostic session, the local file is only
/// removed once the session exists
pub async fn import_report(
    db: &DatabaseConnection,
    s3: &S3,
    dtc: &DtcTable,
    path: &Path,
) -> anyhow::Result<diagnostic_session::Model> {
    let contents = std::fs::read(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    let filename = crate::modules::common::multipart_form_data::timestamped_filename(
        "import", &extension,
    );

    let key = String::from(S3Key::diagnostic_report(filename));

    s3.upload(key.clone(), Bytes::from(contents)).await?;

    let new_session = NewSession {
        vin: String::from(UNKNOWN_VIN),
        vehicle_model: String::new(),
        raw_file: key.clone(),
        user_profile_id: None,
    };

    let session = match repository::create_session(db, new_session, dtc).await {
        Ok(session) => session,
        Err(e) => {
            let _ = s3.delete(key).await;

            return Err(e).context("failed to create diagnostic session");
        }
    };

    std::fs::remove_file(path)
        .with_context(|| format!("failed to remove imported report {}", path.display()))?;

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lists_report_files() {
        let dir = tempfile::tempdir().unwrap();

        std::fs::write(dir.path().join("b.txt"), "P0171").unwrap();
        std::fs::write(dir.path().join("a.JSON"), "{}").unwrap();
        std::fs::write(dir.path().join("photo.png"), "").unwrap();
        std::fs::write(dir.path().join("no_extension"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = report_files(dir.path()).unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("a.JSON"), dir.path().join("b.txt")]
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(report_files(&dir.path().join("missing")).is_err());
    }
}
