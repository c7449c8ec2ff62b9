use crate::config::{app_config, aws_config};
use anyhow::Context;
use aws_sdk_s3::{
    operation::{delete_object::DeleteObjectOutput, put_object::PutObjectOutput},
    Client,
};
use axum::body::Bytes;

/// a AWS S3 key to store uploaded objects
///
/// this is primarily used to create a tenant aware S3 object key in the format:
///
/// `tenant`/`folder`/`filename`
#[derive(Clone, Debug)]
pub struct S3Key {
    /// the "folder" a file using this key will be stored into
    ///
    /// in practice this determines the middle of the path
    pub folder: String,

    /// filename with extension, eg: `report.json`
    pub filename: String,
}

impl S3Key {
    /// key of a raw diagnostic report
    pub fn diagnostic_report(filename: String) -> Self {
        S3Key {
            folder: String::from("diagnostic_reports"),
            filename,
        }
    }

    /// key of a evidence file attached to a suspension inspection
    pub fn inspection_attachment(inspection_id: i32, filename: String) -> Self {
        S3Key {
            folder: format!("inspections/suspension/{}", inspection_id),
            filename,
        }
    }
}

impl From<S3Key> for String {
    fn from(v: S3Key) -> Self {
        format!(
            "{}/{}/{}",
            app_config().tenant_slug.clone(),
            v.folder,
            v.filename
        )
    }
}

#[derive(Clone)]
pub struct S3 {
    client: Client,
    uploads_bucket: String,
}

impl S3 {
    pub async fn new() -> Self {
        Self {
            client: Client::new(aws_config().await),
            uploads_bucket: app_config().aws_uploads_bucket_name.clone(),
        }
    }

    pub async fn upload(&self, key: String, bytes: Bytes) -> anyhow::Result<PutObjectOutput> {
        let result = self
            .client
            .put_object()
            .bucket(&self.uploads_bucket)
            .key(key.clone())
            .body(bytes.into())
            .send()
            .await;

        if result.is_err() {
            tracing::error!("[S3] failed to upload S3 object: {}", key);
        }

        result.with_context(|| format!("failed to upload {}", key))
    }

    pub async fn delete(&self, key: String) -> anyhow::Result<DeleteObjectOutput> {
        let result = self
            .client
            .delete_object()
            .bucket(&self.uploads_bucket)
            .key(key.clone())
            .send()
            .await;

        if result.is_err() {
            tracing::error!("[S3] failed to delete S3 object: {}", key)
        }

        result.with_context(|| format!("failed to delete {}", key))
    }
}
