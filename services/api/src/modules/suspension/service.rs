use super::{
    dto::{InspectionFeedbackDto, InspectionViewDto, PartViewDto},
    form::{self, FormContext, InspectionSubmission, PartChange, PartValues},
    hint::{replacement_hint, REPLACE_FROM_WEAR},
    repository,
};
use crate::{
    database::error::DbError,
    modules::{
        common::{
            error_codes::{INSPECTION_SIGNED, INVALID_INSPECTION},
            responses::{ApiError, SimpleError},
        },
        diagnostic,
    },
};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::StatusCode;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, IntoActiveModel, NotSet, Set,
    TransactionTrait,
};
use shared::{
    constants::{DiagnosticStatus, InspectionStatus, Severity},
    entity::{suspension_inspection, suspension_part, user_profile},
};
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub enum SubmitInspectionError {
    /// the inspection is signed, nothing can be changed anymore
    AlreadySigned(InspectionFeedbackDto),
    Invalid(InspectionFeedbackDto),
    Db(DbErr),
}

impl From<DbErr> for SubmitInspectionError {
    fn from(err: DbErr) -> Self {
        SubmitInspectionError::Db(err)
    }
}

impl IntoResponse for SubmitInspectionError {
    fn into_response(self) -> Response {
        match self {
            SubmitInspectionError::AlreadySigned(feedback) => (
                StatusCode::CONFLICT,
                ApiError::new(INSPECTION_SIGNED, feedback),
            )
                .into_response(),

            SubmitInspectionError::Invalid(feedback) => (
                StatusCode::BAD_REQUEST,
                ApiError::new(INVALID_INSPECTION, feedback),
            )
                .into_response(),

            SubmitInspectionError::Db(err) => {
                <(StatusCode, SimpleError)>::from(DbError(err)).into_response()
            }
        }
    }
}

/// A saved part whose wear calls for a replacement the inspector did not mark
pub struct ReplacementMismatch<'a> {
    pub session_id: i32,
    pub inspection_id: i32,
    pub part_type: &'a str,
    pub wear_percent: i16,
    pub severity: Severity,
    pub user_id: i32,
}

pub fn is_replacement_mismatch(wear_percent: i16, needs_replacement: bool) -> bool {
    i64::from(wear_percent) >= REPLACE_FROM_WEAR && !needs_replacement
}

/// Flags the mismatch for quality review, only a log entry, never fails and never blocks the save
fn log_replacement_mismatch(mismatch: ReplacementMismatch) {
    tracing::warn!(
        session_id = mismatch.session_id,
        inspection_id = mismatch.inspection_id,
        part_type = mismatch.part_type,
        wear_percent = mismatch.wear_percent,
        severity = %mismatch.severity,
        user_id = mismatch.user_id,
        "[QA_FLAG] replacement mismatch"
    );
}

async fn load_stored_parts<C: ConnectionTrait>(
    db: &C,
    inspection_id: i32,
) -> Result<HashMap<i32, suspension_part::Model>, DbErr> {
    let parts = repository::find_parts(db, inspection_id).await?;

    Ok(parts.into_iter().map(|part| (part.id, part)).collect())
}

/// Builds the view of the suspension inspection of a session, creating a draft
/// inspection with `user` as the inspector on the first visit
pub async fn inspection_view(
    db: &DatabaseConnection,
    session_id: i32,
    user: &user_profile::Model,
) -> Result<InspectionViewDto, DbErr> {
    let session = diagnostic::repository::find_session(db, session_id).await?;

    let inspection = repository::get_or_create_inspection(db, session.id, Some(user.id)).await?;

    let part_types = repository::find_part_types(db).await?;
    let attachments = repository::find_attachments(db, inspection.id).await?;

    let part_type_names: HashMap<i32, &str> = part_types
        .iter()
        .map(|part_type| (part_type.id, part_type.name.as_str()))
        .collect();

    let parts = repository::find_parts(db, inspection.id)
        .await?
        .into_iter()
        .map(|part| PartViewDto {
            part_type_name: part_type_names
                .get(&part.part_type_id)
                .map(|name| name.to_string())
                .unwrap_or_default(),
            hint: replacement_hint(Some(i64::from(part.wear_percent))),
            part,
        })
        .collect();

    Ok(InspectionViewDto {
        session_id: session.id,
        session_vin: session.vin,
        session_status: session.status,
        read_only: inspection.is_signed(),
        inspection,
        parts,
        attachments,
        part_types,
    })
}

/// Saves, and optionally signs, the suspension inspection of a session.
///
/// the inspection fields, every part change and the session status are stored in a
/// single transaction, a rejected submission stores nothing and echoes the submitted
/// rows back with their hints
pub async fn submit_inspection(
    db: &DatabaseConnection,
    session_id: i32,
    user: &user_profile::Model,
    submission: InspectionSubmission,
) -> Result<suspension_inspection::Model, SubmitInspectionError> {
    let session = diagnostic::repository::find_session(db, session_id).await?;

    let inspection = repository::get_or_create_inspection(db, session.id, Some(user.id)).await?;

    let txn = db.begin().await?;

    // checked again inside the transaction, the inspection may have been signed meanwhile
    let inspection = repository::find_inspection(&txn, inspection.id).await?;
    let stored_parts = load_stored_parts(&txn, inspection.id).await?;

    if inspection.is_signed() {
        txn.rollback().await?;

        return Err(SubmitInspectionError::AlreadySigned(InspectionFeedbackDto {
            form_errors: vec![],
            parts: form::part_feedback(&submission.parts, &[], &stored_parts),
        }));
    }

    let part_types = repository::find_part_types(&txn).await?;

    let part_type_ids: HashSet<i32> = part_types.iter().map(|part_type| part_type.id).collect();

    let inspector_exists = match submission.inspector_id {
        Some(inspector_id) => repository::profile_exists(&txn, inspector_id).await?,
        None => true,
    };

    let ctx = FormContext {
        stored_parts: &stored_parts,
        part_type_ids: &part_type_ids,
        inspector_exists,
    };

    let valid = match form::validate_submission(&submission, &ctx) {
        Ok(valid) => valid,
        Err(errors) => {
            txn.rollback().await?;

            return Err(SubmitInspectionError::Invalid(InspectionFeedbackDto {
                form_errors: errors.form_errors,
                parts: form::part_feedback(&submission.parts, &errors.row_errors, &stored_parts),
            }));
        }
    };

    let fields = valid.fields;

    let mut updated = inspection.into_active_model();

    updated.inspector_id = Set(fields.inspector_id);
    updated.mileage_km = Set(fields.mileage_km);
    updated.lift_used = Set(fields.lift_used);
    updated.test_drive = Set(fields.test_drive);
    updated.overall_risk = Set(fields.overall_risk);
    updated.comment = Set(fields.comment.clone());

    let inspection = updated.update(&txn).await?;

    let mut deleted_ids = vec![];

    for change in valid.changes {
        match change {
            PartChange::Delete(id) => deleted_ids.push(id),
            PartChange::Save { id, values } => {
                let PartValues {
                    part_type_id,
                    wear_percent,
                    severity,
                    reason,
                    evidence,
                    part_number,
                    needs_replacement,
                } = values;

                let severity = severity
                    .unwrap_or_else(|| replacement_hint(Some(i64::from(wear_percent))).severity);

                if is_replacement_mismatch(wear_percent, needs_replacement) {
                    let part_type = part_types
                        .iter()
                        .find(|part_type| part_type.id == part_type_id)
                        .map(|part_type| part_type.name.as_str())
                        .unwrap_or_default();

                    log_replacement_mismatch(ReplacementMismatch {
                        session_id: session.id,
                        inspection_id: inspection.id,
                        part_type,
                        wear_percent,
                        severity,
                        user_id: user.id,
                    });
                }

                let part = suspension_part::ActiveModel {
                    id: match id {
                        Some(id) => Set(id),
                        None => NotSet,
                    },
                    inspection_id: Set(inspection.id),
                    part_type_id: Set(part_type_id),
                    wear_percent: Set(wear_percent),
                    severity: Set(severity),
                    reason: Set(reason),
                    evidence: Set(evidence),
                    part_number: Set(part_number),
                    needs_replacement: Set(needs_replacement),
                };

                match id {
                    Some(_) => part.update(&txn).await?,
                    None => part.insert(&txn).await?,
                };
            }
        }
    }

    repository::delete_parts(&txn, inspection.id, deleted_ids).await?;

    let session = diagnostic::repository::find_session(&txn, session.id).await?;
    let status = session.status.advanced_to(DiagnosticStatus::SuspensionDone);

    let mut handed_back = session.into_active_model();

    handed_back.status = Set(status);
    handed_back.suspension_comment = Set(Some(fields.comment));

    handed_back.update(&txn).await?;

    let inspection = if valid.sign {
        let inspector_id = inspection.inspector_id.or(Some(user.id));

        let mut signed = inspection.into_active_model();

        signed.status = Set(InspectionStatus::Signed);
        signed.signed_at = Set(Some(Utc::now()));
        signed.inspector_id = Set(inspector_id);

        signed.update(&txn).await?
    } else {
        inspection
    };

    txn.commit().await?;

    tracing::info!(
        "[SUSPENSION] inspection {} of session {} {} by user {}",
        inspection.id,
        session_id,
        if valid.sign { "signed" } else { "saved" },
        user.id
    );

    Ok(inspection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn only_unmarked_high_wear_is_a_mismatch() {
        assert!(is_replacement_mismatch(70, false));
        assert!(is_replacement_mismatch(100, false));

        assert!(!is_replacement_mismatch(70, true));
        assert!(!is_replacement_mismatch(69, false));
        assert!(!is_replacement_mismatch(0, false));
    }

    #[tokio::test]
    async fn signed_inspection_rejection_is_a_conflict() {
        let feedback = InspectionFeedbackDto {
            form_errors: vec![],
            parts: vec![],
        };

        let res = SubmitInspectionError::AlreadySigned(feedback).into_response();

        assert_eq!(res.status(), StatusCode::CONFLICT);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["error"], INSPECTION_SIGNED);
        assert!(body["info"]["parts"].as_array().unwrap().is_empty());
    }

    #[test]
    fn invalid_submission_is_a_bad_request() {
        let feedback = InspectionFeedbackDto {
            form_errors: vec![],
            parts: vec![],
        };

        let res = SubmitInspectionError::Invalid(feedback).into_response();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_records_are_not_found() {
        let res = SubmitInspectionError::from(DbErr::RecordNotFound(String::from("session")))
            .into_response();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
