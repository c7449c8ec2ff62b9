mod common;

use diagnostics_api::modules::{
    diagnostic::repository as diagnostic_repository,
    suspension::{
        form::{InspectionSubmission, PartRowInput, RawWear, SubmitAction, WEAR_OUT_OF_RANGE},
        repository,
        service::{self, SubmitInspectionError},
    },
};
use sea_orm::{DatabaseConnection, DbErr};
use shared::{
    constants::{DiagnosticStatus, InspectionStatus, OverallRisk, Severity},
    entity::{diagnostic_session, user_profile},
};

struct Fixture {
    db: DatabaseConnection,
    user: user_profile::Model,
    session: diagnostic_session::Model,
    ball_joint: i32,
    tie_rod_end: i32,
}

async fn fixture() -> Fixture {
    let db = common::test_db().await;
    let user = common::create_profile(&db, "inspector").await;
    let session = common::create_diagnostic_session(&db, "XTA21099", Some(&user)).await;

    Fixture {
        ball_joint: common::part_type_id(&db, "Ball joint").await,
        tie_rod_end: common::part_type_id(&db, "Tie rod end").await,
        db,
        user,
        session,
    }
}

fn new_part(part_type_id: i32, wear: i64) -> PartRowInput {
    PartRowInput {
        part_type_id: Some(part_type_id),
        wear_percent: Some(RawWear::Int(wear)),
        ..Default::default()
    }
}

fn submission(parts: Vec<PartRowInput>) -> InspectionSubmission {
    InspectionSubmission {
        lift_used: true,
        comment: String::from("front axle checked on the lift"),
        parts,
        ..Default::default()
    }
}

#[tokio::test]
async fn first_visit_creates_a_single_draft() {
    let f = fixture().await;

    let first = repository::get_or_create_inspection(&f.db, f.session.id, Some(f.user.id))
        .await
        .unwrap();

    let second = repository::get_or_create_inspection(&f.db, f.session.id, None)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.inspector_id, Some(f.user.id));
    assert_eq!(second.status, InspectionStatus::Draft);
    assert_eq!(second.overall_risk, OverallRisk::Medium);
    assert!(second.lift_used);
    assert!(!second.test_drive);
}

#[tokio::test]
async fn view_lists_the_part_catalog() {
    let f = fixture().await;

    let view = service::inspection_view(&f.db, f.session.id, &f.user).await.unwrap();

    assert_eq!(view.session_vin, "XTA21099");
    assert_eq!(view.part_types.len(), 10);
    assert!(view.parts.is_empty());
    assert!(!view.read_only);
}

#[tokio::test]
async fn saving_stores_parts_and_marks_the_suspension_done() {
    let f = fixture().await;

    let mut explicit = new_part(f.tie_rod_end, 85);
    explicit.severity = Some(Severity::Ok);
    explicit.needs_replacement = true;

    let parts = vec![new_part(f.ball_joint, 85), explicit, new_part(f.ball_joint, 45)];

    let inspection = service::submit_inspection(&f.db, f.session.id, &f.user, submission(parts))
        .await
        .unwrap();

    assert_eq!(inspection.status, InspectionStatus::Draft);
    assert!(inspection.signed_at.is_none());
    assert_eq!(inspection.comment, "front axle checked on the lift");

    let stored = repository::find_parts(&f.db, inspection.id).await.unwrap();
    let severities: Vec<Severity> = stored.iter().map(|part| part.severity).collect();

    // severity comes from the wear only when none was chosen
    assert_eq!(severities, vec![Severity::Crit, Severity::Ok, Severity::Warn]);
    assert!(!stored[0].needs_replacement);

    let session = diagnostic_repository::find_session(&f.db, f.session.id).await.unwrap();

    assert_eq!(session.status, DiagnosticStatus::SuspensionDone);
    assert_eq!(
        session.suspension_comment.as_deref(),
        Some("front axle checked on the lift")
    );
}

#[tokio::test]
async fn unmarked_high_wear_is_flagged_for_review() {
    let f = fixture().await;
    let logs = common::CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);

    let mut marked = new_part(f.tie_rod_end, 85);
    marked.needs_replacement = true;

    let parts = vec![new_part(f.ball_joint, 85), marked];

    let inspection = service::submit_inspection(&f.db, f.session.id, &f.user, submission(parts))
        .await
        .unwrap();

    let output = logs.contents();

    assert_eq!(output.matches("[QA_FLAG]").count(), 1);
    assert!(output.contains("[QA_FLAG] replacement mismatch"));
    assert!(output.contains(&format!("session_id={}", f.session.id)));
    assert!(output.contains(&format!("inspection_id={}", inspection.id)));
    assert!(output.contains("Ball joint"));
    assert!(!output.contains("Tie rod end"));
    assert!(output.contains("wear_percent=85"));
    assert!(output.contains("severity=crit"));
    assert!(output.contains(&format!("user_id={}", f.user.id)));
}

#[tokio::test]
async fn deleting_a_row_keeps_its_siblings() {
    let f = fixture().await;

    let parts = vec![new_part(f.ball_joint, 10), new_part(f.tie_rod_end, 20)];

    let inspection = service::submit_inspection(&f.db, f.session.id, &f.user, submission(parts))
        .await
        .unwrap();

    let stored = repository::find_parts(&f.db, inspection.id).await.unwrap();

    let removed = PartRowInput {
        id: Some(stored[0].id),
        delete: true,
        ..Default::default()
    };

    let mut kept = new_part(f.tie_rod_end, 30);
    kept.id = Some(stored[1].id);

    service::submit_inspection(&f.db, f.session.id, &f.user, submission(vec![removed, kept]))
        .await
        .unwrap();

    let remaining = repository::find_parts(&f.db, inspection.id).await.unwrap();

    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, stored[1].id);
    assert_eq!(remaining[0].wear_percent, 30);
}

#[tokio::test]
async fn invalid_rows_store_nothing() {
    let f = fixture().await;

    let parts = vec![new_part(f.ball_joint, 20), new_part(f.tie_rod_end, 150)];

    let mut invalid = submission(parts);
    invalid.overall_risk = OverallRisk::High;

    let result = service::submit_inspection(&f.db, f.session.id, &f.user, invalid).await;

    let feedback = match result {
        Err(SubmitInspectionError::Invalid(feedback)) => feedback,
        other => panic!("expected a invalid submission, got {:?}", other),
    };

    assert_eq!(feedback.parts.len(), 2);
    assert!(feedback.parts[0].errors.is_empty());
    assert_eq!(feedback.parts[1].errors[0].field, "wearPercent");
    assert_eq!(feedback.parts[1].errors[0].message, WEAR_OUT_OF_RANGE);
    assert_eq!(feedback.parts[1].hint.severity, Severity::Crit);

    let inspection = repository::find_inspection_by_session(&f.db, f.session.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(inspection.overall_risk, OverallRisk::Medium);
    assert!(repository::find_parts(&f.db, inspection.id).await.unwrap().is_empty());

    let session = diagnostic_repository::find_session(&f.db, f.session.id).await.unwrap();
    assert_eq!(session.status, DiagnosticStatus::SuspensionPending);
}

#[tokio::test]
async fn parts_of_other_inspections_cannot_be_edited() {
    let f = fixture().await;
    let other_session = common::create_diagnostic_session(&f.db, "WVW333", None).await;

    let other = service::submit_inspection(
        &f.db,
        other_session.id,
        &f.user,
        submission(vec![new_part(f.ball_joint, 10)]),
    )
    .await
    .unwrap();

    let foreign_id = repository::find_parts(&f.db, other.id).await.unwrap()[0].id;

    let foreign = PartRowInput {
        id: Some(foreign_id),
        delete: true,
        ..Default::default()
    };

    let result =
        service::submit_inspection(&f.db, f.session.id, &f.user, submission(vec![foreign])).await;

    assert!(matches!(result, Err(SubmitInspectionError::Invalid(_))));
    assert_eq!(repository::find_parts(&f.db, other.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_inspector_is_rejected() {
    let f = fixture().await;

    let mut invalid = submission(vec![]);
    invalid.inspector_id = Some(9999);

    let result = service::submit_inspection(&f.db, f.session.id, &f.user, invalid).await;

    match result {
        Err(SubmitInspectionError::Invalid(feedback)) => {
            assert_eq!(feedback.form_errors[0].field, "inspectorId");
        }
        other => panic!("expected a invalid submission, got {:?}", other),
    }
}

#[tokio::test]
async fn signed_inspections_are_read_only() {
    let f = fixture().await;

    let mut signing = submission(vec![new_part(f.ball_joint, 85)]);
    signing.action = SubmitAction::Sign;

    let signed = service::submit_inspection(&f.db, f.session.id, &f.user, signing)
        .await
        .unwrap();

    assert_eq!(signed.status, InspectionStatus::Signed);
    assert!(signed.signed_at.is_some());
    assert_eq!(signed.inspector_id, Some(f.user.id));

    let mut edit = submission(vec![new_part(f.tie_rod_end, 5)]);
    edit.comment = String::from("changed after signing");

    let result = service::submit_inspection(&f.db, f.session.id, &f.user, edit).await;

    let feedback = match result {
        Err(SubmitInspectionError::AlreadySigned(feedback)) => feedback,
        other => panic!("expected a signed rejection, got {:?}", other),
    };

    assert_eq!(feedback.parts.len(), 1);
    assert!(feedback.form_errors.is_empty());

    let stored = repository::find_inspection(&f.db, signed.id).await.unwrap();

    assert_eq!(stored.comment, "front axle checked on the lift");
    assert_eq!(stored.signed_at, signed.signed_at);
    assert_eq!(repository::find_parts(&f.db, signed.id).await.unwrap().len(), 1);

    let view = service::inspection_view(&f.db, f.session.id, &f.user).await.unwrap();
    assert!(view.read_only);
}

#[tokio::test]
async fn signing_without_inspector_signs_as_the_request_user() {
    let f = fixture().await;
    let other = common::create_profile(&f.db, "other").await;

    repository::get_or_create_inspection(&f.db, f.session.id, Some(other.id))
        .await
        .unwrap();

    let mut signing = submission(vec![]);
    signing.action = SubmitAction::Sign;
    signing.inspector_id = None;

    let signed = service::submit_inspection(&f.db, f.session.id, &f.user, signing)
        .await
        .unwrap();

    assert_eq!(signed.inspector_id, Some(f.user.id));
}

#[tokio::test]
async fn missing_session_is_not_found() {
    let f = fixture().await;

    let result = service::submit_inspection(&f.db, 404, &f.user, submission(vec![])).await;

    assert!(matches!(
        result,
        Err(SubmitInspectionError::Db(DbErr::RecordNotFound(_)))
    ));
}
