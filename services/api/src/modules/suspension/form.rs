use super::{
    dto::PartFeedbackDto,
    hint::{replacement_hint, ReplacementHint},
};
use crate::modules::common::dto::{blank_string_as_none, FieldError};
use serde::{Deserialize, Serialize};
use shared::{
    constants::{OverallRisk, Severity},
    entity::suspension_part,
};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use validator::Validate;

pub const REQUIRED: &str = "this field is required";
pub const WEAR_NOT_A_WHOLE_NUMBER: &str = "wear must be a whole number";
pub const WEAR_OUT_OF_RANGE: &str = "wear must be between 0 and 100";
pub const UNKNOWN_PART_TYPE: &str = "unknown part type";
pub const UNKNOWN_INSPECTOR: &str = "unknown inspector";
pub const FOREIGN_PART: &str = "part does not belong to this inspection";
pub const TOO_LONG: &str = "value is too long";

const REASON_MAX_CHARS: usize = 64;
const PART_NUMBER_MAX_CHARS: usize = 64;
const EVIDENCE_MAX_CHARS: usize = 10000;

/// Wear percent exactly as typed by the user, it is only
/// parsed when the row is validated
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawWear {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawWear {
    pub fn is_blank(&self) -> bool {
        matches!(self, RawWear::Text(text) if text.trim().is_empty())
    }

    /// wear used for the advisory hint, anything that is not a number counts as 0
    pub fn hint_value(&self) -> i64 {
        match self {
            RawWear::Int(n) => *n,
            RawWear::Float(f) if f.is_finite() => f.trunc() as i64,
            RawWear::Float(_) => 0,
            RawWear::Text(text) => text.trim().parse::<i64>().unwrap_or(0),
        }
    }

    /// parses the wear of a part, only whole numbers within 0 and 100 are valid
    pub fn parse(&self) -> Result<i16, &'static str> {
        let wear = match self {
            RawWear::Int(n) => *n,
            RawWear::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
            RawWear::Float(_) => return Err(WEAR_NOT_A_WHOLE_NUMBER),
            RawWear::Text(text) if text.trim().is_empty() => return Err(REQUIRED),
            RawWear::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| WEAR_NOT_A_WHOLE_NUMBER)?,
        };

        if !(0..=100).contains(&wear) {
            return Err(WEAR_OUT_OF_RANGE);
        }

        Ok(wear as i16)
    }
}

/// One row of the parts table of a inspection.
///
/// rows with a `id` edit a stored part, rows without one create a part, rows
/// with `delete` remove the stored part (or are ignored when they have no `id`)
#[derive(Deserialize, Serialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartRowInput {
    pub id: Option<i32>,

    #[serde(default)]
    pub delete: bool,

    pub part_type_id: Option<i32>,

    /// whole number between 0 and 100, strings are accepted as sent by html forms
    #[schema(value_type = Object)]
    pub wear_percent: Option<RawWear>,

    /// `None` lets the server pick the severity from the wear
    #[serde(default, deserialize_with = "blank_string_as_none")]
    pub severity: Option<Severity>,

    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub evidence: String,

    #[serde(default)]
    pub part_number: String,

    #[serde(default)]
    pub needs_replacement: bool,
}

impl PartRowInput {
    /// advisory hint of the row, when the row has no wear the wear of the stored part is used
    pub fn hint(&self, stored_parts: &HashMap<i32, suspension_part::Model>) -> ReplacementHint {
        let wear = match &self.wear_percent {
            Some(wear) if !wear.is_blank() => wear.hint_value(),
            _ => self
                .id
                .and_then(|id| stored_parts.get(&id))
                .map(|part| i64::from(part.wear_percent))
                .unwrap_or(0),
        };

        replacement_hint(Some(wear))
    }
}

#[derive(Deserialize, Serialize, ToSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitAction {
    /// store the inspection as a draft
    #[default]
    Save,

    /// store the inspection and sign it, making it read only
    Sign,
}

fn default_lift_used() -> bool {
    true
}

/// The suspension inspection form with its parts table
#[derive(Deserialize, Validate, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSubmission {
    #[serde(default)]
    pub action: SubmitAction,

    pub inspector_id: Option<i32>,

    #[validate(range(min = 0, message = "mileage must not be negative"))]
    pub mileage_km: Option<i32>,

    #[serde(default = "default_lift_used")]
    pub lift_used: bool,

    #[serde(default)]
    pub test_drive: bool,

    #[serde(default)]
    pub overall_risk: OverallRisk,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub comment: String,

    #[serde(default)]
    pub parts: Vec<PartRowInput>,
}

/// Values of a valid part row, `severity` is still `None` when not chosen
#[derive(Debug, Clone, PartialEq)]
pub struct PartValues {
    pub part_type_id: i32,
    pub wear_percent: i16,
    pub severity: Option<Severity>,
    pub reason: String,
    pub evidence: String,
    pub part_number: String,
    pub needs_replacement: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartChange {
    /// insert a new part when `id` is `None`, otherwise update it
    Save { id: Option<i32>, values: PartValues },
    Delete(i32),
}

/// Inspection fields of a valid submission
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionFields {
    pub inspector_id: Option<i32>,
    pub mileage_km: Option<i32>,
    pub lift_used: bool,
    pub test_drive: bool,
    pub overall_risk: OverallRisk,
    pub comment: String,
}

#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub fields: InspectionFields,
    pub changes: Vec<PartChange>,
    pub sign: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionErrors {
    pub form_errors: Vec<FieldError>,

    /// errors of each submitted row, same order as the submitted parts
    pub row_errors: Vec<Vec<FieldError>>,
}

impl SubmissionErrors {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.row_errors.iter().all(Vec::is_empty)
    }
}

/// What the submission is validated against
pub struct FormContext<'a> {
    /// parts currently stored for the inspection, by id
    pub stored_parts: &'a HashMap<i32, suspension_part::Model>,

    pub part_type_ids: &'a HashSet<i32>,

    /// if the submitted inspector exists, ignored when no inspector was submitted
    pub inspector_exists: bool,
}

fn check_length(errors: &mut Vec<FieldError>, field: &str, value: &str, max_chars: usize) {
    if value.chars().count() > max_chars {
        errors.push(FieldError::new(field, TOO_LONG));
    }
}

fn validate_row(row: &PartRowInput, ctx: &FormContext) -> Result<Option<PartChange>, Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(id) = row.id {
        if !ctx.stored_parts.contains_key(&id) {
            errors.push(FieldError::new("id", FOREIGN_PART));
        }
    }

    // rows marked for deletion are only checked for ownership
    if row.delete {
        return match (row.id, errors.is_empty()) {
            (Some(id), true) => Ok(Some(PartChange::Delete(id))),
            (None, _) => Ok(None),
            (Some(_), false) => Err(errors),
        };
    }

    let part_type_id = match row.part_type_id {
        None => {
            errors.push(FieldError::new("partTypeId", REQUIRED));
            None
        }
        Some(id) if !ctx.part_type_ids.contains(&id) => {
            errors.push(FieldError::new("partTypeId", UNKNOWN_PART_TYPE));
            None
        }
        Some(id) => Some(id),
    };

    let wear_percent = match row.wear_percent.as_ref().map(RawWear::parse) {
        None => {
            errors.push(FieldError::new("wearPercent", REQUIRED));
            None
        }
        Some(Err(message)) => {
            errors.push(FieldError::new("wearPercent", message));
            None
        }
        Some(Ok(wear)) => Some(wear),
    };

    check_length(&mut errors, "reason", &row.reason, REASON_MAX_CHARS);
    check_length(&mut errors, "partNumber", &row.part_number, PART_NUMBER_MAX_CHARS);
    check_length(&mut errors, "evidence", &row.evidence, EVIDENCE_MAX_CHARS);

    match (part_type_id, wear_percent) {
        (Some(part_type_id), Some(wear_percent)) if errors.is_empty() => {
            Ok(Some(PartChange::Save {
                id: row.id,
                values: PartValues {
                    part_type_id,
                    wear_percent,
                    severity: row.severity,
                    reason: row.reason.trim().to_string(),
                    evidence: row.evidence.trim().to_string(),
                    part_number: row.part_number.trim().to_string(),
                    needs_replacement: row.needs_replacement,
                },
            }))
        }
        _ => Err(errors),
    }
}

/// Validates the inspection fields and every part row, collecting all the errors
pub fn validate_submission(
    submission: &InspectionSubmission,
    ctx: &FormContext,
) -> Result<ValidSubmission, SubmissionErrors> {
    let mut errors = SubmissionErrors::default();

    if let Err(validation_errors) = submission.validate() {
        errors
            .form_errors
            .extend(FieldError::from_validation_errors(&validation_errors));
    }

    if submission.inspector_id.is_some() && !ctx.inspector_exists {
        errors
            .form_errors
            .push(FieldError::new("inspectorId", UNKNOWN_INSPECTOR));
    }

    let mut changes = Vec::with_capacity(submission.parts.len());

    for row in &submission.parts {
        match validate_row(row, ctx) {
            Ok(change) => {
                changes.extend(change);
                errors.row_errors.push(Vec::new());
            }
            Err(row_errors) => errors.row_errors.push(row_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidSubmission {
        fields: InspectionFields {
            inspector_id: submission.inspector_id,
            mileage_km: submission.mileage_km,
            lift_used: submission.lift_used,
            test_drive: submission.test_drive,
            overall_risk: submission.overall_risk,
            comment: submission.comment.trim().to_string(),
        },
        changes,
        sign: submission.action == SubmitAction::Sign,
    })
}

/// Echoes every submitted row with its hint and its errors, `row_errors` may be
/// empty when the rows were never validated
pub fn part_feedback(
    parts: &[PartRowInput],
    row_errors: &[Vec<FieldError>],
    stored_parts: &HashMap<i32, suspension_part::Model>,
) -> Vec<PartFeedbackDto> {
    parts
        .iter()
        .enumerate()
        .map(|(index, row)| PartFeedbackDto {
            index,
            input: row.clone(),
            hint: row.hint(stored_parts),
            errors: row_errors.get(index).cloned().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_part(id: i32, wear: i16) -> suspension_part::Model {
        suspension_part::Model {
            id,
            inspection_id: 1,
            part_type_id: 1,
            wear_percent: wear,
            severity: Severity::Warn,
            reason: String::new(),
            evidence: String::new(),
            part_number: String::new(),
            needs_replacement: false,
        }
    }

    fn row(part_type_id: i32, wear: RawWear) -> PartRowInput {
        PartRowInput {
            part_type_id: Some(part_type_id),
            wear_percent: Some(wear),
            ..Default::default()
        }
    }

    struct Fixture {
        stored_parts: HashMap<i32, suspension_part::Model>,
        part_type_ids: HashSet<i32>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                stored_parts: HashMap::from([(10, stored_part(10, 55))]),
                part_type_ids: HashSet::from([1, 2, 3]),
            }
        }

        fn ctx(&self) -> FormContext<'_> {
            FormContext {
                stored_parts: &self.stored_parts,
                part_type_ids: &self.part_type_ids,
                inspector_exists: true,
            }
        }
    }

    #[test]
    fn parses_wear_from_numbers_and_strings() {
        assert_eq!(RawWear::Int(85).parse(), Ok(85));
        assert_eq!(RawWear::Float(40.0).parse(), Ok(40));
        assert_eq!(RawWear::Text(String::from(" 7 ")).parse(), Ok(7));
        assert_eq!(RawWear::Float(40.5).parse(), Err(WEAR_NOT_A_WHOLE_NUMBER));
        assert_eq!(RawWear::Text(String::from("a lot")).parse(), Err(WEAR_NOT_A_WHOLE_NUMBER));
        assert_eq!(RawWear::Text(String::new()).parse(), Err(REQUIRED));
    }

    #[test]
    fn wear_outside_0_to_100_is_rejected() {
        assert_eq!(RawWear::Int(101).parse(), Err(WEAR_OUT_OF_RANGE));
        assert_eq!(RawWear::Int(-1).parse(), Err(WEAR_OUT_OF_RANGE));
        assert_eq!(RawWear::Int(100).parse(), Ok(100));
        assert_eq!(RawWear::Int(0).parse(), Ok(0));
    }

    #[test]
    fn hints_treat_garbage_as_zero_and_fall_back_to_the_stored_wear() {
        let fixture = Fixture::new();

        let garbage = row(1, RawWear::Text(String::from("n/a")));
        assert_eq!(garbage.hint(&fixture.stored_parts).severity, Severity::Ok);

        let blank_existing = PartRowInput {
            id: Some(10),
            wear_percent: Some(RawWear::Text(String::new())),
            ..Default::default()
        };
        assert_eq!(blank_existing.hint(&fixture.stored_parts).severity, Severity::Warn);

        let empty_new = PartRowInput::default();
        assert_eq!(empty_new.hint(&fixture.stored_parts).severity, Severity::Ok);

        let worn = row(1, RawWear::Float(91.7));
        assert_eq!(worn.hint(&fixture.stored_parts).severity, Severity::Crit);
    }

    #[test]
    fn valid_rows_become_changes_in_order() {
        let fixture = Fixture::new();

        let submission = InspectionSubmission {
            action: SubmitAction::Sign,
            comment: String::from("  front left knocks "),
            parts: vec![
                row(1, RawWear::Int(85)),
                PartRowInput {
                    id: Some(10),
                    delete: true,
                    ..Default::default()
                },
                PartRowInput {
                    delete: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let valid = validate_submission(&submission, &fixture.ctx()).unwrap();

        assert!(valid.sign);
        assert_eq!(valid.fields.comment, "front left knocks");
        assert_eq!(valid.changes.len(), 2);
        assert!(matches!(
            &valid.changes[0],
            PartChange::Save { id: None, values } if values.wear_percent == 85 && values.severity.is_none()
        ));
        assert_eq!(valid.changes[1], PartChange::Delete(10));
    }

    #[test]
    fn deleted_rows_skip_field_validation() {
        let fixture = Fixture::new();

        let submission = InspectionSubmission {
            parts: vec![PartRowInput {
                id: Some(10),
                delete: true,
                wear_percent: Some(RawWear::Int(500)),
                reason: "x".repeat(100),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(validate_submission(&submission, &fixture.ctx()).is_ok());
    }

    #[test]
    fn collects_the_errors_of_every_row_and_field() {
        let fixture = Fixture::new();

        let submission = InspectionSubmission {
            mileage_km: Some(-5),
            parts: vec![
                row(1, RawWear::Int(20)),
                row(99, RawWear::Int(120)),
                PartRowInput {
                    id: Some(777),
                    part_type_id: Some(1),
                    wear_percent: Some(RawWear::Int(10)),
                    reason: "r".repeat(65),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let errors = validate_submission(&submission, &fixture.ctx()).unwrap_err();

        assert_eq!(errors.form_errors.len(), 1);
        assert_eq!(errors.form_errors[0].field, "mileageKm");

        assert!(errors.row_errors[0].is_empty());
        assert_eq!(
            errors.row_errors[1],
            vec![
                FieldError::new("partTypeId", UNKNOWN_PART_TYPE),
                FieldError::new("wearPercent", WEAR_OUT_OF_RANGE),
            ]
        );
        assert_eq!(
            errors.row_errors[2],
            vec![
                FieldError::new("id", FOREIGN_PART),
                FieldError::new("reason", TOO_LONG),
            ]
        );
    }

    #[test]
    fn unknown_inspectors_are_rejected() {
        let fixture = Fixture::new();

        let ctx = FormContext {
            inspector_exists: false,
            ..fixture.ctx()
        };

        let submission = InspectionSubmission {
            inspector_id: Some(3),
            ..Default::default()
        };

        let errors = validate_submission(&submission, &ctx).unwrap_err();

        assert_eq!(
            errors.form_errors,
            vec![FieldError::new("inspectorId", UNKNOWN_INSPECTOR)]
        );
    }

    #[test]
    fn feedback_echoes_every_row() {
        let fixture = Fixture::new();
        let rows = vec![row(1, RawWear::Int(75)), row(2, RawWear::Text(String::from("?")))];
        let row_errors = vec![Vec::new(), vec![FieldError::new("wearPercent", WEAR_NOT_A_WHOLE_NUMBER)]];

        let feedback = part_feedback(&rows, &row_errors, &fixture.stored_parts);

        assert_eq!(feedback.len(), 2);
        assert_eq!(feedback[0].hint.severity, Severity::Crit);
        assert!(feedback[0].errors.is_empty());
        assert_eq!(feedback[1].hint.severity, Severity::Ok);
        assert_eq!(feedback[1].errors.len(), 1);

        let unvalidated = part_feedback(&rows, &[], &fixture.stored_parts);
        assert!(unvalidated.iter().all(|row| row.errors.is_empty()));
    }

    #[test]
    fn deserializes_html_like_rows() {
        let submission: InspectionSubmission = serde_json::from_str(
            r#"{
                "action": "sign",
                "overallRisk": "high",
                "parts": [
                    { "partTypeId": 1, "wearPercent": "85", "severity": "" },
                    { "partTypeId": 2, "wearPercent": 30, "severity": "ok", "needsReplacement": true }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(submission.action, SubmitAction::Sign);
        assert!(submission.lift_used);
        assert!(!submission.test_drive);
        assert_eq!(submission.overall_risk, OverallRisk::High);
        assert_eq!(submission.parts[0].severity, None);
        assert_eq!(submission.parts[0].wear_percent, Some(RawWear::Text(String::from("85"))));
        assert_eq!(submission.parts[1].severity, Some(Severity::Ok));
        assert_eq!(submission.parts[1].wear_percent, Some(RawWear::Int(30)));
    }
}
