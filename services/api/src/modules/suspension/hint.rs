use serde::Serialize;
use shared::constants::Severity;
use utoipa::ToSchema;

/// wear from which replacing the part is recommended
pub const REPLACE_FROM_WEAR: i64 = 70;

/// wear from which the part should be observed and rechecked
pub const OBSERVE_FROM_WEAR: i64 = 40;

/// Advisory shown next to a inspected part, derived only from its wear.
///
/// it seeds the severity of parts submitted without one but never changes
/// a severity chosen by the inspector nor the `needs_replacement` flag
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementHint {
    pub text: String,
    pub severity: Severity,
}

/// Computes the replacement hint of a part, missing wear counts as 0
pub fn replacement_hint(wear: Option<i64>) -> ReplacementHint {
    let wear = wear.unwrap_or(0);

    let (text, severity) = if wear >= REPLACE_FROM_WEAR {
        ("Recommendation: replace", Severity::Crit)
    } else if wear >= OBSERVE_FROM_WEAR {
        ("Recommendation: observe / recheck", Severity::Warn)
    } else {
        ("Recommendation: no replacement needed", Severity::Ok)
    };

    ReplacementHint {
        text: String::from(text),
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_the_wear_thresholds() {
        for wear in 0..=100 {
            let expected = match wear {
                w if w >= 70 => Severity::Crit,
                w if w >= 40 => Severity::Warn,
                _ => Severity::Ok,
            };

            assert_eq!(replacement_hint(Some(wear)).severity, expected, "wear {}", wear);
        }
    }

    #[test]
    fn boundaries() {
        assert_eq!(replacement_hint(Some(39)).severity, Severity::Ok);
        assert_eq!(replacement_hint(Some(40)).severity, Severity::Warn);
        assert_eq!(replacement_hint(Some(69)).severity, Severity::Warn);
        assert_eq!(replacement_hint(Some(70)).severity, Severity::Crit);
        assert_eq!(replacement_hint(Some(70)).text, "Recommendation: replace");
    }

    #[test]
    fn missing_wear_is_zero() {
        assert_eq!(replacement_hint(None), replacement_hint(Some(0)));
    }
}
