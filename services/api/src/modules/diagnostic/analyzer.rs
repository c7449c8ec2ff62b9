use anyhow::Context;
use serde::Deserialize;
use std::{collections::HashMap, path::Path};

/// description used for codes missing from the table
pub const UNKNOWN_CODE_DESCRIPTION: &str = "Unknown code";

/// recommendation used for codes missing from the table
pub const NO_RECOMMENDATION: &str = "No recommendation.";

/// Description and workshop recommendation of a diagnostic trouble code
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DtcEntry {
    pub description: String,
    pub recommendation: String,
}

/// Static lookup table of diagnostic trouble codes (DTC), loaded once at startup
/// from a JSON object in the format `{ "<CODE>": { "description", "recommendation" } }`
#[derive(Debug, Default, Clone)]
pub struct DtcTable {
    entries: HashMap<String, DtcEntry>,
}

impl DtcTable {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries = serde_json::from_str::<HashMap<String, DtcEntry>>(json)?
            .into_iter()
            .map(|(code, entry)| (normalize(&code), entry))
            .collect();

        Ok(DtcTable { entries })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read DTC table {}", path.display()))?;

        let table = Self::from_json(&json)
            .with_context(|| format!("invalid DTC table {}", path.display()))?;

        tracing::info!("[DTC] loaded {} codes from {}", table.len(), path.display());

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, code: &str) -> Option<&DtcEntry> {
        self.entries.get(&normalize(code))
    }

    /// Builds the textual recommendation for the detected codes, one paragraph per code
    /// in the order they were given, codes missing from the table get a fallback paragraph
    pub fn analyze<S: AsRef<str>>(&self, codes: &[S]) -> String {
        codes
            .iter()
            .map(|code| {
                let code = code.as_ref();

                match self.lookup(code) {
                    Some(entry) => format!(
                        "{} — {}\n→ {}",
                        code, entry.description, entry.recommendation
                    ),
                    None => format!(
                        "{} — {}\n→ {}",
                        code, UNKNOWN_CODE_DESCRIPTION, NO_RECOMMENDATION
                    ),
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DtcTable {
        DtcTable::from_json(
            r#"{
                "P0171": {
                    "description": "System too lean (bank 1)",
                    "recommendation": "Check for vacuum leaks"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn known_codes_get_their_description_and_recommendation() {
        let text = table().analyze(&["P0171"]);

        assert_eq!(
            text,
            "P0171 — System too lean (bank 1)\n→ Check for vacuum leaks"
        );
    }

    #[test]
    fn unknown_codes_get_the_fallback_entry() {
        let text = table().analyze(&["P0171", "P0420"]);

        assert!(text.contains("System too lean (bank 1)"));
        assert!(text.contains("P0420 — Unknown code\n→ No recommendation."));
        assert_eq!(text.split("\n\n").count(), 2);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let table = table();

        assert!(table.lookup(" p0171 ").is_some());
        assert!(table.lookup("P0300").is_none());
    }

    #[test]
    fn no_codes_means_no_recommendation() {
        assert_eq!(table().analyze::<&str>(&[]), "");
    }

    #[test]
    fn bundled_table_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/dtc_data.json");
        let table = DtcTable::load(&path).unwrap();

        assert!(!table.is_empty());
        assert!(table.lookup("P0171").is_some());
    }
}
