//! Cell values and reconciliation metadata.

use serde::{Deserialize, Serialize};

/// Value stored in a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    /// An error recorded in place of a value.
    Error { error: String },
}

impl CellValue {
    /// Text representation used as provider input. Errors have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Boolean(b) => Some(b.to_string()),
            CellValue::Error { .. } => None,
        }
    }
}

/// Reconciliation judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
    #[default]
    None,
    Matched,
    New,
}

/// A candidate identifier proposed for a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub score: f64,
}

/// Reconciliation state of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recon {
    pub judgment: Judgment,
    pub judgment_action: String,
    pub service: String,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<ReconCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_rank: Option<usize>,
    #[serde(default)]
    pub candidates: Vec<ReconCandidate>,
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recon: Option<Recon>,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            recon: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            value: CellValue::Error {
                error: message.into(),
            },
            recon: None,
        }
    }

    pub fn with_recon(mut self, recon: Recon) -> Self {
        self.recon = Some(recon);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.value, CellValue::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_json_forms() {
        let values: Vec<CellValue> = serde_json::from_str(r#"["a", 2.5, true, {"error": "boom"}]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Text("a".to_string()),
                CellValue::Number(2.5),
                CellValue::Boolean(true),
                CellValue::Error {
                    error: "boom".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Number(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(Cell::error("x").value.as_text(), None);
    }
}
