//! Named entities and their disambiguation candidates.

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Judgment, Recon, ReconCandidate};

/// Reconciliation service recorded on cells produced from named entities.
pub const RECON_SERVICE: &str = "NamedEntity";

fn default_score() -> f64 {
    1.0
}

/// One candidate real-world identifier for a recognized span.
///
/// An empty `uri` means "no external identifier".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disambiguation {
    label: String,
    #[serde(default)]
    uri: String,
    #[serde(default = "default_score")]
    score: f64,
}

impl Disambiguation {
    pub fn new(label: impl Into<String>, uri: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            uri: uri.into(),
            score,
        }
    }

    /// A disambiguation without an identifier, scored 1.0.
    pub fn unlinked(label: impl Into<String>) -> Self {
        Self::new(label, "", 1.0)
    }

    /// A disambiguation with an identifier, scored 1.0.
    pub fn linked(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new(label, uri, 1.0)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn has_uri(&self) -> bool {
        !self.uri.is_empty()
    }

    fn to_candidate(&self) -> ReconCandidate {
        ReconCandidate {
            id: self.uri.clone(),
            name: self.label.clone(),
            types: Vec::new(),
            score: self.score,
        }
    }
}

/// A recognized text span with its ranked disambiguations.
///
/// The disambiguation list is never empty: an entity without candidates
/// carries a single unlinked disambiguation labelled with its own text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NamedEntityRecord")]
pub struct NamedEntity {
    extracted_text: String,
    disambiguations: Vec<Disambiguation>,
}

/// Wire form of a named entity, normalized on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamedEntityRecord {
    extracted_text: String,
    #[serde(default)]
    disambiguations: Vec<Disambiguation>,
}

impl From<NamedEntityRecord> for NamedEntity {
    fn from(record: NamedEntityRecord) -> Self {
        NamedEntity::with_disambiguations(record.extracted_text, record.disambiguations)
    }
}

impl NamedEntity {
    /// An entity without any external identifier.
    pub fn new(extracted_text: impl Into<String>) -> Self {
        let extracted_text = extracted_text.into();
        let disambiguations = vec![Disambiguation::unlinked(extracted_text.clone())];
        Self {
            extracted_text,
            disambiguations,
        }
    }

    /// An entity linked to a single identifier.
    pub fn with_uri(extracted_text: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::with_scored_uri(extracted_text, uri, 1.0)
    }

    /// An entity linked to a single identifier with a confidence score.
    pub fn with_scored_uri(
        extracted_text: impl Into<String>,
        uri: impl Into<String>,
        score: f64,
    ) -> Self {
        let extracted_text = extracted_text.into();
        let disambiguations = vec![Disambiguation::new(extracted_text.clone(), uri, score)];
        Self {
            extracted_text,
            disambiguations,
        }
    }

    /// An entity with explicit candidates. An empty list becomes the unlinked form.
    pub fn with_disambiguations(
        extracted_text: impl Into<String>,
        disambiguations: Vec<Disambiguation>,
    ) -> Self {
        if disambiguations.is_empty() {
            return Self::new(extracted_text);
        }
        Self {
            extracted_text: extracted_text.into(),
            disambiguations,
        }
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    pub fn disambiguations(&self) -> &[Disambiguation] {
        &self.disambiguations
    }

    /// Highest-scored disambiguation that has an identifier, with its position.
    /// The earliest one wins ties.
    pub fn best_match(&self) -> Option<(usize, &Disambiguation)> {
        let mut best: Option<(usize, &Disambiguation)> = None;
        for (rank, candidate) in self.disambiguations.iter().enumerate() {
            if !candidate.has_uri() {
                continue;
            }
            match best {
                Some((_, current)) if candidate.score <= current.score => {}
                _ => best = Some((rank, candidate)),
            }
        }
        best
    }

    /// Materialize the entity as a grid cell.
    ///
    /// The cell value is the extracted text. When at least one disambiguation
    /// carries an identifier, the cell is reconciled as matched against the
    /// best one, and every identified disambiguation becomes a candidate.
    pub fn to_cell(&self) -> Cell {
        let Some((position, best)) = self.best_match() else {
            return Cell::text(self.extracted_text.clone());
        };
        // Rank within the candidate list, which only holds identified entries
        let rank = self.disambiguations[..position]
            .iter()
            .filter(|d| d.has_uri())
            .count();

        let candidates = self
            .disambiguations
            .iter()
            .filter(|d| d.has_uri())
            .map(Disambiguation::to_candidate)
            .collect();

        let recon = Recon {
            judgment: Judgment::Matched,
            judgment_action: "auto".to_string(),
            service: RECON_SERVICE.to_string(),
            matched: Some(best.to_candidate()),
            match_rank: Some(rank),
            candidates,
        };

        Cell::text(self.extracted_text.clone()).with_recon(recon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;

    #[test]
    fn test_plain_text_entity_has_neutral_disambiguation() {
        let entity = NamedEntity::new("Lowell");
        assert_eq!(entity.disambiguations().len(), 1);
        assert_eq!(entity.disambiguations()[0], Disambiguation::new("Lowell", "", 1.0));
    }

    #[test]
    fn test_empty_disambiguations_are_normalized() {
        let entity = NamedEntity::with_disambiguations("USA", Vec::new());
        assert_eq!(entity, NamedEntity::new("USA"));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = Disambiguation::linked("A", "http://example.org/a");
        let b = Disambiguation::linked("B", "http://example.org/b");
        let first = NamedEntity::with_disambiguations("x", vec![a.clone(), b.clone()]);
        let second = NamedEntity::with_disambiguations("x", vec![b, a]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_to_cell_picks_best_identified_candidate() {
        let entity = NamedEntity::with_disambiguations(
            "some text",
            vec![
                Disambiguation::new("A", "http://example.org/1", 0.4),
                Disambiguation::new("B", "http://example.org/2", 0.9),
                Disambiguation::new("C", "", 1.0),
            ],
        );

        let cell = entity.to_cell();
        assert_eq!(cell.value, CellValue::Text("some text".to_string()));

        let recon = cell.recon.expect("cell should be reconciled");
        assert_eq!(recon.judgment, Judgment::Matched);
        let matched = recon.matched.expect("match should be set");
        assert_eq!(matched.id, "http://example.org/2");
        assert_eq!(matched.name, "B");
        assert_eq!(matched.score, 0.9);
        assert_eq!(recon.match_rank, Some(1));

        let ids: Vec<&str> = recon.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["http://example.org/1", "http://example.org/2"]);
    }

    #[test]
    fn test_to_cell_first_candidate_wins_ties() {
        let entity = NamedEntity::with_disambiguations(
            "some text",
            vec![
                Disambiguation::linked("a matching element", "http://foo.com/id1234"),
                Disambiguation::linked("another one", "http://foo.com/id5678"),
            ],
        );

        let recon = entity.to_cell().recon.unwrap();
        assert_eq!(recon.matched.unwrap().id, "http://foo.com/id1234");
        assert_eq!(recon.candidates[0].id, "http://foo.com/id1234");
        assert_eq!(recon.candidates[1].id, "http://foo.com/id5678");
    }

    #[test]
    fn test_to_cell_without_identifiers_is_plain_text() {
        let cell = NamedEntity::new("Konarka").to_cell();
        assert_eq!(cell.value, CellValue::Text("Konarka".to_string()));
        assert!(cell.recon.is_none());
    }

    #[test]
    fn test_json_shape() {
        let entity = NamedEntity::with_scored_uri("MA", "http://www.wikidata.org/entity/Q771", 0.5);
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "extractedText": "MA",
                "disambiguations": [
                    { "label": "MA", "uri": "http://www.wikidata.org/entity/Q771", "score": 0.5 }
                ]
            })
        );

        let back: NamedEntity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_json_without_disambiguations_loads_unlinked() {
        let entity: NamedEntity =
            serde_json::from_str(r#"{"extractedText":"USA","disambiguations":[]}"#).unwrap();
        assert_eq!(entity, NamedEntity::new("USA"));
    }
}
