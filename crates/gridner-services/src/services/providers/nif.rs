//! NIF (NLP Interchange Format) services speaking Turtle.
//!
//! The request is a single `nif:Context` holding the text. The response is a
//! graph of annotations, each linking a `(begin, end)` span to an identifier.
//! Annotations sharing a span become one entity with several candidates.

use std::collections::HashMap;

use rio_api::model::{Literal, Subject, Term, Triple};
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser};

use gridner::models::{Disambiguation, NamedEntity};

use super::json::{parse_score, snippet};
use super::{Provider, ProviderConfig, ProviderError, ProviderRequest, ProviderSettings};

const RDF_PREFIX: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const NIF_PREFIX: &str = "http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#";
const ITSRDF_PREFIX: &str = "http://www.w3.org/2005/11/its/rdf#";
const XSD_PREFIX: &str = "http://www.w3.org/2001/XMLSchema#";

const DOCUMENT_URI: &str = "http://localhost/document/query";
const TURTLE: &str = "text/turtle";

#[derive(Debug, Clone)]
pub struct NifService {
    config: ProviderConfig,
}

impl Default for NifService {
    fn default() -> Self {
        Self {
            config: ProviderConfig {
                settings: ProviderSettings::new().declare("endpoint", ""),
                extraction: ProviderSettings::new(),
            },
        }
    }
}

impl NifService {
    pub fn with_endpoint(endpoint: &str) -> Self {
        let mut service = Self::default();
        service.config.settings.set("endpoint", endpoint);
        service
    }
}

impl Provider for NifService {
    fn kind(&self) -> &'static str {
        "nif"
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ProviderConfig {
        &mut self.config
    }

    fn is_configured(&self) -> bool {
        !self.config.settings.get("endpoint").is_empty()
    }

    fn build_request(
        &self,
        text: &str,
        _options: &ProviderSettings,
    ) -> Result<ProviderRequest, ProviderError> {
        let endpoint = self.config.settings.get("endpoint");
        let url = url::Url::parse(endpoint)
            .map_err(|e| ProviderError::InvalidRequest(format!("{}: {}", endpoint, e)))?;
        Ok(ProviderRequest::text(url, TURTLE, context_document(text)).with_header("Accept", TURTLE))
    }

    fn parse_body(&self, text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError> {
        parse_annotations(text, body)
    }
}

/// Turtle document describing `text` as a NIF context.
pub(crate) fn context_document(text: &str) -> String {
    format!(
        "@prefix itsrdf: <{itsrdf}> .\n\
         @prefix nif:    <{nif}> .\n\
         @prefix rdf:    <{rdf}> .\n\
         @prefix xsd:    <{xsd}> .\n\
         \n\
         <{document}>\n        \
         rdf:type        nif:Context , nif:String , nif:RFC5147String ;\n        \
         nif:beginIndex  \"0\"^^xsd:nonNegativeInteger ;\n        \
         nif:endIndex    \"{length}\"^^xsd:nonNegativeInteger ;\n        \
         nif:isString    \"{text}\" .\n",
        itsrdf = ITSRDF_PREFIX,
        nif = NIF_PREFIX,
        rdf = RDF_PREFIX,
        xsd = XSD_PREFIX,
        document = DOCUMENT_URI,
        length = text.chars().count(),
        text = escape_literal(text),
    )
}

fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Response graph
// ============================================================================

/// Owned RDF node; only the distinctions the adapter needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Node {
    Iri(String),
    Blank(String),
    Literal(String),
    Other,
}

impl Node {
    fn literal(&self) -> Option<&str> {
        match self {
            Node::Literal(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Statement {
    subject: Node,
    predicate: String,
    object: Node,
}

struct Graph {
    statements: Vec<Statement>,
}

impl Graph {
    fn parse(turtle: &str) -> Result<Self, ProviderError> {
        let mut statements = Vec::new();
        let mut parser = TurtleParser::new(turtle.as_bytes(), None);
        parser
            .parse_all(&mut |triple: Triple<'_>| -> Result<(), TurtleError> {
                let subject = match triple.subject {
                    Subject::NamedNode(node) => Node::Iri(node.iri.to_string()),
                    Subject::BlankNode(node) => Node::Blank(node.id.to_string()),
                    _ => Node::Other,
                };
                let object = match triple.object {
                    Term::NamedNode(node) => Node::Iri(node.iri.to_string()),
                    Term::BlankNode(node) => Node::Blank(node.id.to_string()),
                    Term::Literal(Literal::Simple { value })
                    | Term::Literal(Literal::LanguageTaggedString { value, .. })
                    | Term::Literal(Literal::Typed { value, .. }) => {
                        Node::Literal(value.to_string())
                    }
                    _ => Node::Other,
                };
                statements.push(Statement {
                    subject,
                    predicate: triple.predicate.iri.to_string(),
                    object,
                });
                Ok(())
            })
            .map_err(|e| {
                ProviderError::MalformedResponse(format!("invalid Turtle ({}): {}", e, snippet(turtle)))
            })?;
        Ok(Self { statements })
    }

    /// Subjects carrying `predicate`, in order of first appearance.
    fn subjects_with(&self, predicate: &str) -> Vec<&Node> {
        let mut subjects: Vec<&Node> = Vec::new();
        for statement in &self.statements {
            if statement.predicate == predicate && !subjects.contains(&&statement.subject) {
                subjects.push(&statement.subject);
            }
        }
        subjects
    }

    fn objects(&self, subject: &Node, predicate: &str) -> Vec<&Node> {
        self.statements
            .iter()
            .filter(|s| &s.subject == subject && s.predicate == predicate)
            .map(|s| &s.object)
            .collect()
    }

    fn object(&self, subject: &Node, predicate: &str) -> Option<&Node> {
        self.statements
            .iter()
            .find(|s| &s.subject == subject && s.predicate == predicate)
            .map(|s| &s.object)
    }
}

fn nif(local: &str) -> String {
    format!("{}{}", NIF_PREFIX, local)
}

fn itsrdf(local: &str) -> String {
    format!("{}{}", ITSRDF_PREFIX, local)
}

// ============================================================================
// Span aggregation
// ============================================================================

struct SpanGroup {
    extracted_text: String,
    disambiguations: Vec<Disambiguation>,
}

/// Turn a NIF response into entities, one per annotated span.
fn parse_annotations(text: &str, turtle: &str) -> Result<Vec<NamedEntity>, ProviderError> {
    let graph = Graph::parse(turtle)?;
    let text_chars: Vec<char> = text.chars().collect();

    let ident_ref = itsrdf("taIdentRef");
    let confidence = itsrdf("taConfidence");
    let anchor_of = nif("anchorOf");

    let mut order: Vec<(usize, usize)> = Vec::new();
    let mut groups: HashMap<(usize, usize), SpanGroup> = HashMap::new();

    for annotation in graph.subjects_with(&ident_ref) {
        let begin = offset(&graph, annotation, "beginIndex")?;
        let end = offset(&graph, annotation, "endIndex")?;
        if begin > end || end > text_chars.len() {
            return Err(ProviderError::MalformedResponse(format!(
                "span [{}, {}) is outside the text ({} characters)",
                begin,
                end,
                text_chars.len()
            )));
        }

        let surface = match graph.object(annotation, &anchor_of).and_then(Node::literal) {
            Some(anchor) => anchor.to_string(),
            None => text_chars[begin..end].iter().collect(),
        };

        let score = match graph.object(annotation, &confidence).and_then(Node::literal) {
            Some(value) => parse_score(value)?,
            None => 1.0,
        };

        // Literal identifiers cannot be linked and are skipped
        for identifier in graph.objects(annotation, &ident_ref) {
            let Node::Iri(uri) = identifier else {
                continue;
            };
            let label = label_of(&graph, identifier, uri);

            let group = groups.entry((begin, end)).or_insert_with(|| {
                order.push((begin, end));
                SpanGroup {
                    extracted_text: surface.clone(),
                    disambiguations: Vec::new(),
                }
            });
            group
                .disambiguations
                .push(Disambiguation::new(label, uri.clone(), score));
        }
    }

    let mut entities = Vec::with_capacity(order.len());
    for span in order {
        let Some(mut group) = groups.remove(&span) else {
            continue;
        };
        // Stable: equal scores keep their order of appearance
        group
            .disambiguations
            .sort_by(|a, b| b.score().total_cmp(&a.score()));
        entities.push(NamedEntity::with_disambiguations(
            group.extracted_text,
            group.disambiguations,
        ));
    }
    Ok(entities)
}

fn offset(graph: &Graph, annotation: &Node, property: &str) -> Result<usize, ProviderError> {
    let value = graph
        .object(annotation, &nif(property))
        .and_then(Node::literal)
        .ok_or_else(|| {
            ProviderError::MalformedResponse(format!("annotation without nif:{}", property))
        })?;
    value.trim().parse().map_err(|_| {
        ProviderError::MalformedResponse(format!("invalid nif:{} '{}'", property, value))
    })
}

/// `rdfs:label` of the identifier, or the last path segment of its IRI.
fn label_of(graph: &Graph, identifier: &Node, uri: &str) -> String {
    if let Some(label) = graph
        .objects(identifier, RDFS_LABEL)
        .into_iter()
        .find_map(Node::literal)
    {
        return label.to_string();
    }
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(uri)
        .to_string()
}
