//! N-Triples and N-Quads

use super::{ParseError, ParseResult, RdfFormat, SerializeError, SerializeResult};
use crate::factory::DataFactory;
use crate::namespace::xsd;
use crate::statement::Statement;
use crate::term::{BlankNode, Literal, NamedNode, Term};
use rio_api::formatter::{QuadsFormatter, TriplesFormatter};
use rio_api::model;
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{NQuadsFormatter, NQuadsParser, NTriplesFormatter, NTriplesParser};
use rustc_hash::FxHashMap;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Blank node labels scoped to one document. Each label gets a fresh node
/// from the factory the first time it is seen.
struct BlankScope<'f> {
    factory: &'f dyn DataFactory,
    nodes: FxHashMap<String, BlankNode>,
}

impl<'f> BlankScope<'f> {
    fn new(factory: &'f dyn DataFactory) -> Self {
        Self {
            factory,
            nodes: FxHashMap::default(),
        }
    }

    fn get(&mut self, label: &str) -> BlankNode {
        if let Some(node) = self.nodes.get(label) {
            return node.clone();
        }
        let node = self.factory.blank_node(None);
        self.nodes.insert(label.to_string(), node.clone());
        node
    }
}

/// Parse N-Triples. Statements are put in the factory's default graph.
///
/// Blank node labels are local to `input`: they are replaced by fresh nodes,
/// so separately parsed documents never share anonymous resources.
pub fn parse_ntriples(input: &str, factory: &dyn DataFactory) -> ParseResult<Vec<Statement>> {
    let mut parser = NTriplesParser::new(input.as_bytes());
    let mut statements = Vec::new();
    let mut blanks = BlankScope::new(factory);
    parser.parse_all(&mut |t| -> ParseResult<()> {
        let statement = factory.quad(
            subject_term(t.subject, &mut blanks)?,
            Term::NamedNode(factory.named_node(t.predicate.iri)?),
            object_term(t.object, &mut blanks)?,
            None,
        )?;
        statements.push(statement);
        Ok(())
    })?;
    debug!("Parsed {} N-Triples statements", statements.len());
    Ok(statements)
}

/// Parse N-Quads. Quads without a graph go in the factory's default graph.
/// Blank node labels are scoped as in [`parse_ntriples`].
pub fn parse_nquads(input: &str, factory: &dyn DataFactory) -> ParseResult<Vec<Statement>> {
    let mut parser = NQuadsParser::new(input.as_bytes());
    let mut statements = Vec::new();
    let mut blanks = BlankScope::new(factory);
    parser.parse_all(&mut |q| -> ParseResult<()> {
        let graph = match q.graph_name {
            Some(model::GraphName::NamedNode(n)) => Some(Term::NamedNode(factory.named_node(n.iri)?)),
            Some(model::GraphName::BlankNode(b)) => {
                return Err(ParseError::Unsupported(format!("blank node graph _:{}", b.id)))
            }
            None => None,
        };
        let statement = factory.quad(
            subject_term(q.subject, &mut blanks)?,
            Term::NamedNode(factory.named_node(q.predicate.iri)?),
            object_term(q.object, &mut blanks)?,
            graph,
        )?;
        statements.push(statement);
        Ok(())
    })?;
    debug!("Parsed {} N-Quads statements", statements.len());
    Ok(statements)
}

/// Read a `.nt` or `.nq` file
pub fn read_file(path: impl AsRef<Path>, factory: &dyn DataFactory) -> ParseResult<Vec<Statement>> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)?;
    match RdfFormat::from_path(path) {
        Some(RdfFormat::NTriples) => parse_ntriples(&input, factory),
        Some(RdfFormat::NQuads) => parse_nquads(&input, factory),
        None => Err(ParseError::UnknownFormat(path.display().to_string())),
    }
}

/// Serialize statements as N-Triples, dropping graphs
pub fn write_ntriples<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> SerializeResult<String> {
    let output = write_ntriples_to(statements, Vec::new())?;
    String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
}

pub fn write_ntriples_to<'a, W: Write>(
    statements: impl IntoIterator<Item = &'a Statement>,
    mut writer: W,
) -> SerializeResult<W> {
    let mut formatter = NTriplesFormatter::new(&mut writer);
    for statement in statements {
        let triple = model::Triple {
            subject: rio_subject(&statement.subject)?,
            predicate: rio_predicate(&statement.predicate)?,
            object: rio_object(&statement.object)?,
        };
        formatter.format(&triple)?;
    }
    drop(formatter);
    writer.flush()?;
    Ok(writer)
}

/// Serialize statements as N-Quads. Statements in the RDF default graph are
/// written without a graph.
pub fn write_nquads<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> SerializeResult<String> {
    let output = write_nquads_to(statements, Vec::new())?;
    String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
}

pub fn write_nquads_to<'a, W: Write>(
    statements: impl IntoIterator<Item = &'a Statement>,
    mut writer: W,
) -> SerializeResult<W> {
    let mut formatter = NQuadsFormatter::new(&mut writer);
    for statement in statements {
        let quad = model::Quad {
            subject: rio_subject(&statement.subject)?,
            predicate: rio_predicate(&statement.predicate)?,
            object: rio_object(&statement.object)?,
            graph_name: rio_graph(&statement.graph)?,
        };
        formatter.format(&quad)?;
    }
    drop(formatter);
    writer.flush()?;
    Ok(writer)
}

fn subject_term(subject: model::Subject<'_>, blanks: &mut BlankScope<'_>) -> ParseResult<Term> {
    match subject {
        model::Subject::NamedNode(n) => Ok(Term::NamedNode(blanks.factory.named_node(n.iri)?)),
        model::Subject::BlankNode(b) => Ok(Term::BlankNode(blanks.get(b.id))),
        _ => Err(ParseError::Unsupported("quoted triple subject".to_string())),
    }
}

fn object_term(object: model::Term<'_>, blanks: &mut BlankScope<'_>) -> ParseResult<Term> {
    match object {
        model::Term::NamedNode(n) => Ok(Term::NamedNode(blanks.factory.named_node(n.iri)?)),
        model::Term::BlankNode(b) => Ok(Term::BlankNode(blanks.get(b.id))),
        model::Term::Literal(model::Literal::Simple { value }) => {
            Ok(Term::Literal(Literal::new_simple(value)))
        }
        model::Term::Literal(model::Literal::LanguageTaggedString { value, language }) => {
            Ok(Term::Literal(Literal::new_language_tagged(value, language)))
        }
        model::Term::Literal(model::Literal::Typed { value, datatype }) => Ok(Term::Literal(
            Literal::new_typed(value, NamedNode::new(datatype.iri)?),
        )),
        _ => Err(ParseError::Unsupported("quoted triple object".to_string())),
    }
}

fn unsupported(term: &Term, position: &'static str) -> SerializeError {
    SerializeError::Unsupported {
        term: term.to_string(),
        position,
    }
}

fn rio_subject(term: &Term) -> SerializeResult<model::Subject<'_>> {
    match term {
        Term::NamedNode(n) => Ok(model::Subject::NamedNode(model::NamedNode { iri: n.as_str() })),
        Term::BlankNode(b) => Ok(model::Subject::BlankNode(model::BlankNode { id: b.as_str() })),
        other => Err(unsupported(other, "subject")),
    }
}

fn rio_predicate(term: &Term) -> SerializeResult<model::NamedNode<'_>> {
    match term {
        Term::NamedNode(n) => Ok(model::NamedNode { iri: n.as_str() }),
        other => Err(unsupported(other, "predicate")),
    }
}

fn rio_object(term: &Term) -> SerializeResult<model::Term<'_>> {
    match term {
        Term::NamedNode(n) => Ok(model::Term::NamedNode(model::NamedNode { iri: n.as_str() })),
        Term::BlankNode(b) => Ok(model::Term::BlankNode(model::BlankNode { id: b.as_str() })),
        Term::Literal(l) => Ok(model::Term::Literal(rio_literal(l))),
        other => Err(unsupported(other, "object")),
    }
}

fn rio_literal(literal: &Literal) -> model::Literal<'_> {
    if let Some(language) = literal.language() {
        model::Literal::LanguageTaggedString {
            value: literal.value(),
            language,
        }
    } else if literal.datatype().as_str() == xsd::STRING {
        model::Literal::Simple {
            value: literal.value(),
        }
    } else {
        model::Literal::Typed {
            value: literal.value(),
            datatype: model::NamedNode {
                iri: literal.datatype().as_str(),
            },
        }
    }
}

fn rio_graph(term: &Term) -> SerializeResult<Option<model::GraphName<'_>>> {
    match term {
        Term::DefaultGraph => Ok(None),
        Term::NamedNode(n) => Ok(Some(model::GraphName::NamedNode(model::NamedNode {
            iri: n.as_str(),
        }))),
        Term::BlankNode(b) => Ok(Some(model::GraphName::BlankNode(model::BlankNode {
            id: b.as_str(),
        }))),
        other => Err(unsupported(other, "graph")),
    }
}
