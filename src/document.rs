use crate::ast::{ApertureDefinition, Attribute, CoordinateFormat, Node, Operation, Unit};
use crate::error::GerberError;
use std::fmt;

/// Representation of a Gerber document: the ordered sequence of commands
/// exactly as they appeared in the source.
///
/// The sequence is append-only; nodes are immutable once constructed.
/// Serializing with [`GerberDoc::to_source`] re-emits every node in order,
/// which gives round-trip fidelity for recognized commands (modulo each
/// node's canonical spelling) and byte-for-byte preservation of unknown
/// ones.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GerberDoc {
    nodes: Vec<Node>,
}

impl GerberDoc {
    pub fn new() -> GerberDoc {
        Self::default()
    }

    /// Parse a Gerber source into a document. Never fails; see [`crate::parse`].
    pub fn parse(source: &str) -> GerberDoc {
        crate::parser::parse(source)
    }

    /// Parse a source expected to contain exactly one command.
    ///
    /// This is the convenience used to build single nodes from text, and the
    /// only fallible parse surface: input yielding zero or several nodes is
    /// rejected.
    pub fn single_command(source: &str) -> Result<Node, GerberError> {
        let mut nodes = crate::parser::parse(source).nodes;
        match nodes.len() {
            1 => Ok(nodes.remove(0)),
            count => Err(GerberError::NotASingleCommand { count }),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Append a single node.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Parse a source fragment and append every resulting node.
    pub fn push_source(&mut self, source: &str) {
        self.nodes.extend(crate::parser::parse(source).nodes);
    }

    /// Append an `M02*` terminator unless the document already has one.
    pub fn ensure_end_of_file(&mut self) {
        if !self.nodes.iter().any(|node| matches!(node, Node::EndOfFile)) {
            self.nodes.push(Node::EndOfFile);
        }
    }

    /// Serialize the document: one command per line, trailing newline.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            out.push_str(&node.to_string());
            out.push('\n');
        }
        out
    }

    /// The first format specification, which governs every coordinate
    /// literal in the file.
    pub fn format_specification(&self) -> Option<&CoordinateFormat> {
        self.nodes.iter().find_map(|node| match node {
            Node::FormatSpecification(fs) => Some(fs),
            _ => None,
        })
    }

    /// The first unit mode declaration.
    pub fn unit(&self) -> Option<Unit> {
        self.nodes.iter().find_map(|node| match node {
            Node::UnitMode(unit) => Some(*unit),
            _ => None,
        })
    }

    pub fn aperture_definitions(&self) -> impl Iterator<Item = &ApertureDefinition> {
        self.nodes.iter().filter_map(|node| match node {
            Node::ApertureDefinition(def) => Some(def),
            _ => None,
        })
    }

    pub fn file_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.nodes.iter().filter_map(|node| match node {
            Node::FileAttribute(attr) => Some(attr),
            _ => None,
        })
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Operation(op) => Some(op),
            _ => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Comment(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for GerberDoc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "GerberDoc")?;
        writeln!(f, "- units: {:?}", self.unit())?;
        match self.format_specification() {
            None => writeln!(f, "- no format spec!")?,
            Some(fs) => writeln!(
                f,
                "- format spec: X{}.{} Y{}.{}",
                fs.x_integer, fs.x_decimal, fs.y_integer, fs.y_decimal
            )?,
        }
        writeln!(f, "- apertures: ")?;
        for def in self.aperture_definitions() {
            writeln!(f, "\t {}", def.code)?;
        }
        write!(f, "- commands: {}", self.nodes.len())
    }
}
