//! Edge list input
//!
//! Reads SNAP-style edge lists: one edge per line as two whitespace-separated
//! node ids, with `#` comment lines. Lines are parsed lazily so arbitrarily
//! large files stream through in constant memory.

use std::io::BufRead;

use crate::graph::{Edge, NodeId};

/// Error while reading an edge list
#[derive(Debug)]
pub enum ParseError {
    /// Underlying reader failed
    Io(std::io::Error),
    /// Line does not hold exactly two fields
    Malformed { line: usize },
    /// Field is not a non-negative integer
    InvalidNode { line: usize, token: String },
    /// Both endpoints are the same node
    SelfLoop { line: usize, node: NodeId },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Io(err) => write!(f, "read failed: {}", err),
            ParseError::Malformed { line } => {
                write!(f, "line {}: expected two node ids", line)
            }
            ParseError::InvalidNode { line, token } => {
                write!(f, "line {}: invalid node id {:?}", line, token)
            }
            ParseError::SelfLoop { line, node } => {
                write!(f, "line {}: self-loop on node {}", line, node)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err)
    }
}

/// Iterator over the edges of an edge list
///
/// Comment lines (starting with `#`) and blank lines are skipped. Each
/// error carries the 1-based line number it was found on.
///
/// # Example
///
/// ```
/// use streamtri::graph::Edge;
/// use streamtri::io::EdgeListReader;
///
/// let data = "# FromNodeId\tToNodeId\n1\t2\n\n2\t3\n";
/// let edges: Vec<Edge> = EdgeListReader::new(data.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(edges, vec![Edge::new(1, 2).unwrap(), Edge::new(2, 3).unwrap()]);
/// ```
pub struct EdgeListReader<R> {
    reader: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> EdgeListReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
        }
    }

    /// Number of lines consumed so far, comments included
    pub fn lines_read(&self) -> usize {
        self.line
    }

    fn parse_line(&self, text: &str) -> Result<Edge, ParseError> {
        let mut fields = text.split_whitespace();
        let (u, v) = match (fields.next(), fields.next(), fields.next()) {
            (Some(u), Some(v), None) => (u, v),
            _ => return Err(ParseError::Malformed { line: self.line }),
        };

        let u = self.parse_node(u)?;
        let v = self.parse_node(v)?;
        Edge::new(u, v).map_err(|_| ParseError::SelfLoop {
            line: self.line,
            node: u,
        })
    }

    fn parse_node(&self, token: &str) -> Result<NodeId, ParseError> {
        token.parse().map_err(|_| ParseError::InvalidNode {
            line: self.line,
            token: token.to_string(),
        })
    }
}

impl<R: BufRead> Iterator for EdgeListReader<R> {
    type Item = Result<Edge, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(err) => return Some(Err(err.into())),
            }

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(self.parse_line(text));
        }
    }
}
