use thiserror::Error;

/// Errors from the few fallible surfaces of the crate.
///
/// Parsing and rendering themselves are total: unrecognized or malformed
/// input degrades to preserved [`crate::Node::Unknown`] nodes or best-effort
/// defaults instead of failing.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GerberError {
    #[error("aperture codes below 10 are reserved, got {code}")]
    ApertureCodeReserved { code: i32 },
    #[error("expected input to contain exactly one command, found {count}")]
    NotASingleCommand { count: usize },
}
