//! Conversion errors and the per-element control-flow outcomes.

use thiserror::Error;
use vellum_dom::{NodeId, ReadError};

/// Errors that abort a whole conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input is not well-formed XML.
    #[error(transparent)]
    Markup(#[from] ReadError),
    /// The document has no root element.
    #[error("document has no root element")]
    EmptyDocument,
    /// The root element is not `<svg>`.
    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
    /// A node handed to the engine is not an element of the tree.
    #[error("node {0:?} is not an element of this document")]
    MissingNode(NodeId),
}

/// How processing of one element ended early.
///
/// The parent decides what happens next: a skipped child contributes no
/// calls and siblings carry on, while [`ElementError::Fatal`] propagates all
/// the way up.
#[derive(Debug, Error)]
pub enum ElementError {
    /// Drop the element without a warning (zero-sized shapes, definitions).
    #[error("element skipped")]
    SkipQuietly,
    /// Drop the element and record the message as a warning.
    #[error("{0}")]
    Skip(String),
    /// Abort the whole conversion.
    #[error(transparent)]
    Fatal(#[from] ConvertError),
}

/// Result type used by element handlers.
pub type ElementResult<T = ()> = Result<T, ElementError>;
