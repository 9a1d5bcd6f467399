//! `@CustomKey` and `@NotifyCustomKey` comment annotations.

use tracing::warn;

use super::KeyExpression;
use crate::source::{Comment, Node, SourceFile};

/// Which annotation a comment carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// Keys a read statement listens under.
    CustomKey,
    /// Keys a mutation notifies.
    NotifyCustomKey,
}

impl AnnotationKind {
    /// All kinds.
    pub const ALL: [Self; 2] = [Self::CustomKey, Self::NotifyCustomKey];

    /// The prefix, trailing space included, that introduces this annotation.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::CustomKey => "@CustomKey ",
            Self::NotifyCustomKey => "@NotifyCustomKey ",
        }
    }
}

/// A parsed annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The annotation kind.
    pub kind: AnnotationKind,
    /// The key expression following the prefix.
    pub expression: KeyExpression,
}

impl Annotation {
    /// Parses a comment. Comments that are not annotations, or have no
    /// expression after the prefix, yield `None`.
    #[must_use]
    pub fn from_comment(comment: &Comment, statement: &str) -> Option<Self> {
        let cleaned = comment.body().trim();
        let (kind, rest) = AnnotationKind::ALL
            .into_iter()
            .find_map(|kind| cleaned.strip_prefix(kind.prefix()).map(|rest| (kind, rest)))?;

        let rest = rest.trim();
        if rest.is_empty() {
            return None;
        }

        let (expression, dropped) = KeyExpression::scan(rest);
        if dropped > 0 {
            warn!(
                statement = %statement,
                expression = %rest,
                dropped,
                "Dropped empty parameter reference in key annotation"
            );
        }
        Some(Self { kind, expression })
    }
}

/// Annotations attached to the statement at `index`, in source order.
///
/// Only the contiguous comments and whitespace immediately before the
/// statement are considered; any other node ends the run.
#[must_use]
pub fn extract_annotations(file: &SourceFile, index: usize) -> Vec<Annotation> {
    let statement = match file.nodes().get(index) {
        Some(Node::Statement(statement)) => statement.name.as_str(),
        _ => return vec![],
    };

    let mut annotations: Vec<_> = file
        .leading_trivia(index)
        .iter()
        .rev()
        .filter_map(|node| match node {
            Node::Comment(comment) => Annotation::from_comment(comment, statement),
            _ => None,
        })
        .collect();
    annotations.reverse();
    annotations
}
