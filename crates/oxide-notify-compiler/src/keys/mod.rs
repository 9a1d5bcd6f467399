//! Topic key expressions and the annotations that declare them.

mod annotation;
mod expression;

pub use annotation::{extract_annotations, Annotation, AnnotationKind};
pub use expression::{KeyExpression, Part, RenderError};
