//! Declared-type metadata.
//!
//! [`TypeMetadata`] is what a caller knows about the static type of a value
//! before any masking rules are resolved: the class name, its type arguments,
//! array components, bounded variables and wildcards, and the annotations at
//! every one of those positions. It is turned into a [`Shape`](super::Shape)
//! once, by `Desensitizer::build_descriptor`.

use std::fmt;

use crate::strategy::{StrategyId, StrategyMarker};

/// Annotation attached to a type position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// Apply the strategy registered under this identifier.
    Strategy(StrategyId),
    /// Recurse into the object's fields.
    Cascade,
}

impl Annotation {
    /// Name reserved for [`Annotation::Cascade`] in signatures.
    pub const CASCADE: &'static str = "Cascade";

    pub fn strategy(id: impl Into<StrategyId>) -> Self {
        Self::Strategy(id.into())
    }

    /// Annotation naming a marker type's strategy.
    pub fn of<M: StrategyMarker>() -> Self {
        Self::Strategy(StrategyId::of::<M>())
    }

    /// Annotation for a name as written after `@` in a signature.
    pub(crate) fn from_name(name: &str) -> Self {
        if name == Self::CASCADE {
            Self::Cascade
        } else {
            Self::Strategy(StrategyId::from(name.to_owned()))
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Strategy(id) => write!(f, "@{id}"),
            Annotation::Cascade => write!(f, "@{}", Self::CASCADE),
        }
    }
}

/// Statically declared type of a value, with annotations per position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeMetadata {
    /// A named type, generic when `arguments` is non-empty.
    Class {
        name: String,
        annotations: Vec<Annotation>,
        arguments: Vec<TypeMetadata>,
    },
    Array {
        annotations: Vec<Annotation>,
        component: Box<TypeMetadata>,
    },
    /// A type parameter such as `T` or `T extends Bound`.
    Variable {
        name: String,
        annotations: Vec<Annotation>,
        bounds: Vec<TypeMetadata>,
    },
    /// `?`, `? extends Upper` or `? super Lower`.
    Wildcard {
        annotations: Vec<Annotation>,
        upper: Vec<TypeMetadata>,
        lower: Vec<TypeMetadata>,
    },
}

impl TypeMetadata {
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class {
            name: name.into(),
            annotations: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn generic<I>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = TypeMetadata>,
    {
        Self::Class {
            name: name.into(),
            annotations: Vec::new(),
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn array(component: TypeMetadata) -> Self {
        Self::Array {
            annotations: Vec::new(),
            component: Box::new(component),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable {
            name: name.into(),
            annotations: Vec::new(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded_variable<I>(name: impl Into<String>, bounds: I) -> Self
    where
        I: IntoIterator<Item = TypeMetadata>,
    {
        Self::Variable {
            name: name.into(),
            annotations: Vec::new(),
            bounds: bounds.into_iter().collect(),
        }
    }

    /// Unbounded `?`.
    pub fn wildcard() -> Self {
        Self::Wildcard {
            annotations: Vec::new(),
            upper: Vec::new(),
            lower: Vec::new(),
        }
    }

    pub fn wildcard_extends<I>(upper: I) -> Self
    where
        I: IntoIterator<Item = TypeMetadata>,
    {
        Self::Wildcard {
            annotations: Vec::new(),
            upper: upper.into_iter().collect(),
            lower: Vec::new(),
        }
    }

    pub fn wildcard_super<I>(lower: I) -> Self
    where
        I: IntoIterator<Item = TypeMetadata>,
    {
        Self::Wildcard {
            annotations: Vec::new(),
            upper: Vec::new(),
            lower: lower.into_iter().collect(),
        }
    }

    /// Appends an annotation at this position.
    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations_mut().push(annotation);
        self
    }

    /// Appends a marker type's strategy annotation at this position.
    #[must_use]
    pub fn sensitive<M: StrategyMarker>(self) -> Self {
        self.annotated(Annotation::of::<M>())
    }

    /// Appends [`Annotation::Cascade`] at this position.
    #[must_use]
    pub fn cascaded(self) -> Self {
        self.annotated(Annotation::Cascade)
    }

    /// Annotates the element position: the innermost component reached
    /// through arrays, single-argument collections (`List`, `Set`,
    /// `Collection`) and the value argument of `Map`, or this position when
    /// it is none of these.
    ///
    /// This is the position `#[sensitive(..)]` and `#[cascade]` bind to on a
    /// derived field, so `Vec<String>` masks each string and
    /// `HashMap<String, String>` masks each value.
    #[must_use]
    pub fn annotate_elements(mut self, annotation: Annotation) -> Self {
        match &mut self {
            TypeMetadata::Array { component, .. } => {
                let inner = std::mem::replace(component.as_mut(), TypeMetadata::wildcard());
                **component = inner.annotate_elements(annotation);
            }
            TypeMetadata::Class {
                name, arguments, ..
            } if arguments.len() == 1 && is_collection(name) => {
                let inner = arguments.remove(0);
                arguments.push(inner.annotate_elements(annotation));
            }
            TypeMetadata::Class {
                name, arguments, ..
            } if arguments.len() == 2 && is_map(name) => {
                let inner = arguments.remove(1);
                arguments.push(inner.annotate_elements(annotation));
            }
            _ => self.annotations_mut().push(annotation),
        }
        self
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            TypeMetadata::Class { annotations, .. }
            | TypeMetadata::Array { annotations, .. }
            | TypeMetadata::Variable { annotations, .. }
            | TypeMetadata::Wildcard { annotations, .. } => annotations,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        match self {
            TypeMetadata::Class { annotations, .. }
            | TypeMetadata::Array { annotations, .. }
            | TypeMetadata::Variable { annotations, .. }
            | TypeMetadata::Wildcard { annotations, .. } => annotations,
        }
    }
}

/// Last segment of a dotted or `::`-separated type name.
pub(crate) fn simple_name(name: &str) -> &str {
    name.rsplit(['.', ':']).next().unwrap_or(name)
}

pub(crate) fn is_collection(name: &str) -> bool {
    matches!(simple_name(name), "List" | "Set" | "Collection")
}

pub(crate) fn is_map(name: &str) -> bool {
    simple_name(name) == "Map"
}

fn write_annotations(f: &mut fmt::Formatter<'_>, annotations: &[Annotation]) -> fmt::Result {
    for annotation in annotations {
        write!(f, "{annotation} ")?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeMetadata], separator: &str) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Renders the metadata in signature syntax, so the output parses back with
/// [`TypeMetadata::parse`].
impl fmt::Display for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMetadata::Class {
                name,
                annotations,
                arguments,
            } => {
                write_annotations(f, annotations)?;
                f.write_str(name)?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    write_list(f, arguments, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            // Array annotations have no signature syntax of their own.
            TypeMetadata::Array { component, .. } => write!(f, "{component}[]"),
            TypeMetadata::Variable {
                name,
                annotations,
                bounds,
            } => {
                write_annotations(f, annotations)?;
                write!(f, "${name}")?;
                if !bounds.is_empty() {
                    f.write_str(" extends ")?;
                    write_list(f, bounds, " & ")?;
                }
                Ok(())
            }
            TypeMetadata::Wildcard {
                annotations,
                upper,
                lower,
            } => {
                write_annotations(f, annotations)?;
                f.write_str("?")?;
                if !upper.is_empty() {
                    f.write_str(" extends ")?;
                    write_list(f, upper, " & ")?;
                } else if !lower.is_empty() {
                    f.write_str(" super ")?;
                    write_list(f, lower, " & ")?;
                }
                Ok(())
            }
        }
    }
}
