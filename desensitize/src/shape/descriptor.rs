//! Shape descriptors.
//!
//! A [`Shape`] is the resolved, immutable form of a declared type: every
//! position knows its kind, the strategies annotated on it, and whether
//! anything at or below it needs masking. The walker only ever reads shapes,
//! so one descriptor can be cached per declared signature and shared across
//! threads.

use std::{fmt, sync::Arc};

use crate::strategy::StrategyId;

/// Kind of a shape position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// A non-generic class; masked leaves live here.
    Scalar { name: String },
    /// A generic class with type arguments as children.
    Parameterized { raw: String },
    /// An array with its component as the only child.
    Array,
    /// A type variable with its bounds as children.
    TypeVariable { name: String },
    /// A wildcard with its effective bounds as children.
    Wildcard,
    /// A type whose fields are walked by the cascade reflector. Children are
    /// its type arguments, if any.
    Cascaded { type_name: String },
}

#[derive(Debug)]
struct Node {
    kind: ShapeKind,
    annotations: Vec<StrategyId>,
    cascade_requested: bool,
    children: Vec<Shape>,
    needs_masking: bool,
}

/// Resolved descriptor of a declared type. Cloning is cheap.
#[derive(Clone)]
pub struct Shape(Arc<Node>);

impl Shape {
    fn from_parts(
        kind: ShapeKind,
        annotations: Vec<StrategyId>,
        cascade_requested: bool,
        children: Vec<Shape>,
    ) -> Self {
        let needs_masking = !annotations.is_empty()
            || cascade_requested
            || children.iter().any(Shape::needs_masking);
        Self(Arc::new(Node {
            kind,
            annotations,
            cascade_requested,
            children,
            needs_masking,
        }))
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::from_parts(
            ShapeKind::Scalar { name: name.into() },
            Vec::new(),
            false,
            Vec::new(),
        )
    }

    pub fn parameterized<I>(raw: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = Shape>,
    {
        Self::from_parts(
            ShapeKind::Parameterized { raw: raw.into() },
            Vec::new(),
            false,
            arguments.into_iter().collect(),
        )
    }

    pub fn array(component: Shape) -> Self {
        Self::from_parts(ShapeKind::Array, Vec::new(), false, vec![component])
    }

    pub fn type_variable<I>(name: impl Into<String>, bounds: I) -> Self
    where
        I: IntoIterator<Item = Shape>,
    {
        Self::from_parts(
            ShapeKind::TypeVariable { name: name.into() },
            Vec::new(),
            false,
            bounds.into_iter().collect(),
        )
    }

    pub fn wildcard<I>(bounds: I) -> Self
    where
        I: IntoIterator<Item = Shape>,
    {
        Self::from_parts(
            ShapeKind::Wildcard,
            Vec::new(),
            false,
            bounds.into_iter().collect(),
        )
    }

    /// A cascaded position. The caller is responsible for the type having a
    /// cascade binding; `Desensitizer::build_descriptor` checks this.
    pub fn cascaded<I>(type_name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = Shape>,
    {
        Self::from_parts(
            ShapeKind::Cascaded {
                type_name: type_name.into(),
            },
            Vec::new(),
            true,
            arguments.into_iter().collect(),
        )
    }

    /// Returns this shape with `id` appended to its annotations.
    #[must_use]
    pub fn with_annotation(&self, id: impl Into<StrategyId>) -> Self {
        self.with_annotations([id.into()])
    }

    #[must_use]
    pub fn with_annotations<I>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = StrategyId>,
    {
        let mut annotations = self.0.annotations.clone();
        annotations.extend(ids);
        Self::from_parts(
            self.0.kind.clone(),
            annotations,
            self.0.cascade_requested,
            self.0.children.clone(),
        )
    }

    /// Returns this shape with `annotations` placed ahead of its own.
    pub(crate) fn with_leading(&self, annotations: &[StrategyId], cascade_requested: bool) -> Self {
        if annotations.is_empty() && (!cascade_requested || self.0.cascade_requested) {
            return self.clone();
        }
        let mut merged = annotations.to_vec();
        merged.extend(self.0.annotations.iter().cloned());
        Self::from_parts(
            self.0.kind.clone(),
            merged,
            self.0.cascade_requested || cascade_requested,
            self.0.children.clone(),
        )
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.0.kind
    }

    /// Strategy identifiers in declaration order.
    pub fn annotations(&self) -> &[StrategyId] {
        &self.0.annotations
    }

    pub fn cascade_requested(&self) -> bool {
        self.0.cascade_requested
    }

    pub fn children(&self) -> &[Shape] {
        &self.0.children
    }

    /// `true` when this position or any position below it is annotated or
    /// cascaded. Computed once at construction.
    pub fn needs_masking(&self) -> bool {
        self.0.needs_masking
    }

    /// `true` when strategies annotated here reach a leaf: a scalar, or a
    /// variable or wildcard whose first bound does. Annotations on arrays,
    /// generic classes and cascaded types have nothing to apply to.
    pub(crate) fn accepts_strategies(&self) -> bool {
        match self.kind() {
            ShapeKind::Scalar { .. } => true,
            ShapeKind::TypeVariable { .. } | ShapeKind::Wildcard => self
                .children()
                .first()
                .is_none_or(Shape::accepts_strategies),
            ShapeKind::Parameterized { .. } | ShapeKind::Array | ShapeKind::Cascaded { .. } => {
                false
            }
        }
    }

    pub fn ptr_eq(&self, other: &Shape) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Replaces type variables named in `params` with the matching shape
    /// from `arguments`. Annotations on the variable position are kept ahead
    /// of the argument's own.
    ///
    /// Returns the same allocation when nothing was substituted.
    #[must_use]
    pub fn substitute(&self, params: &[&str], arguments: &[Shape]) -> Self {
        if params.is_empty() || arguments.is_empty() {
            return self.clone();
        }
        if let ShapeKind::TypeVariable { name } = &self.0.kind {
            if let Some(argument) = params
                .iter()
                .position(|param| param == name)
                .and_then(|index| arguments.get(index))
            {
                return argument.with_leading(self.annotations(), self.cascade_requested());
            }
        }

        let children: Vec<Shape> = self
            .0
            .children
            .iter()
            .map(|child| child.substitute(params, arguments))
            .collect();
        if children
            .iter()
            .zip(&self.0.children)
            .all(|(new, old)| new.ptr_eq(old))
        {
            return self.clone();
        }
        Self::from_parts(
            self.0.kind.clone(),
            self.0.annotations.clone(),
            self.0.cascade_requested,
            children,
        )
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.0.kind == other.0.kind
                && self.0.annotations == other.0.annotations
                && self.0.cascade_requested == other.0.cascade_requested
                && self.0.children == other.0.children)
    }
}

impl Eq for Shape {}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({self})")
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, children: &[Shape], separator: &str) -> fmt::Result {
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    Ok(())
}

/// Renders the shape in signature syntax.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.annotations() {
            write!(f, "@{id} ")?;
        }
        match self.kind() {
            ShapeKind::Scalar { name } => f.write_str(name),
            ShapeKind::Parameterized { raw: name } | ShapeKind::Cascaded { type_name: name } => {
                if self.cascade_requested() {
                    f.write_str("@Cascade ")?;
                }
                f.write_str(name)?;
                if !self.children().is_empty() {
                    f.write_str("<")?;
                    write_children(f, self.children(), ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            ShapeKind::Array => {
                write_children(f, self.children(), "")?;
                f.write_str("[]")
            }
            ShapeKind::TypeVariable { name } => {
                write!(f, "${name}")?;
                if !self.children().is_empty() {
                    f.write_str(" extends ")?;
                    write_children(f, self.children(), " & ")?;
                }
                Ok(())
            }
            ShapeKind::Wildcard => {
                f.write_str("?")?;
                if !self.children().is_empty() {
                    f.write_str(" extends ")?;
                    write_children(f, self.children(), " & ")?;
                }
                Ok(())
            }
        }
    }
}
