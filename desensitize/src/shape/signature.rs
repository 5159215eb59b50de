//! Parser for annotated type signatures.
//!
//! The syntax mirrors how generic declarations are usually written:
//!
//! | form                       | meaning                                   |
//! |----------------------------|-------------------------------------------|
//! | `String`                   | plain class                               |
//! | `Map<K, V>`                | generic class                             |
//! | `String[]`                 | array (annotations bind to the component) |
//! | `$T`, `$T extends A & B`   | type variable with optional bounds        |
//! | `?`, `? extends A`, `? super A` | wildcard                             |
//! | `@Email String`            | annotated position                        |
//!
//! `@Cascade` is reserved and produces [`Annotation::Cascade`]; any other
//! annotation names a strategy identifier.

use pest::{
    Parser,
    error::{Error as PestError, LineColLocation},
    iterators::Pair,
};
use pest_derive::Parser;

use super::metadata::{Annotation, TypeMetadata};
use crate::error::ConfigError;

#[derive(Parser)]
#[grammar = "shape/signature.pest"]
struct SignatureParser;

impl TypeMetadata {
    /// Parses an annotated type signature.
    ///
    /// ```rust
    /// use desensitize::{Annotation, TypeMetadata};
    ///
    /// let metadata = TypeMetadata::parse("List<@Email String>").unwrap();
    /// assert_eq!(
    ///     metadata,
    ///     TypeMetadata::generic(
    ///         "List",
    ///         [TypeMetadata::class("String").annotated(Annotation::strategy("Email"))],
    ///     )
    /// );
    /// ```
    pub fn parse(signature: &str) -> Result<Self, ConfigError> {
        let mut pairs = SignatureParser::parse(Rule::signature, signature)
            .map_err(|error| signature_error(signature, &error))?;
        pairs
            .next()
            .and_then(|pair| pair.into_inner().find(|inner| inner.as_rule() == Rule::type_sig))
            .map(type_sig)
            .ok_or_else(|| ConfigError::Signature {
                signature: signature.to_owned(),
                message: "empty signature".to_owned(),
            })
    }
}

impl std::str::FromStr for TypeMetadata {
    type Err = ConfigError;

    fn from_str(signature: &str) -> Result<Self, Self::Err> {
        Self::parse(signature)
    }
}

fn signature_error(signature: &str, error: &PestError<Rule>) -> ConfigError {
    let column = match error.line_col {
        LineColLocation::Pos((_, column)) | LineColLocation::Span((_, column), _) => column,
    };
    ConfigError::Signature {
        signature: signature.to_owned(),
        message: format!("{} at column {column}", error.variant.message()),
    }
}

fn type_sig(pair: Pair<'_, Rule>) -> TypeMetadata {
    let mut annotations = Vec::new();
    let mut primary = TypeMetadata::wildcard();
    let mut dimensions = 0usize;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::annotation => annotations.push(annotation(inner)),
            Rule::wildcard => primary = wildcard(inner),
            Rule::variable => primary = variable(inner),
            Rule::class => primary = class(inner),
            Rule::array_suffix => dimensions += 1,
            _ => {}
        }
    }

    primary.annotations_mut().extend(annotations);
    (0..dimensions).fold(primary, |component, _| TypeMetadata::array(component))
}

fn annotation(pair: Pair<'_, Rule>) -> Annotation {
    let name = pair
        .into_inner()
        .find(|inner| inner.as_rule() == Rule::path)
        .map_or("", |inner| inner.as_str());
    Annotation::from_name(name)
}

fn bounds(pair: Pair<'_, Rule>) -> Vec<TypeMetadata> {
    pair.into_inner()
        .filter(|inner| inner.as_rule() == Rule::type_sig)
        .map(type_sig)
        .collect()
}

fn wildcard(pair: Pair<'_, Rule>) -> TypeMetadata {
    let mut upper = Vec::new();
    let mut lower = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::upper_bounds => upper = bounds(inner),
            Rule::lower_bounds => lower = bounds(inner),
            _ => {}
        }
    }
    TypeMetadata::Wildcard {
        annotations: Vec::new(),
        upper,
        lower,
    }
}

fn variable(pair: Pair<'_, Rule>) -> TypeMetadata {
    let mut name = String::new();
    let mut upper = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::variable_name => {
                name = inner
                    .into_inner()
                    .find(|part| part.as_rule() == Rule::ident)
                    .map_or_else(String::new, |part| part.as_str().to_owned());
            }
            Rule::upper_bounds => upper = bounds(inner),
            _ => {}
        }
    }
    TypeMetadata::bounded_variable(name, upper)
}

fn class(pair: Pair<'_, Rule>) -> TypeMetadata {
    let mut name = String::new();
    let mut arguments = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::path => name = inner.as_str().to_owned(),
            Rule::type_arguments => arguments = bounds(inner),
            _ => {}
        }
    }
    TypeMetadata::generic(name, arguments)
}
