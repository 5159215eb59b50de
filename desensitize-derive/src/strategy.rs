//! Parsing of `#[sensitive(...)]`, `#[cascade]`, `#[shape(...)]` and
//! `#[not_sensitive]` field attributes.
//!
//! This module maps attribute syntax to traversal decisions and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{
    Attribute, LitStr, Meta, Result, Token,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
};

/// One entry of `#[sensitive(...)]`.
#[derive(Clone, Debug)]
pub(crate) enum StrategyRef {
    /// A marker type implementing `StrategyMarker` (`Email`, `my::Marker`).
    Marker(syn::Path),
    /// A strategy identifier given as a string literal.
    Id(LitStr),
}

impl Parse for StrategyRef {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(StrategyRef::Id)
        } else {
            input.parse().map(StrategyRef::Marker)
        }
    }
}

/// How a field takes part in traversal.
///
/// | Attribute                    | Strategy                          |
/// |------------------------------|-----------------------------------|
/// | None                         | `Traverse` with no annotations    |
/// | `#[sensitive(A, "b")]`       | `Traverse { strategies: [A, b] }` |
/// | `#[cascade]`                 | `Traverse { cascade: true }`      |
/// | `#[shape("List<@A String>")]`| `Declared(signature)`             |
/// | `#[not_sensitive]`           | `NotSensitive`                    |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// Described from the field type, with annotations on its element
    /// position.
    Traverse {
        strategies: Vec<StrategyRef>,
        cascade: bool,
    },
    /// Declared type given explicitly as a signature.
    Declared(LitStr),
    /// Not reported to the engine; copied unchanged on rebuild.
    NotSensitive,
}

#[derive(Default)]
struct Found {
    sensitive: Option<(Vec<StrategyRef>, Span)>,
    cascade: Option<Span>,
    shape: Option<(LitStr, Span)>,
    not_sensitive: Option<Span>,
}

fn set_once<T>(target: &mut Option<T>, next: T, span: Span, name: &str) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            format!("multiple #[{name}] attributes on the same field"),
        ));
    }
    *target = Some(next);
    Ok(())
}

fn conflict(span: Span, first: &str, second: &str) -> syn::Error {
    syn::Error::new(
        span,
        format!("#[{first}] cannot be combined with #[{second}] on the same field"),
    )
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut found = Found::default();
    for attr in attrs {
        if attr.path().is_ident("not_sensitive") {
            match &attr.meta {
                Meta::Path(_) => {
                    set_once(&mut found.not_sensitive, attr.span(), attr.span(), "not_sensitive")?;
                }
                _ => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "#[not_sensitive] does not take arguments",
                    ));
                }
            }
        } else if attr.path().is_ident("cascade") {
            match &attr.meta {
                Meta::Path(_) => {
                    set_once(&mut found.cascade, attr.span(), attr.span(), "cascade")?;
                }
                _ => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "#[cascade] on a field does not take arguments",
                    ));
                }
            }
        } else if attr.path().is_ident("shape") {
            let signature = match &attr.meta {
                Meta::List(list) => syn::parse2::<LitStr>(list.tokens.clone()).map_err(|_| {
                    syn::Error::new(
                        attr.span(),
                        "expected a signature string (e.g., #[shape(\"List<@Email String>\")])",
                    )
                })?,
                _ => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "expected #[shape(\"signature\")] syntax",
                    ));
                }
            };
            set_once(&mut found.shape, (signature, attr.span()), attr.span(), "shape")?;
        } else if attr.path().is_ident("sensitive") {
            let strategies = match &attr.meta {
                Meta::Path(_) => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "missing strategy: use #[sensitive(Strategy)] \
                         (e.g., #[sensitive(Email)], #[sensitive(\"BankCard\")])",
                    ));
                }
                Meta::List(list) => list
                    .parse_args_with(Punctuated::<StrategyRef, Token![,]>::parse_terminated)
                    .map_err(|_| {
                        syn::Error::new(
                            attr.span(),
                            "expected marker types or identifier strings \
                             (e.g., #[sensitive(Email)], #[sensitive(\"BankCard\")])",
                        )
                    })?,
                Meta::NameValue(_) => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "expected #[sensitive(Strategy)] syntax \
                         (e.g., #[sensitive(Email)], #[sensitive(PhoneNumber, \"Audit\")])",
                    ));
                }
            };
            if strategies.is_empty() {
                return Err(syn::Error::new(
                    attr.span(),
                    "missing strategy: #[sensitive()] names no strategy",
                ));
            }
            set_once(
                &mut found.sensitive,
                (strategies.into_iter().collect(), attr.span()),
                attr.span(),
                "sensitive",
            )?;
        }
    }

    if let Some(span) = found.not_sensitive {
        if found.sensitive.is_some() {
            return Err(conflict(span, "not_sensitive", "sensitive"));
        }
        if found.cascade.is_some() {
            return Err(conflict(span, "not_sensitive", "cascade"));
        }
        if found.shape.is_some() {
            return Err(conflict(span, "not_sensitive", "shape"));
        }
        return Ok(Strategy::NotSensitive);
    }

    if let Some((signature, span)) = found.shape {
        if found.sensitive.is_some() {
            return Err(conflict(span, "shape", "sensitive"));
        }
        if found.cascade.is_some() {
            return Err(conflict(span, "shape", "cascade"));
        }
        return Ok(Strategy::Declared(signature));
    }

    Ok(Strategy::Traverse {
        strategies: found.sensitive.map(|(list, _)| list).unwrap_or_default(),
        cascade: found.cascade.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    fn error_of(tokens: proc_macro2::TokenStream) -> String {
        let attrs = parse_attrs(tokens);
        parse_field_strategy(&attrs).unwrap_err().to_string()
    }

    #[test]
    fn no_attribute_traverses_without_annotations() {
        let attrs = parse_attrs(quote! {});
        let strategy = parse_field_strategy(&attrs).unwrap();
        assert!(matches!(
            strategy,
            Strategy::Traverse { ref strategies, cascade: false } if strategies.is_empty()
        ));
    }

    #[test]
    fn bare_sensitive_errors_with_missing_strategy() {
        assert!(error_of(quote! { #[sensitive] }).contains("missing strategy"));
        assert!(error_of(quote! { #[sensitive()] }).contains("missing strategy"));
    }

    #[test]
    fn sensitive_keeps_markers_and_ids_in_order() {
        let attrs = parse_attrs(quote! { #[sensitive(PhoneNumber, "Audit", my::Marker)] });
        let Strategy::Traverse { strategies, cascade } = parse_field_strategy(&attrs).unwrap()
        else {
            panic!("expected Traverse");
        };
        assert!(!cascade);
        assert_eq!(strategies.len(), 3);
        assert!(matches!(&strategies[0], StrategyRef::Marker(path) if path.is_ident("PhoneNumber")));
        assert!(matches!(&strategies[1], StrategyRef::Id(id) if id.value() == "Audit"));
        assert!(matches!(&strategies[2], StrategyRef::Marker(path) if path.segments.len() == 2));
    }

    #[test]
    fn sensitive_and_cascade_combine() {
        let attrs = parse_attrs(quote! {
            #[cascade]
            #[sensitive(Email)]
        });
        let strategy = parse_field_strategy(&attrs).unwrap();
        assert!(matches!(strategy, Strategy::Traverse { cascade: true, ref strategies } if strategies.len() == 1));
    }

    #[test]
    fn repeated_attributes_error() {
        assert!(
            error_of(quote! {
                #[sensitive(Email)]
                #[sensitive(PhoneNumber)]
            })
            .contains("multiple #[sensitive]")
        );
        assert!(
            error_of(quote! {
                #[cascade]
                #[cascade]
            })
            .contains("multiple #[cascade]")
        );
    }

    #[test]
    fn name_value_syntax_error() {
        assert!(error_of(quote! { #[sensitive = "value"] }).contains("#[sensitive(Strategy)]"));
    }

    #[test]
    fn invalid_strategy_syntax_error() {
        assert!(error_of(quote! { #[sensitive(123)] }).contains("expected marker types"));
    }

    #[test]
    fn shape_takes_a_signature() {
        let attrs = parse_attrs(quote! { #[shape("Map<@ChineseName String, @Cascade Person>")] });
        let strategy = parse_field_strategy(&attrs).unwrap();
        assert!(matches!(
            strategy,
            Strategy::Declared(ref signature) if signature.value().starts_with("Map<")
        ));
        assert!(error_of(quote! { #[shape(List)] }).contains("signature string"));
        assert!(error_of(quote! { #[shape = "List"] }).contains("#[shape(\"signature\")]"));
    }

    #[test]
    fn shape_conflicts_with_inline_annotations() {
        assert!(
            error_of(quote! {
                #[shape("String")]
                #[sensitive(Email)]
            })
            .contains("cannot be combined")
        );
    }

    #[test]
    fn other_attributes_ignored() {
        let attrs = parse_attrs(quote! {
            #[derive(Clone)]
            #[serde(skip)]
        });
        let strategy = parse_field_strategy(&attrs).unwrap();
        assert!(matches!(strategy, Strategy::Traverse { cascade: false, .. }));
    }

    #[test]
    fn not_sensitive_returns_not_sensitive() {
        let attrs = parse_attrs(quote! { #[not_sensitive] });
        let strategy = parse_field_strategy(&attrs).unwrap();
        assert!(matches!(strategy, Strategy::NotSensitive));
    }

    #[test]
    fn not_sensitive_with_args_errors() {
        assert!(error_of(quote! { #[not_sensitive(foo)] }).contains("does not take arguments"));
        assert!(error_of(quote! { #[cascade(name = "X")] }).contains("does not take arguments"));
    }

    #[test]
    fn sensitive_and_not_sensitive_errors() {
        assert!(
            error_of(quote! {
                #[sensitive(Email)]
                #[not_sensitive]
            })
            .contains("cannot be combined")
        );
    }
}
