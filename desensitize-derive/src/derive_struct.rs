//! Struct-specific `Cascade` derivation.
//!
//! This module generates the per-field pieces of the derived impls (values,
//! rebuild assignments, declared metadata) and collects generic parameters
//! that require trait bounds.

use proc_macro2::{Ident, TokenStream};
use quote::{quote, quote_spanned};
use syn::{DataStruct, LitStr, Member, Result, spanned::Spanned};

use crate::{
    crate_path,
    generics::{collect_generics_from_type, replace_type_params},
    strategy::{Strategy, StrategyRef, parse_field_strategy},
    types::{is_phantom_data, is_scalar_type},
};

#[derive(Default)]
pub(crate) struct StructOutput {
    pub(crate) field_names: Vec<LitStr>,
    pub(crate) field_values: Vec<TokenStream>,
    pub(crate) rebuild_assignments: Vec<TokenStream>,
    pub(crate) field_metadata: Vec<TokenStream>,
    pub(crate) used_generics: Vec<Ident>,
}

pub(crate) fn derive_struct(
    type_name: &LitStr,
    data: DataStruct,
    generics: &syn::Generics,
) -> Result<StructOutput> {
    let private = crate_path("cascade::__private");
    let mut output = StructOutput::default();

    for (index, field) in data.fields.into_iter().enumerate() {
        let span = field.span();
        let strategy = parse_field_strategy(&field.attrs)?;
        let ty = &field.ty;

        if is_phantom_data(ty) {
            let annotated = match &strategy {
                Strategy::NotSensitive => false,
                Strategy::Traverse {
                    strategies,
                    cascade,
                } => *cascade || !strategies.is_empty(),
                Strategy::Declared(_) => true,
            };
            if annotated {
                return Err(syn::Error::new(
                    span,
                    "PhantomData fields carry no data and cannot be annotated",
                ));
            }
            continue;
        }

        let (member, name) = match &field.ident {
            Some(ident) => (
                Member::Named(ident.clone()),
                LitStr::new(&ident.to_string(), ident.span()),
            ),
            None => (
                Member::Unnamed(syn::Index::from(index)),
                LitStr::new(&index.to_string(), span),
            ),
        };

        let metadata = match &strategy {
            Strategy::NotSensitive => continue,
            Strategy::Declared(signature) => {
                let field_metadata = crate_path("FieldMetadata");
                quote_spanned! { span => #field_metadata::signature(#name, #signature) }
            }
            Strategy::Traverse {
                strategies,
                cascade,
            } => {
                if *cascade && is_scalar_type(ty) {
                    return Err(syn::Error::new(
                        span,
                        "#[cascade] cannot be applied to a primitive type",
                    ));
                }
                described_metadata(&name, ty, generics, strategies, *cascade)
            }
        };

        collect_generics_from_type(ty, generics, &mut output.used_generics);
        output.field_values.push(quote_spanned! { span =>
            #private::field_value(&self.#member)
        });
        output.rebuild_assignments.push(quote_spanned! { span =>
            next.#member = #private::take_field(&mut fields, #type_name, #name)?;
        });
        output.field_metadata.push(metadata);
        output.field_names.push(name);
    }

    Ok(output)
}

fn described_metadata(
    name: &LitStr,
    ty: &syn::Type,
    generics: &syn::Generics,
    strategies: &[StrategyRef],
    cascade: bool,
) -> TokenStream {
    let describe = crate_path("Describe");
    let annotation = crate_path("Annotation");
    let strategy_id = crate_path("StrategyId");
    let field_metadata = crate_path("FieldMetadata");

    let mut described = ty.clone();
    replace_type_params(&mut described, generics);

    let mut metadata = quote! { <#described as #describe>::type_metadata() };
    for strategy in strategies {
        let id = match strategy {
            StrategyRef::Marker(path) => quote! { #strategy_id::of::<#path>() },
            StrategyRef::Id(id) => quote! { #strategy_id::from_static(#id) },
        };
        metadata = quote! { #metadata.annotate_elements(#annotation::Strategy(#id)) };
    }
    if cascade {
        metadata = quote! { #metadata.annotate_elements(#annotation::Cascade) };
    }
    quote! { #field_metadata::new(#name, #metadata) }
}
