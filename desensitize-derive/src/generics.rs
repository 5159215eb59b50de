//! Generic type parameter handling and trait bound management.
//!
//! This module adds bounds only for generics that are used by traversed
//! fields, and rewrites field types for declared-type metadata.
//!
//! ## PhantomData Handling
//!
//! `PhantomData<T>` fields are explicitly skipped when collecting generics:
//!
//! ```ignore
//! struct TypedId<T> {
//!     id: String,
//!     _marker: PhantomData<T>,  // T should NOT require IntoValue
//! }
//! ```
//!
//! Without this, `TypedId<DateTime<Utc>>` would need `DateTime<Utc>` to
//! convert into a `Value`, even though `_marker` is never traversed.
//!
//! ## Type parameter placeholders
//!
//! Field metadata is produced by `<FieldType as Describe>::type_metadata()`.
//! A type parameter has no metadata of its own, so each parameter `T` is
//! replaced by a local placeholder type whose metadata is the type variable
//! `$T`. The engine later substitutes the declared type argument.

use quote::format_ident;
use syn::{Ident, parse_quote};

use crate::crate_path;

fn push_if_generic(ident: &Ident, generics: &syn::Generics, result: &mut Vec<Ident>) {
    if generics.type_params().any(|param| param.ident == *ident)
        && !result.iter().any(|g| g == ident)
    {
        result.push(ident.clone());
    }
}

fn visit_type_param_bound(
    bound: &syn::TypeParamBound,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    if let syn::TypeParamBound::Trait(trait_bound) = bound {
        visit_path(&trait_bound.path, generics, result);
    }
}

fn visit_path_arguments(
    args: &syn::PathArguments,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    match args {
        syn::PathArguments::AngleBracketed(args) => {
            for arg in &args.args {
                match arg {
                    syn::GenericArgument::Type(inner_ty) => {
                        visit_type(inner_ty, generics, result);
                    }
                    syn::GenericArgument::AssocType(assoc) => {
                        visit_type(&assoc.ty, generics, result);
                    }
                    syn::GenericArgument::Constraint(constraint) => {
                        for bound in &constraint.bounds {
                            visit_type_param_bound(bound, generics, result);
                        }
                    }
                    _ => {}
                }
            }
        }
        syn::PathArguments::Parenthesized(args) => {
            for input in &args.inputs {
                visit_type(input, generics, result);
            }
            if let syn::ReturnType::Type(_, output) = &args.output {
                visit_type(output, generics, result);
            }
        }
        syn::PathArguments::None => {}
    }
}

fn visit_path(path: &syn::Path, generics: &syn::Generics, result: &mut Vec<Ident>) {
    if let Some(last_segment) = path.segments.last() {
        // PhantomData<T> is never traversed, so T needs no bounds.
        if last_segment.ident == "PhantomData" {
            return;
        }
    }

    for segment in &path.segments {
        push_if_generic(&segment.ident, generics, result);
        visit_path_arguments(&segment.arguments, generics, result);
    }
}

fn visit_type(ty: &syn::Type, generics: &syn::Generics, result: &mut Vec<Ident>) {
    match ty {
        syn::Type::Path(type_path) => {
            if let Some(qself) = &type_path.qself {
                visit_type(&qself.ty, generics, result);
            }
            visit_path(&type_path.path, generics, result);
        }
        syn::Type::Reference(reference) => visit_type(&reference.elem, generics, result),
        syn::Type::Ptr(pointer) => visit_type(&pointer.elem, generics, result),
        syn::Type::Slice(slice) => visit_type(&slice.elem, generics, result),
        syn::Type::Array(array) => visit_type(&array.elem, generics, result),
        syn::Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                visit_type(elem, generics, result);
            }
        }
        syn::Type::Paren(paren) => visit_type(&paren.elem, generics, result),
        syn::Type::Group(group) => visit_type(&group.elem, generics, result),
        syn::Type::TraitObject(obj) => {
            for bound in &obj.bounds {
                visit_type_param_bound(bound, generics, result);
            }
        }
        syn::Type::ImplTrait(impl_trait) => {
            for bound in &impl_trait.bounds {
                visit_type_param_bound(bound, generics, result);
            }
        }
        syn::Type::BareFn(bare_fn) => {
            for input in &bare_fn.inputs {
                visit_type(&input.ty, generics, result);
            }
            if let syn::ReturnType::Type(_, output) = &bare_fn.output {
                visit_type(output, generics, result);
            }
        }
        _ => {}
    }
}

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    visit_type(ty, generics, result);
}

/// Adds the conversion bounds traversal needs to generic parameters used in
/// traversed fields.
pub(crate) fn add_cascade_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    let into_value = crate_path("IntoValue");
    let from_value = crate_path("FromValue");
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            param.bounds.push(parse_quote!(#into_value));
            param.bounds.push(parse_quote!(#from_value));
            param.bounds.push(parse_quote!(::core::clone::Clone));
        }
    }
    generics
}

/// Adds `Describe` bounds to every type parameter, for the container's own
/// `Describe` impl.
pub(crate) fn add_describe_bounds(mut generics: syn::Generics) -> syn::Generics {
    let describe = crate_path("Describe");
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#describe));
    }
    generics
}

/// Name of the placeholder type standing in for type parameter `ident`.
pub(crate) fn placeholder_ident(ident: &Ident) -> Ident {
    format_ident!("__Describe{}", ident)
}

fn replace_in_path_arguments(args: &mut syn::PathArguments, generics: &syn::Generics) {
    if let syn::PathArguments::AngleBracketed(args) = args {
        for arg in &mut args.args {
            match arg {
                syn::GenericArgument::Type(inner_ty) => replace_type_params(inner_ty, generics),
                syn::GenericArgument::AssocType(assoc) => {
                    replace_type_params(&mut assoc.ty, generics);
                }
                _ => {}
            }
        }
    }
}

/// Replaces every type parameter of `generics` inside `ty` with its
/// placeholder (see [`placeholder_ident`]).
pub(crate) fn replace_type_params(ty: &mut syn::Type, generics: &syn::Generics) {
    match ty {
        syn::Type::Path(type_path) => {
            if let Some(qself) = &mut type_path.qself {
                replace_type_params(&mut qself.ty, generics);
            }
            let path = &mut type_path.path;
            if type_path.qself.is_none() && path.leading_colon.is_none() && path.segments.len() == 1
            {
                let segment = &mut path.segments[0];
                if segment.arguments.is_empty()
                    && generics
                        .type_params()
                        .any(|param| param.ident == segment.ident)
                {
                    segment.ident = placeholder_ident(&segment.ident);
                    return;
                }
            }
            for segment in &mut path.segments {
                replace_in_path_arguments(&mut segment.arguments, generics);
            }
        }
        syn::Type::Reference(reference) => replace_type_params(&mut reference.elem, generics),
        syn::Type::Slice(slice) => replace_type_params(&mut slice.elem, generics),
        syn::Type::Array(array) => replace_type_params(&mut array.elem, generics),
        syn::Type::Tuple(tuple) => {
            for elem in &mut tuple.elems {
                replace_type_params(elem, generics);
            }
        }
        syn::Type::Paren(paren) => replace_type_params(&mut paren.elem, generics),
        syn::Type::Group(group) => replace_type_params(&mut group.elem, generics),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use quote::{ToTokens, quote};

    use super::*;

    fn generics(tokens: proc_macro2::TokenStream) -> syn::Generics {
        syn::parse2(tokens).expect("should parse as Generics")
    }

    fn ty(tokens: proc_macro2::TokenStream) -> syn::Type {
        syn::parse2(tokens).expect("should parse as Type")
    }

    fn collected(field: proc_macro2::TokenStream, params: proc_macro2::TokenStream) -> Vec<String> {
        let mut result = Vec::new();
        collect_generics_from_type(&ty(field), &generics(params), &mut result);
        result.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn collects_nested_type_params_once() {
        assert_eq!(
            collected(quote! { HashMap<K, Vec<(V, K)>> }, quote! { <K, V, W> }),
            ["K", "V"]
        );
    }

    #[test]
    fn phantom_data_is_skipped() {
        assert!(collected(quote! { PhantomData<T> }, quote! { <T> }).is_empty());
        assert!(collected(quote! { std::marker::PhantomData<T> }, quote! { <T> }).is_empty());
    }

    #[test]
    fn replaces_params_with_placeholders() {
        let params = generics(quote! { <T, U> });
        let mut field = ty(quote! { Vec<Option<T>> });
        replace_type_params(&mut field, &params);
        assert_eq!(
            field.to_token_stream().to_string(),
            quote! { Vec<Option<__DescribeT>> }.to_string()
        );

        let mut bare = ty(quote! { U });
        replace_type_params(&mut bare, &params);
        assert_eq!(bare.to_token_stream().to_string(), "__DescribeU");
    }

    #[test]
    fn qualified_paths_are_left_alone() {
        let params = generics(quote! { <T> });
        let mut field = ty(quote! { my::T });
        replace_type_params(&mut field, &params);
        assert_eq!(field.to_token_stream().to_string(), quote! { my::T }.to_string());
    }

    #[test]
    fn bounds_only_touch_used_params() {
        let params = generics(quote! { <T, U> });
        let used = vec![format_ident!("T")];
        let bounded = add_cascade_bounds(params, &used);
        let bounds: Vec<usize> = bounded.type_params().map(|param| param.bounds.len()).collect();
        assert_eq!(bounds, [3, 0]);
    }
}
