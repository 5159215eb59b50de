//! Derive macro for `desensitize`.
//!
//! This crate generates the cascade capability behind `#[derive(Cascade)]`.
//! It:
//! - reads `#[sensitive(...)]`, `#[cascade]`, `#[shape(...)]` and
//!   `#[not_sensitive]` field attributes
//! - emits field enumeration, reconstruction and declared-type metadata
//!
//! It does **not** define strategies or markers. Those live in the main
//! `desensitize` crate and are looked up by identifier at runtime.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, GenericParam, LitStr, Result, parse_macro_input, parse_quote,
    spanned::Spanned,
};

mod container;
mod derive_struct;
mod generics;
mod strategy;
mod types;
use container::parse_container_options;
use derive_struct::derive_struct;
use generics::{add_cascade_bounds, add_describe_bounds, placeholder_ident};

/// Derives `desensitize::Cascade` (and related impls) for structs.
///
/// # Container Attributes
///
/// - `#[cascade(name = "...")]` - Declared type name used in signatures and
///   for the cascade binding. Defaults to the struct name.
///
/// # Field Attributes
///
/// - **No annotation**: The field is traversed against its described type.
///   Plain scalars pass through unchanged; derived cascade types describe as
///   cascaded and are walked.
///
/// - `#[sensitive(Email, "BankCard", ...)]`: Strategies applied in order.
///   Each entry is a marker type implementing `StrategyMarker` or an
///   identifier string. They bind to the element position, so on
///   `Vec<String>` each string is masked and on `HashMap<String, String>`
///   each value is. On a field whose element type is itself cascaded the
///   engine rejects the binding when the type is registered.
///
/// - `#[cascade]`: Walks the element (or map value) type's fields. The type
///   needs a cascade binding.
///
/// - `#[shape("Map<@ChineseName String, @Cascade Person>")]`: The declared
///   type as a signature, for positions the field attributes cannot reach.
///   Cannot be combined with `#[sensitive]` or `#[cascade]`.
///
/// - `#[not_sensitive]`: The field is not traversed and is copied unchanged on
///   rebuild. Use this for foreign types without value conversions.
///   `PhantomData` fields are treated this way automatically.
///
/// Enums, unions and structs with lifetime or const parameters are rejected
/// at compile time.
///
/// # Generated Impls
///
/// `Reconstruct`, `Cascade`, `IntoValue`, `FromValue` and `Describe`. The
/// struct itself must implement `Clone` and `Debug`, and be `Send + Sync +
/// 'static`.
#[proc_macro_derive(Cascade, attributes(sensitive, cascade, shape, not_sensitive))]
pub fn derive_cascade(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let data = match data {
        Data::Struct(data) => data,
        Data::Enum(e) => {
            return Err(syn::Error::new(
                e.enum_token.span(),
                "`Cascade` cannot be derived for enums",
            ));
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Cascade` cannot be derived for unions",
            ));
        }
    };

    for param in &generics.params {
        match param {
            GenericParam::Type(_) => {}
            GenericParam::Lifetime(lifetime) => {
                return Err(syn::Error::new(
                    lifetime.span(),
                    "`Cascade` types must be 'static; lifetime parameters are not supported",
                ));
            }
            GenericParam::Const(constant) => {
                return Err(syn::Error::new(
                    constant.span(),
                    "const parameters are not supported by `Cascade`",
                ));
            }
        }
    }

    let options = parse_container_options(&attrs)?;
    let type_name = options
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    let output = derive_struct(&type_name, data, &generics)?;

    let reconstruct = crate_path("Reconstruct");
    let cascade = crate_path("Cascade");
    let into_value = crate_path("IntoValue");
    let from_value = crate_path("FromValue");
    let describe = crate_path("Describe");
    let value = crate_path("Value");
    let mask_error = crate_path("MaskError");
    let value_error = crate_path("ValueError");
    let type_metadata = crate_path("TypeMetadata");
    let annotation = crate_path("Annotation");
    let field_metadata = crate_path("FieldMetadata");
    let private = crate_path("cascade::__private");

    let mut bounded = add_cascade_bounds(generics.clone(), &output.used_generics);
    bounded.make_where_clause().predicates.push(parse_quote! {
        Self: ::core::clone::Clone
            + ::core::fmt::Debug
            + ::core::marker::Send
            + ::core::marker::Sync
            + 'static
    });
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();

    let param_names: Vec<LitStr> = generics
        .type_params()
        .map(|param| LitStr::new(&param.ident.to_string(), param.ident.span()))
        .collect();
    let placeholders = generics.type_params().map(|param| {
        let placeholder = placeholder_ident(&param.ident);
        let name = LitStr::new(&param.ident.to_string(), param.ident.span());
        quote! {
            #[allow(dead_code)]
            struct #placeholder;

            impl #describe for #placeholder {
                fn type_metadata() -> #type_metadata {
                    #type_metadata::variable(#name)
                }
            }
        }
    });

    let field_names = &output.field_names;
    let field_values = &output.field_values;
    let rebuild_assignments = &output.rebuild_assignments;
    let field_metadata_exprs = &output.field_metadata;

    let describe_generics = add_describe_bounds(generics.clone());
    let (describe_impl_generics, _, describe_where_clause) = describe_generics.split_for_impl();
    let type_params: Vec<_> = generics.type_params().map(|param| &param.ident).collect();
    let declared = if type_params.is_empty() {
        quote! { #type_metadata::class(#type_name) }
    } else {
        quote! {
            #type_metadata::generic(
                #type_name,
                [#(<#type_params as #describe>::type_metadata()),*],
            )
        }
    };

    Ok(quote! {
        impl #impl_generics #reconstruct for #ident #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn field_names(&self) -> &'static [&'static str] {
                &[#(#field_names),*]
            }

            fn field_values(&self) -> ::std::vec::Vec<#value> {
                ::std::vec![#(#field_values),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn rebuild(
                &self,
                fields: ::std::vec::Vec<#value>,
            ) -> ::core::result::Result<#value, #mask_error> {
                let mut fields = fields.into_iter();
                let mut next = ::core::clone::Clone::clone(self);
                #(#rebuild_assignments)*
                ::core::result::Result::Ok(#value::object(next))
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }

        impl #impl_generics #cascade for #ident #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn type_params() -> &'static [&'static str] {
                &[#(#param_names),*]
            }

            fn fields() -> ::std::vec::Vec<#field_metadata> {
                #(#placeholders)*

                ::std::vec![#(#field_metadata_exprs),*]
            }
        }

        impl #impl_generics #into_value for #ident #ty_generics #where_clause {
            fn into_value(self) -> #value {
                #value::object(self)
            }
        }

        impl #impl_generics #from_value for #ident #ty_generics #where_clause {
            fn from_value(value: #value) -> ::core::result::Result<Self, #value_error> {
                #private::downcast_object(value, #type_name)
            }
        }

        impl #describe_impl_generics #describe for #ident #ty_generics #describe_where_clause {
            fn type_metadata() -> #type_metadata {
                #declared.annotated(#annotation::Cascade)
            }
        }
    })
}

/// Returns the token stream to reference the desensitize crate root.
///
/// Handles crate renaming (e.g., `my_masking = { package = "desensitize", ... }`).
fn crate_root() -> TokenStream {
    match crate_name("desensitize") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::desensitize },
    }
}

/// Path to an item of the desensitize crate, e.g. `"cascade::__private"`.
fn crate_path(item: &str) -> TokenStream {
    let root = crate_root();
    let segments = item.split("::").map(|segment| format_ident!("{}", segment));
    quote! { #root #(::#segments)* }
}
