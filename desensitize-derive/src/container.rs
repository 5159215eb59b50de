//! Parsing of the container-level `#[cascade(...)]` attribute.

use syn::{Attribute, LitStr, Meta, Result, spanned::Spanned};

#[derive(Default)]
pub(crate) struct ContainerOptions {
    /// Overrides the declared type name (defaults to the struct ident).
    pub(crate) name: Option<LitStr>,
}

pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();
    for attr in attrs {
        if attr.path().is_ident("sensitive") || attr.path().is_ident("not_sensitive") {
            return Err(syn::Error::new(
                attr.span(),
                "field attributes are not allowed on the container",
            ));
        }
        if !attr.path().is_ident("cascade") {
            continue;
        }
        let Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new(
                attr.span(),
                "expected #[cascade(name = \"TypeName\")] on the container",
            ));
        };
        list.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                if options.name.is_some() {
                    return Err(meta.error("duplicate `name` option"));
                }
                let name: LitStr = meta.value()?.parse()?;
                if name.value().trim().is_empty() {
                    return Err(syn::Error::new(name.span(), "type name must not be empty"));
                }
                options.name = Some(name);
                Ok(())
            } else {
                Err(meta.error("unknown #[cascade] option; expected `name`"))
            }
        })?;
    }
    Ok(options)
}
