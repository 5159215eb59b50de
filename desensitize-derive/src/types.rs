//! Syntactic type checks for the derive macro.

const PRIMITIVES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32",
    "f64", "bool", "char",
];

fn last_segment(ty: &syn::Type) -> Option<&syn::PathSegment> {
    match ty {
        syn::Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        syn::Type::Group(group) => last_segment(&group.elem),
        syn::Type::Paren(paren) => last_segment(&paren.elem),
        _ => None,
    }
}

/// Checks if a type is `PhantomData<...>`, bare or qualified.
///
/// `PhantomData<T>` never carries data, so such fields are left out of
/// traversal (as if marked `#[not_sensitive]`) and `T` gets no bounds.
pub(crate) fn is_phantom_data(ty: &syn::Type) -> bool {
    last_segment(ty).is_some_and(|segment| {
        segment.ident == "PhantomData"
            && matches!(segment.arguments, syn::PathArguments::AngleBracketed(_))
    })
}

/// Checks if a type is a bare primitive name (`u32`, `bool`, ...).
///
/// Qualified paths and aliases are not recognized. Used to reject
/// `#[cascade]` on primitives, which have no fields.
pub(crate) fn is_scalar_type(ty: &syn::Type) -> bool {
    let syn::Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path.path.leading_colon.is_none()
        && path.path.segments.len() == 1
        && path.path.segments[0].arguments.is_empty()
        && PRIMITIVES
            .iter()
            .any(|name| path.path.segments[0].ident == name)
}
