use syn::Type;

/// Last path segment of `ty` is `ident` (`Option`, `std::option::Option`).
pub fn is_path_ident(ty: &Type, ident: &str) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == ident)
}

pub fn is_option(ty: &Type) -> bool {
    is_path_ident(ty, "Option")
}
