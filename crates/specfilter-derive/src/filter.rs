use crate::{
    attr::{FieldAttrs, Shape, StructAttrs},
    util::is_option,
};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, ext::IdentExt, punctuated::Punctuated,
    token::Comma,
};

// derive_filter
pub fn derive_filter(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(Error::into_compile_error)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let filter_name = ident.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_attrs = StructAttrs::parse(&input.attrs)?;
    let fields = named_fields(input)?;

    let mut descriptors = Vec::new();
    let mut read_arms = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Filter fields must be named"))?;
        let field_name = field_ident.unraw().to_string();

        descriptors.push(field_descriptor(&field_name, &attrs));

        let read = read_expr(field_ident, field, attrs.shape());
        read_arms.push(quote! {
            #field_name => ::core::result::Result::Ok(#read),
        });
    }

    let entity_impl = struct_attrs.entity.map(|entity| {
        quote! {
            impl #impl_generics ::specfilter::metadata::EntityFilter for #ident #ty_generics #where_clause {
                type Entity = #entity;
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::specfilter::metadata::Filter for #ident #ty_generics #where_clause {
            fn descriptor(&self) -> &'static ::specfilter::metadata::FilterDescriptor {
                static DESCRIPTOR: ::specfilter::metadata::FilterDescriptor =
                    ::specfilter::metadata::FilterDescriptor {
                        name: #filter_name,
                        fields: &[#(#descriptors),*],
                    };

                &DESCRIPTOR
            }

            fn read(
                &self,
                field: &str,
            ) -> ::core::result::Result<
                ::specfilter::metadata::FieldInput<'_>,
                ::specfilter::metadata::AccessError,
            > {
                match field {
                    #(#read_arms)*
                    _ => ::core::result::Result::Err(
                        ::specfilter::metadata::AccessError::UnknownField {
                            filter: #filter_name,
                            field: field.to_string(),
                        },
                    ),
                }
            }
        }

        #entity_impl
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<&Punctuated<Field, Comma>> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Filter can only be derived for structs with named fields",
        ));
    };

    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &data.fields,
            "Filter can only be derived for structs with named fields",
        ));
    };

    Ok(&named.named)
}

fn field_descriptor(field_name: &str, attrs: &FieldAttrs) -> TokenStream {
    let property = option_tokens(attrs.property.as_ref().map(|lit| quote!(#lit)));
    let operation = option_tokens(
        attrs
            .operation
            .as_ref()
            .map(|op| quote!(::specfilter::taxonomy::Operation::#op)),
    );
    let between = option_tokens(attrs.between.as_ref().map(|(left, right)| {
        quote!(::specfilter::metadata::BetweenTag { left: #left, right: #right })
    }));
    let group = option_tokens(
        attrs
            .group
            .as_ref()
            .map(|op| quote!(::specfilter::taxonomy::Operator::#op)),
    );
    let period = option_tokens(attrs.period.as_ref().map(|(start, end)| {
        quote!(::specfilter::metadata::PeriodTag { start: #start, end: #end })
    }));
    let nullable = attrs.nullable;
    let join = attrs.join;

    quote! {
        ::specfilter::metadata::FieldDescriptor {
            name: #field_name,
            tags: ::specfilter::metadata::FieldTags {
                property: #property,
                operation: #operation,
                nullable: #nullable,
                between: #between,
                join: #join,
                group: #group,
                period: #period,
            },
        }
    }
}

fn option_tokens(inner: Option<TokenStream>) -> TokenStream {
    inner.map_or_else(
        || quote!(::core::option::Option::None),
        |inner| quote!(::core::option::Option::Some(#inner)),
    )
}

// Accessor expression; optional group and period fields map `None` to an
// absent input instead of a null value.
fn read_expr(field_ident: &Ident, field: &Field, shape: Shape) -> TokenStream {
    let optional = is_option(&field.ty);

    match (shape, optional) {
        (Shape::Value, _) => quote! {
            ::specfilter::metadata::FieldInput::Value(
                ::specfilter::traits::FieldValue::to_value(&self.#field_ident)
            )
        },
        (Shape::Group, true) => quote! {
            ::specfilter::metadata::FieldInput::Group(
                self.#field_ident
                    .as_ref()
                    .map(|group| group as &dyn ::specfilter::metadata::Filter)
            )
        },
        (Shape::Group, false) => quote! {
            ::specfilter::metadata::FieldInput::Group(::core::option::Option::Some(
                &self.#field_ident as &dyn ::specfilter::metadata::Filter
            ))
        },
        (Shape::Period, true) => quote! {
            ::specfilter::metadata::FieldInput::Period(
                self.#field_ident
                    .as_ref()
                    .map(::specfilter::metadata::DatePeriod::from_bounds)
            )
        },
        (Shape::Period, false) => quote! {
            ::specfilter::metadata::FieldInput::Period(::core::option::Option::Some(
                ::specfilter::metadata::DatePeriod::from_bounds(&self.#field_ident)
            ))
        },
    }
}
