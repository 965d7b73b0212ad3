use proc_macro2::Span;
use syn::{Attribute, Ident, LitStr, Path, meta::ParseNestedMeta};

const ATTR: &str = "filter";

///
/// StructAttrs
///

#[derive(Default)]
pub struct StructAttrs {
    pub entity: Option<Path>,
}

impl StructAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTR)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("entity") {
                    out.entity = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported filter attribute, expected `entity = Type`"))
                }
            })?;
        }

        Ok(out)
    }
}

///
/// FieldAttrs
///
/// Raw per-field declarations. Conflicting role tags are kept; the runtime
/// settles them by priority and `shape` mirrors that priority.
///

#[derive(Default)]
pub struct FieldAttrs {
    pub property: Option<LitStr>,
    pub operation: Option<Ident>,
    pub nullable: bool,
    pub between: Option<(LitStr, LitStr)>,
    pub join: bool,
    pub group: Option<Ident>,
    pub period: Option<(LitStr, LitStr)>,
    pub skip: bool,
}

///
/// Shape
///
/// What the accessor hands back for a field.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    Value,
    Group,
    Period,
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTR)) {
            attr.parse_nested_meta(|meta| {
                let path = &meta.path;

                if path.is_ident("property") {
                    out.property = Some(meta.value()?.parse()?);
                } else if path.is_ident("operation") {
                    out.operation = Some(meta.value()?.parse()?);
                } else if path.is_ident("nullable") {
                    out.nullable = true;
                } else if path.is_ident("join") {
                    out.join = true;
                } else if path.is_ident("skip") {
                    out.skip = true;
                } else if path.is_ident("group") {
                    out.group = Some(parse_group(&meta)?);
                } else if path.is_ident("between") {
                    out.between = Some(parse_pair(&meta, "left", "right")?);
                } else if path.is_ident("period") {
                    out.period = Some(parse_pair(&meta, "start", "end")?);
                } else {
                    return Err(meta.error("unsupported filter attribute"));
                }

                Ok(())
            })?;
        }

        Ok(out)
    }

    /// Accessor shape under the role priority between > join > group >
    /// period > leaf.
    pub const fn shape(&self) -> Shape {
        if self.between.is_some() || self.join {
            Shape::Value
        } else if self.group.is_some() {
            Shape::Group
        } else if self.period.is_some() {
            Shape::Period
        } else {
            Shape::Value
        }
    }
}

// `group` alone means `group(operator = And)`.
fn parse_group(meta: &ParseNestedMeta<'_>) -> syn::Result<Ident> {
    let mut operator = Ident::new("And", Span::call_site());

    if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("operator") {
                operator = inner.value()?.parse()?;
                Ok(())
            } else {
                Err(inner.error("expected `operator = And` or `operator = Or`"))
            }
        })?;
    }

    Ok(operator)
}

fn parse_pair(
    meta: &ParseNestedMeta<'_>,
    first: &str,
    second: &str,
) -> syn::Result<(LitStr, LitStr)> {
    let mut left = None;
    let mut right = None;

    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident(first) {
            left = Some(inner.value()?.parse::<LitStr>()?);
        } else if inner.path.is_ident(second) {
            right = Some(inner.value()?.parse::<LitStr>()?);
        } else {
            return Err(inner.error(format!("expected `{first}` or `{second}`")));
        }

        Ok(())
    })?;

    match (left, right) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(meta.error(format!(
            "expected both `{first} = \"...\"` and `{second} = \"...\"`"
        ))),
    }
}
