use proc_macro::TokenStream;

mod attr;
mod filter;
mod util;

/// Derive `Filter` (and optionally `EntityFilter`) for a struct with named
/// fields.
///
/// Struct attribute:
/// - `#[filter(entity = Type)]` binds the filter to an `EntityKind`.
///
/// Field attributes, all inside `#[filter(...)]`:
/// - `property = "a.b"` overrides the property path (default: field name)
/// - `operation = LikeIgnoreCase` picks the `Operation` variant
/// - `nullable` turns a null value into an `IS NULL` predicate
/// - `between(left = "min", right = "max")`
/// - `join`
/// - `group` / `group(operator = Or)` for a nested filter
/// - `period(start = "from", end = "to")` for a nested `PeriodBounds`
/// - `skip` leaves the field out of translation entirely
#[proc_macro_derive(Filter, attributes(filter))]
pub fn derive_filter(input: TokenStream) -> TokenStream {
    filter::derive_filter(input.into()).into()
}
