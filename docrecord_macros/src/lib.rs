mod model;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Model)] derive macro
// ============================================================================

/// Derive macro for the `Model` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Model)]
/// #[model(
///     fillable("name", "email", "team_id"),
///     hidden("password"),
///     setter(email = normalize_email),
///     belongs_to(team = Team),
///     has_many(posts = Post, key = "author_id"),
/// )]
/// struct User;
/// ```
///
/// - `name = "..."` overrides the model name (defaults to the struct name).
/// - `table = "..."` overrides the table. If omitted, defaults to the plural
///   snake_case model name.
/// - `primary_key = "..."` and `auto_increment = false` change identity rules.
/// - `fillable(..)` / `hidden(..)` list attribute names.
/// - `getter(attr = func)` / `setter(attr = func)` register transforms with
///   signatures `fn(&Value) -> Value` and `fn(Value) -> Value`.
/// - `belongs_to`, `has_one`, `has_many` take `relation = Target` and an
///   optional `key = "..."` foreign key override.
///
/// `#[model(...)]` may be repeated; entries accumulate.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
