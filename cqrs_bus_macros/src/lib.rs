mod message;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Command)] derive macro
// ============================================================================

/// Derive macro for the `Command` trait (and its `Message` supertrait).
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Command)]
/// struct SampleCommand {
///     foo: String,
/// }
/// ```
///
/// - The wire name defaults to the type's identifier (`"SampleCommand"`).
/// - `#[message(name = "...")]` overrides it.
#[proc_macro_derive(Command, attributes(message))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    message::derive_command(input)
}

// ============================================================================
// #[derive(Query)] derive macro
// ============================================================================

/// Derive macro for the `Query` trait (and its `Message` supertrait).
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Query)]
/// #[query(response = SampleQueryResponse)]
/// struct SampleQuery {
///     foo: String,
/// }
/// ```
///
/// - `#[query(response = T)]` is required and sets `Query::Response`.
/// - `#[message(name = "...")]` overrides the wire name, as for `Command`.
#[proc_macro_derive(Query, attributes(message, query))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    message::derive_query(input)
}
