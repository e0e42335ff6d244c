mod document;

use proc_macro::TokenStream;

/// Derive macro for storable documents.
///
/// Generates an `insighthub::store::Document` impl: the collection name and
/// accessors for the store-assigned id field.
///
/// # Usage
///
/// ```ignore
/// #[derive(Document, Serialize, Deserialize, Clone)]
/// #[document(collection = "reports")]
/// struct Report {
///     #[serde(rename = "_id")]
///     id: String,
///     title: String,
/// }
/// ```
///
/// Attributes:
/// - `#[document(collection = "...")]` on the struct. Defaults to the snake_case
///   struct name with an `s` appended (`DataPoint` becomes `data_points`).
/// - `#[document(id)]` on a `String` field to use it as the id. Defaults to the
///   field named `id`.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    document::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
