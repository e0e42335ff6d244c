use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Fields, FieldsNamed, Ident, LitStr};

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let collection = match collection_attr(&input.attrs)? {
        Some(lit) => lit,
        None => LitStr::new(&default_collection(&name.to_string()), name.span()),
    };
    let id = id_field(named_fields(&input)?, name)?;

    Ok(quote! {
        impl insighthub::store::Document for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id
            }

            fn set_id(&mut self, id: String) {
                self.#id = id;
            }
        }
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<&FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            other => Err(syn::Error::new(
                other.span(),
                "Document derive requires named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "Document derive only supports structs",
        )),
    }
}

/// `#[document(collection = "...")]` on the struct. At most once.
fn collection_attr(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut collection: Option<LitStr> = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("collection") {
                return Err(meta.error("expected `collection = \"...\"`"));
            }
            if collection.is_some() {
                return Err(meta.error("duplicate `collection`"));
            }
            collection = Some(meta.value()?.parse()?);
            Ok(())
        })?;
    }
    Ok(collection)
}

/// The field marked `#[document(id)]`, else the field named `id`.
fn id_field<'a>(fields: &'a FieldsNamed, name: &Ident) -> syn::Result<&'a Ident> {
    let mut marked = None;
    for field in &fields.named {
        let mut is_id = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("document")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `id`"))
                }
            })?;
        }
        if is_id {
            if marked.is_some() {
                return Err(syn::Error::new(
                    field.span(),
                    "only one field can be marked #[document(id)]",
                ));
            }
            marked = field.ident.as_ref();
        }
    }

    marked
        .or_else(|| {
            fields
                .named
                .iter()
                .filter_map(|f| f.ident.as_ref())
                .find(|ident| *ident == "id")
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "Document derive needs a field marked #[document(id)] or named `id`",
            )
        })
}

/// `DataPoint` -> `data_points`, `HTTPLog` -> `http_logs`.
fn default_collection(type_name: &str) -> String {
    let chars: Vec<char> = type_name.chars().collect();
    let mut out = String::with_capacity(type_name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out.push('s');
    out
}
