use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, LitStr, Type};

pub fn derive_command(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand_command(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

pub fn derive_query(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand_query(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_command(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let message_impl = expand_message(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #message_impl

        impl #impl_generics ::cqrs_bus::Command for #name #ty_generics #where_clause {}
    })
}

fn expand_query(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let message_impl = expand_message(input)?;
    let response = extract_response(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #message_impl

        impl #impl_generics ::cqrs_bus::Query for #name #ty_generics #where_clause {
            type Response = #response;
        }
    })
}

fn expand_message(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let wire_name = extract_wire_name(input)?;
    let has_fields = has_fields(input);
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::cqrs_bus::Message for #name #ty_generics #where_clause {
            const NAME: &'static str = #wire_name;
            const HAS_FIELDS: bool = #has_fields;
        }
    })
}

/// Unit and empty structs carry no fields; enums and unions always need a payload.
fn has_fields(input: &DeriveInput) -> bool {
    match &input.data {
        Data::Struct(data) => !data.fields.is_empty(),
        Data::Enum(_) | Data::Union(_) => true,
    }
}

/// `#[message(name = "...")]`, or the type's identifier.
fn extract_wire_name(input: &DeriveInput) -> syn::Result<String> {
    let mut wire_name = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("message") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(meta.error("message name must not be blank"));
                }
                wire_name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported message attribute, expected `name`"))
            }
        })?;
    }

    Ok(wire_name.unwrap_or_else(|| input.ident.to_string()))
}

fn extract_response(input: &DeriveInput) -> syn::Result<Type> {
    let mut response = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("query") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("response") {
                response = Some(meta.value()?.parse::<Type>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported query attribute, expected `response`"))
            }
        })?;
    }

    response.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "Query derive: missing #[query(response = T)] attribute",
        )
    })
}
