//! # Qsenc Derive Macros
//!
//! This crate provides the procedural macros for `qsenc`. It generates the
//! `Reflect` and `Record` impls the encoder walks, so no field is ever
//! inspected at runtime.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Fields, Generics, Index, LitStr, Type, Visibility,
    parse_macro_input, parse_quote,
};

/// Alias that a bare string annotation belongs to: `#[qs("name,opts")]`.
const DEFAULT_ALIAS: &str = "qs";

/// Derives `Reflect` and `Record` for a struct.
///
/// Field attributes:
///
/// * `#[qs("name,opt1,opt2")]`: annotation for the default alias `qs`.
/// * `#[qs(form = "name,opt")]`: annotation for another alias.
/// * `#[qs(embed)]`: consider the field even if it is private.
/// * `#[qs(skip)]`: never look at the field; its type needs no `Reflect`.
#[proc_macro_derive(QueryRecord, attributes(qs))]
pub fn derive_query_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_record(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Derives `Reflect` for a type that implements `EncodeParam`.
///
/// The type is then formatted by its own `encode_param` wherever it appears
/// as a field.
#[proc_macro_derive(QueryParam)]
pub fn derive_query_param(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_param(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

// --- Internal Data Structures ---

struct FieldSpec {
    /// Declared name: identifier without `r#`, or tuple index.
    name: String,
    /// Accessor used in `self.#member`.
    member: syn::Member,
    ty: Type,
    exported: bool,
    attrs: FieldAttrs,
}

#[derive(Default)]
struct FieldAttrs {
    tags: Vec<(String, String)>,
    embed: bool,
    skip: bool,
}

/// Parses every `#[qs(...)]` attribute of one field.
fn parse_attributes(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("qs") {
            continue;
        }

        if let Ok(lit) = attr.parse_args::<LitStr>() {
            set_tag(&mut out.tags, DEFAULT_ALIAS.to_owned(), lit.value());
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("embed") {
                out.embed = true;
                return Ok(());
            }

            if meta.path.is_ident("skip") {
                out.skip = true;
                return Ok(());
            }

            if let Some(alias) = meta.path.get_ident() {
                let value: LitStr = meta.value()?.parse()?;
                set_tag(&mut out.tags, alias.unraw().to_string(), value.value());
                return Ok(());
            }

            Err(meta.error(
                "Unknown qs attribute. Supported: \"name,opts\", <alias> = \"name,opts\", embed, skip",
            ))
        })?;
    }
    Ok(out)
}

/// Later annotations for the same alias replace earlier ones.
fn set_tag(tags: &mut Vec<(String, String)>, alias: String, value: String) {
    match tags.iter_mut().find(|(a, _)| *a == alias) {
        Some(existing) => existing.1 = value,
        None => tags.push((alias, value)),
    }
}

fn collect_fields(fields: Fields) -> syn::Result<Vec<FieldSpec>> {
    let mut specs = Vec::new();
    for (index, field) in fields.into_iter().enumerate() {
        let attrs = parse_attributes(&field.attrs)?;
        let (name, member) = match &field.ident {
            Some(ident) => (ident.unraw().to_string(), syn::Member::Named(ident.clone())),
            None => (index.to_string(), syn::Member::Unnamed(Index::from(index))),
        };
        specs.push(FieldSpec {
            name,
            member,
            ty: field.ty,
            exported: !matches!(field.vis, Visibility::Inherited),
            attrs,
        });
    }
    Ok(specs)
}

/// Rejects lifetime parameters and bounds every type parameter by `'static`.
fn static_generics(generics: &Generics) -> syn::Result<Generics> {
    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "qsenc derives require 'static types; lifetime parameters are not supported",
        ));
    }

    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
    }
    Ok(generics)
}

// --- Generator: QueryRecord ---

fn expand_record(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let data_struct = match input.data {
        Data::Struct(ds) => ds,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "QueryRecord only supports structs",
            ));
        }
    };

    let fields = collect_fields(data_struct.fields)?;
    let mut generics = static_generics(&input.generics)?;
    if !input.generics.params.is_empty() {
        let where_clause = generics.make_where_clause();
        for f in fields.iter().filter(|f| !f.attrs.skip) {
            let ty = &f.ty;
            where_clause
                .predicates
                .push(parse_quote!(#ty: qsenc::Reflect));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let table = fields.iter().map(|f| {
        let fname = &f.name;
        let exported = f.exported;
        let embedded = f.attrs.embed;
        let tags = f.attrs.tags.iter().map(|(alias, value)| quote! { (#alias, #value) });
        let shape = if f.attrs.skip {
            quote! { qsenc::rt::skipped_shape }
        } else {
            let ty = &f.ty;
            quote! { <#ty as qsenc::Reflect>::shape }
        };
        quote! {
            qsenc::rt::field(#fname, &[#(#tags),*], #exported, #embedded, #shape)
        }
    });

    let accessors = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.attrs.skip)
        .map(|(index, f)| {
            let member = &f.member;
            quote! { #index => Some(&self.#member), }
        });

    Ok(quote! {
        impl #impl_generics qsenc::Reflect for #name #ty_generics #where_clause {
            fn shape() -> qsenc::Shape {
                qsenc::rt::record_shape::<Self>()
            }

            fn dyn_shape(&self) -> qsenc::Shape {
                <Self as qsenc::Reflect>::shape()
            }

            fn reflect(&self) -> qsenc::ValueRef<'_> {
                qsenc::ValueRef::Record(self)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }

        impl #impl_generics qsenc::Record for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<qsenc::FieldInfo> {
                ::std::vec![#(#table),*]
            }

            #[allow(clippy::match_single_binding)]
            fn field(&self, index: usize) -> ::core::option::Option<&dyn qsenc::Reflect> {
                match index {
                    #(#accessors)*
                    _ => None,
                }
            }
        }
    })
}

// --- Generator: QueryParam ---

fn expand_param(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let mut generics = static_generics(&input.generics)?;
    if !input.generics.params.is_empty() {
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(Self: qsenc::EncodeParam));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics qsenc::Reflect for #name #ty_generics #where_clause {
            fn shape() -> qsenc::Shape {
                qsenc::rt::param_shape::<Self>()
            }

            fn dyn_shape(&self) -> qsenc::Shape {
                <Self as qsenc::Reflect>::shape()
            }

            fn reflect(&self) -> qsenc::ValueRef<'_> {
                qsenc::ValueRef::Custom(self)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }
    })
}
