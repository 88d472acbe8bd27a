use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{DeriveInput, Ident, LitBool, LitStr, Path, Token};

#[derive(Default)]
struct ModelAttrs {
    name: Option<String>,
    table: Option<String>,
    primary_key: Option<String>,
    auto_increment: Option<bool>,
    fillable: Vec<String>,
    hidden: Vec<String>,
    getters: Vec<(String, Path)>,
    setters: Vec<(String, Path)>,
    relations: Vec<RelationDef>,
}

struct RelationDef {
    name: String,
    kind: Ident,
    target: Path,
    key: Option<String>,
}

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let attrs = parse_attrs(input)?;

    let name = attrs.name.unwrap_or_else(|| ident.to_string());
    let table = match &attrs.table {
        Some(table) => quote! { Some(#table) },
        None => quote! { None },
    };
    let primary_key = attrs.primary_key.as_ref().map(|key| {
        quote! { const PRIMARY_KEY: &'static str = #key; }
    });
    let auto_increment = attrs.auto_increment.map(|flag| {
        quote! { const AUTO_INCREMENT: bool = #flag; }
    });

    let fillable = &attrs.fillable;
    let hidden = &attrs.hidden;

    let getters = attrs.getters.iter().map(|(attr, func)| {
        quote! { (#attr, #func as docrecord::Getter) }
    });
    let setters = attrs.setters.iter().map(|(attr, func)| {
        quote! { (#attr, #func as docrecord::Setter) }
    });
    let relations = attrs.relations.iter().map(|relation| {
        let name = &relation.name;
        let kind = &relation.kind;
        let target = &relation.target;
        let key = relation
            .key
            .as_ref()
            .map(|key| quote! { .with_key(#key) });
        quote! {
            (#name, docrecord::Relation::#kind(docrecord::ModelType::of::<#target>()) #key)
        }
    });

    Ok(quote! {
        impl #impl_generics docrecord::Model for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const TABLE: Option<&'static str> = #table;
            #primary_key
            #auto_increment
            const FILLABLE: &'static [&'static str] = &[#(#fillable),*];
            const HIDDEN: &'static [&'static str] = &[#(#hidden),*];
            const GETTERS: &'static [(&'static str, docrecord::Getter)] = &[#(#getters),*];
            const SETTERS: &'static [(&'static str, docrecord::Setter)] = &[#(#setters),*];
            const RELATIONS: &'static [(&'static str, docrecord::Relation)] = &[#(#relations),*];
        }
    })
}

fn parse_attrs(input: &DeriveInput) -> syn::Result<ModelAttrs> {
    let mut attrs = ModelAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                attrs.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("table") {
                attrs.table = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("primary_key") {
                attrs.primary_key = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("auto_increment") {
                attrs.auto_increment = Some(meta.value()?.parse::<LitBool>()?.value);
            } else if meta.path.is_ident("fillable") {
                attrs.fillable.extend(parse_names(&meta)?);
            } else if meta.path.is_ident("hidden") {
                attrs.hidden.extend(parse_names(&meta)?);
            } else if meta.path.is_ident("getter") {
                attrs.getters.extend(parse_transforms(&meta)?);
            } else if meta.path.is_ident("setter") {
                attrs.setters.extend(parse_transforms(&meta)?);
            } else if let Some(kind) = relation_kind(&meta) {
                attrs.relations.push(parse_relation(&meta, kind)?);
            } else {
                return Err(meta.error("unsupported model attribute"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}

/// `fillable("a", "b")`
fn parse_names(meta: &ParseNestedMeta) -> syn::Result<Vec<String>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(names.into_iter().map(|name| name.value()).collect())
}

/// `getter(name = path::to::func, ...)`
fn parse_transforms(meta: &ParseNestedMeta) -> syn::Result<Vec<(String, Path)>> {
    let mut transforms = Vec::new();
    meta.parse_nested_meta(|entry| {
        let attr = entry
            .path
            .get_ident()
            .ok_or_else(|| entry.error("expected an attribute name"))?
            .to_string();
        let func: Path = entry.value()?.parse()?;
        transforms.push((attr, func));
        Ok(())
    })?;
    Ok(transforms)
}

fn relation_kind(meta: &ParseNestedMeta) -> Option<Ident> {
    ["belongs_to", "has_one", "has_many"]
        .into_iter()
        .find(|kind| meta.path.is_ident(kind))
        .and_then(|_| meta.path.get_ident().cloned())
}

/// `has_many(posts = Post, key = "author_id")`
fn parse_relation(meta: &ParseNestedMeta, kind: Ident) -> syn::Result<RelationDef> {
    let mut relation = None;
    let mut key = None;

    meta.parse_nested_meta(|entry| {
        if entry.path.is_ident("key") {
            key = Some(entry.value()?.parse::<LitStr>()?.value());
            return Ok(());
        }
        let name = entry
            .path
            .get_ident()
            .ok_or_else(|| entry.error("expected a relation name"))?
            .to_string();
        let target: Path = entry.value()?.parse()?;
        relation = Some((name, target));
        Ok(())
    })?;

    let (name, target) = relation.ok_or_else(|| meta.error("relation needs `name = Target`"))?;
    Ok(RelationDef {
        name,
        kind,
        target,
        key,
    })
}
