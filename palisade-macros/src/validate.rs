use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Expr, Fields, LitStr, Path, Token, parse_macro_input, parse_quote};

pub fn derive_validate_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let krate = crate_path(input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Validate can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Validate can only be derived for structs",
            ));
        }
    };

    let mut registrations = Vec::new();
    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };

        let mut rules = Vec::new();
        let mut display_name = None;
        for attr in &field.attrs {
            if attr.path().is_ident("rule") {
                let exprs =
                    attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
                if exprs.is_empty() {
                    return Err(syn::Error::new_spanned(attr, "expected at least one rule"));
                }
                rules.extend(exprs.into_iter().map(rule_call));
            } else if attr.path().is_ident("display_name") {
                if display_name.is_some() {
                    return Err(syn::Error::new_spanned(attr, "duplicate display_name"));
                }
                display_name = Some(attr.parse_args::<LitStr>()?);
            }
        }

        if rules.is_empty() {
            continue;
        }

        let key = ident.to_string();
        let display = display_name.map(|lit| quote! { .display_name(#lit) });
        let factories = rules.iter().map(|call| {
            quote! {
                .rule(|| {
                    #[allow(unused_imports)]
                    use #krate::rules::*;
                    #call
                })
            }
        });

        registrations.push(quote! {
            .field(
                #key,
                |target: &Self| #krate::ToValue::to_value(&target.#ident),
                |spec| spec #display #(#factories)*,
            )
        });
    }

    Ok(quote! {
        impl #impl_generics #krate::Validate for #name #ty_generics #where_clause {
            fn schema() -> #krate::Schema<Self> {
                #krate::Schema::new()
                    #(#registrations)*
            }
        }
    })
}

/// Bare paths become zero-argument calls; anything else is used as written.
fn rule_call(expr: Expr) -> Expr {
    match expr {
        Expr::Path(path) => parse_quote! { #path() },
        other => other,
    }
}

fn crate_path(input: &DeriveInput) -> syn::Result<Path> {
    let mut krate: Path = parse_quote! { ::palisade_validation };
    for attr in &input.attrs {
        if !attr.path().is_ident("palisade") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                krate = lit.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported palisade attribute"))
            }
        })?;
    }
    Ok(krate)
}
