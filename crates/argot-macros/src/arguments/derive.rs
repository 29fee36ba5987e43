//! Implementation of the `#[derive(Arguments)]` macro.
//!
//! Generates an `argot::Arguments` impl: one `FieldSpec` per annotated
//! field, a setter that routes boxed values to the matching field, and the
//! usage text from the struct attributes.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{
    doc_comment, parse_container_attrs, parse_field_attrs, DefaultLit, Dependency, FieldAttr,
    FieldKind,
};

/// Main implementation of the Arguments derive macro.
pub fn arguments_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Arguments can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Arguments can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut specs: Vec<TokenStream> = Vec::new();
    let mut setters: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        // Fields without #[args] are not arguments
        let attr = match parse_field_attrs(&field.attrs)? {
            Some(attr) => attr,
            None => continue,
        };

        let kind = attr.kind.ok_or_else(|| {
            Error::new(
                field.span(),
                "#[args] needs one of switch, option or verbal",
            )
        })?;

        let name = field_name.to_string();
        let ty = &field.ty;
        let constructor = match kind {
            FieldKind::Switch => quote! { switch },
            FieldKind::Option => quote! { option },
            FieldKind::Verbal => quote! { verbal },
        };

        let help = attr.help.clone().or_else(|| doc_comment(&field.attrs));
        let chain = builder_chain(&attr, help);

        specs.push(quote! {
            ::argot::FieldSpec::#constructor::<#ty>(#name) #(#chain)*
        });

        setters.push(quote! {
            #name => ::argot::assign_boxed(&mut self.#field_name, field, value),
        });
    }

    let program = match container.program {
        Some(program) => quote! { ::std::option::Option::Some(::std::string::String::from(#program)) },
        None => quote! {
            ::std::option::Option::Some(::std::string::String::from(::std::env!("CARGO_PKG_NAME")))
        },
    };
    let about = optional_string(container.about.or_else(|| doc_comment(&input.attrs)));
    let footer = optional_string(container.footer);

    let expanded = quote! {
        impl #impl_generics ::argot::Arguments for #struct_name #ty_generics #where_clause {
            fn argument_fields() -> ::std::vec::Vec<::argot::FieldSpec> {
                ::std::vec![#(#specs),*]
            }

            fn assign_argument(
                &mut self,
                field: &str,
                value: ::argot::BoxedValue,
            ) -> ::argot::Result<()> {
                match field {
                    #(#setters)*
                    _ => ::std::result::Result::Err(::argot::ArgumentError::Support(
                        ::std::format!("field '{}' is not an argument", field),
                    )),
                }
            }

            fn usage_info() -> ::argot::UsageInfo {
                ::argot::UsageInfo {
                    program: #program,
                    about: #about,
                    footer: #footer,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builder calls appended to the `FieldSpec` constructor.
fn builder_chain(attr: &FieldAttr, help: Option<String>) -> Vec<TokenStream> {
    let mut chain = Vec::new();

    if let Some(solid) = &attr.solid {
        chain.push(quote! { .solid(#solid) });
    }
    if let Some(brief) = &attr.brief {
        chain.push(quote! { .brief(#brief) });
    }
    if let Some(separator) = attr.separator {
        chain.push(quote! { .separator(#separator) });
    }
    if let Some(delimiter) = &attr.delimiter {
        chain.push(quote! { .delimiter(#delimiter) });
    }
    if attr.required {
        chain.push(quote! { .required() });
    }
    if attr.exclusive {
        chain.push(quote! { .exclusive() });
    }
    if !attr.depends.is_empty() {
        let depends = &attr.depends;
        chain.push(quote! { .depends_on([#(#depends),*]) });
    }
    if let Some(dependency) = attr.dependency {
        let variant = match dependency {
            Dependency::Optional => quote! { Optional },
            Dependency::Required => quote! { Required },
        };
        chain.push(quote! { .dependency(::argot::DependencyType::#variant) });
    }
    if let Some(default) = &attr.default {
        let value = match default {
            DefaultLit::Bool(b) => quote! { ::argot::DefaultValue::Bool(#b) },
            // negatives are emitted as a unary minus over the magnitude
            DefaultLit::Integer(i) if *i < 0 => {
                let magnitude = i.unsigned_abs();
                quote! { ::argot::DefaultValue::Integer(-(#magnitude as i128)) }
            }
            DefaultLit::Integer(i) => quote! { ::argot::DefaultValue::Integer(#i) },
            DefaultLit::Float(f) if f.is_sign_negative() => {
                let magnitude = -f;
                quote! { ::argot::DefaultValue::Float(-#magnitude) }
            }
            DefaultLit::Float(f) => quote! { ::argot::DefaultValue::Float(#f) },
            DefaultLit::Char(c) => quote! { ::argot::DefaultValue::Char(#c) },
            DefaultLit::Text(s) => {
                quote! { ::argot::DefaultValue::Text(::std::string::String::from(#s)) }
            }
        };
        chain.push(quote! { .default_value(#value) });
    }
    if let Some(converter) = &attr.converter {
        chain.push(quote! { .converter::<#converter>() });
    }
    if let Some(help) = help {
        chain.push(quote! { .help(#help) });
    }
    if let Some(value_name) = &attr.value_name {
        chain.push(quote! { .value_name(#value_name) });
    }

    chain
}

fn optional_string(value: Option<String>) -> TokenStream {
    match value {
        Some(s) => quote! { ::std::option::Option::Some(::std::string::String::from(#s)) },
        None => quote! { ::std::option::Option::None },
    }
}
