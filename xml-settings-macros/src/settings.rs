use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, LitStr, Path};

use crate::utils::{field_key, find_attr, is_str_literal, non_empty};

/// Parsed #[setting(...)] field attribute
struct SettingAttr {
    category: LitStr,
    name: Option<LitStr>,
    default: Option<Expr>,
    default_text: Option<LitStr>,
}

fn parse_setting_attr(attr: &Attribute) -> syn::Result<SettingAttr> {
    let mut category = None;
    let mut name = None;
    let mut default = None;
    let mut default_text = None;

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("category") {
            category = Some(non_empty(meta.value()?.parse()?, "category")?);
        } else if meta.path.is_ident("name") {
            name = Some(non_empty(meta.value()?.parse()?, "name")?);
        } else if meta.path.is_ident("default") {
            default = Some(meta.value()?.parse::<Expr>()?);
        } else if meta.path.is_ident("default_text") {
            default_text = Some(meta.value()?.parse::<LitStr>()?);
        } else {
            return Err(meta.error(
                "unsupported setting option, expected `category`, `name`, `default` or `default_text`",
            ));
        }
        Ok(())
    })?;

    let category = category
        .ok_or_else(|| syn::Error::new_spanned(attr, "missing `category = \"...\"`"))?;
    if default.is_some() && default_text.is_some() {
        return Err(syn::Error::new_spanned(
            attr,
            "`default` and `default_text` are mutually exclusive",
        ));
    }

    Ok(SettingAttr {
        category,
        name,
        default,
        default_text,
    })
}

/// Parsed #[settings(...)] struct attribute
#[derive(Default)]
struct SettingsAttr {
    root: Option<LitStr>,
    defaults: Option<Path>,
}

fn parse_settings_attr(attr: &Attribute) -> syn::Result<SettingsAttr> {
    let mut result = SettingsAttr::default();
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("root") {
            result.root = Some(non_empty(meta.value()?.parse()?, "root")?);
        } else if meta.path.is_ident("defaults") {
            result.defaults = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unsupported settings option, expected `root` or `defaults`"));
        }
        Ok(())
    })?;
    Ok(result)
}

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(name, "Settings can only be derived for structs"));
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(name, "Settings requires named fields"));
    };

    let struct_attr = match find_attr(&input.attrs, "settings")? {
        Some(attr) => parse_settings_attr(attr)?,
        None => SettingsAttr::default(),
    };

    let mut properties = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();

    for field in fields.named.iter() {
        let Some(attr) = find_attr(&field.attrs, "setting")? else {
            let key = field_key(field);
            properties.push(quote! {
                ::xml_settings::SettingProperty::ignored(#key)
            });
            continue;
        };

        let setting = parse_setting_attr(attr)?;
        let field_name = &field.ident;
        let field_type = &field.ty;
        let category = &setting.category;
        let key = setting
            .name
            .as_ref()
            .map(LitStr::value)
            .unwrap_or_else(|| field_key(field));

        // A typed default is checked against the field type at compile time
        let default_call = match (&setting.default, &setting.default_text) {
            (Some(expr), _) if is_str_literal(expr) => quote! {
                .default::<#field_type>(::std::convert::Into::into(#expr))
            },
            (Some(expr), _) => quote! { .default::<#field_type>(#expr) },
            (None, Some(text)) => quote! { .default_text(#text) },
            (None, None) => quote! {},
        };

        properties.push(quote! {
            ::xml_settings::SettingProperty::builder::<#field_type>(#key, #category)
                #default_call
                .build()?
        });
        get_arms.push(quote! {
            #key => ::std::option::Option::Some(::xml_settings::SettingValue::to_value(&self.#field_name)),
        });
        set_arms.push(quote! {
            #key => ::xml_settings::types::assign(&mut self.#field_name, property, value),
        });
    }

    let root_fn = struct_attr.root.map(|root| {
        quote! {
            fn root_element_name() -> ::std::string::String {
                ::std::string::ToString::to_string(#root)
            }
        }
    });

    let defaults_fn = struct_attr.defaults.map(|path| {
        quote! {
            fn dynamic_defaults() -> ::xml_settings::DynamicDefaults {
                #path()
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::xml_settings::Settings for #name #ty_generics #where_clause {
            fn properties() -> ::xml_settings::Result<::std::vec::Vec<::xml_settings::SettingProperty>> {
                ::std::result::Result::Ok(::std::vec![#(#properties),*])
            }

            fn get_value(&self, property: &str) -> ::std::option::Option<::xml_settings::Value> {
                match property {
                    #(#get_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_value(
                &mut self,
                property: &str,
                value: ::xml_settings::Value,
            ) -> ::xml_settings::Result<()> {
                match property {
                    #(#set_arms)*
                    _ => {
                        let _ = value;
                        ::std::result::Result::Err(::xml_settings::SettingsError::InvalidDescriptor {
                            property: ::std::string::ToString::to_string(property),
                            reason: ::std::string::ToString::to_string("not a persisted setting"),
                        })
                    }
                }
            }

            #root_fn

            #defaults_fn
        }
    })
}
