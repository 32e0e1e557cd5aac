use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(name, "SettingEnum can only be derived for enums")
            .to_compile_error()
            .into();
    };

    if data_enum.variants.is_empty() {
        return syn::Error::new_spanned(name, "SettingEnum requires at least one variant")
            .to_compile_error()
            .into();
    }

    let mut idents = Vec::new();
    let mut names = Vec::new();

    for variant in data_enum.variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(variant, "SettingEnum variants cannot carry data")
                .to_compile_error()
                .into();
        }
        idents.push(&variant.ident);
        names.push(variant.ident.to_string());
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::xml_settings::SettingEnum for #name #ty_generics #where_clause {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn from_variant_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    #(#names => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics ::xml_settings::SettingValue for #name #ty_generics #where_clause {
            fn value_type() -> ::xml_settings::ValueType {
                ::xml_settings::ValueType::Enum(<Self as ::xml_settings::SettingEnum>::enum_type())
            }

            fn to_value(&self) -> ::xml_settings::Value {
                ::xml_settings::Value::Enum {
                    ty: <Self as ::xml_settings::SettingEnum>::enum_type(),
                    variant: <Self as ::xml_settings::SettingEnum>::variant_name(self),
                }
            }

            fn from_value(value: ::xml_settings::Value) -> ::std::option::Option<Self> {
                match value {
                    ::xml_settings::Value::Enum { ty, variant }
                        if ty == <Self as ::xml_settings::SettingEnum>::enum_type() =>
                    {
                        <Self as ::xml_settings::SettingEnum>::from_variant_name(variant)
                    }
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics ::std::convert::From<#name #ty_generics> for ::xml_settings::Value #where_clause {
            fn from(value: #name #ty_generics) -> Self {
                ::xml_settings::SettingValue::to_value(&value)
            }
        }
    };

    TokenStream::from(expanded)
}
