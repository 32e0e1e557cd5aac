use proc_macro::TokenStream;

mod setting_enum;
mod settings;
mod utils;

/// Implements `xml_settings::Settings` for a struct with named fields
///
/// Field attribute: `#[setting(category = "...", name = "...", default = expr)]`
/// or `default_text = "..."` instead of `default`. Fields without `#[setting]`
/// are not persisted. Struct attribute:
/// `#[settings(root = "...", defaults = path::to_fn)]`.
#[proc_macro_derive(Settings, attributes(settings, setting))]
pub fn settings_derive(input: TokenStream) -> TokenStream {
    settings::derive(input)
}

/// Implements `xml_settings::SettingEnum` and `SettingValue` for a unit-only enum
#[proc_macro_derive(SettingEnum)]
pub fn setting_enum_derive(input: TokenStream) -> TokenStream {
    setting_enum::derive(input)
}
