use syn::{Attribute, Expr, ExprLit, Field, Lit, LitStr};
use syn::ext::IdentExt;

/// Find the single attribute named `name`, rejecting repeats
pub fn find_attr<'a>(attrs: &'a [Attribute], name: &str) -> syn::Result<Option<&'a Attribute>> {
    let mut found = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident(name)) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, format!("duplicate #[{}] attribute", name)));
        }
        found = Some(attr);
    }
    Ok(found)
}

/// Field name as written, without a raw identifier prefix
pub fn field_key(field: &Field) -> String {
    field
        .ident
        .as_ref()
        .map(|ident| ident.unraw().to_string())
        .unwrap_or_default()
}

/// Check if an expression is a plain string literal like `"text"`
pub fn is_str_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Lit(ExprLit { lit: Lit::Str(_), .. }))
}

/// Reject empty string values like `category = ""`
pub fn non_empty(lit: LitStr, key: &str) -> syn::Result<LitStr> {
    if lit.value().trim().is_empty() {
        return Err(syn::Error::new_spanned(lit, format!("`{}` must not be empty", key)));
    }
    Ok(lit)
}
