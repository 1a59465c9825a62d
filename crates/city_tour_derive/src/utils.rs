use quote::quote;
use syn::{Ident, Path, Type};

pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parse_with) = parse_with {
        quote! { #parse_with(&raw)? }
    } else {
        quote! {
            raw.trim().parse::<#ty>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        }
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Value expression for one `KvDisplay` field. `or_dash` renders an empty
/// string as `-`.
pub fn kv_value_expr(field: &Ident, fmt_mode: &str) -> Result<proc_macro2::TokenStream, String> {
    match fmt_mode {
        "display" => Ok(quote! { self.#field }),
        "or_dash" => Ok(quote! {
            if self.#field.is_empty() { "-" } else { self.#field.as_str() }
        }),
        other => Err(format!(
            "unsupported kv fmt mode: {other} (expected display or or_dash)"
        )),
    }
}

/// Builds a `write!` template with one `\tkey = {}` line per key, padding keys
/// to a common width so the `=` signs line up.
pub fn aligned_kv_template(keys: &[String]) -> String {
    let width = keys.iter().map(String::len).max().unwrap_or(0);
    let lines: Vec<String> = keys
        .iter()
        .map(|key| format!("\t{key:<width$} = {{}}"))
        .collect();
    format!("\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{aligned_kv_template, build_cli_parse_expr, kv_value_expr, to_kebab_case};

    #[test]
    fn to_kebab_case_inserts_dashes_before_ascii_uppercase() {
        assert_eq!(to_kebab_case("SolveMode"), "solve-mode");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case("X"), "x");
    }

    #[test]
    fn aligned_kv_template_pads_keys_to_longest() {
        let template = aligned_kv_template(&["mode".to_string(), "log_level".to_string()]);
        assert_eq!(template, "\n\tmode      = {}\n\tlog_level = {}");
    }

    #[test]
    fn aligned_kv_template_is_a_bare_newline_without_keys() {
        assert_eq!(aligned_kv_template(&[]), "\n");
    }

    #[test]
    fn build_cli_parse_expr_prefers_parse_with() {
        let ty: syn::Type = parse_quote!(SolveMode);
        let path: syn::Path = parse_quote!(SolveMode::parse);
        let expr = build_cli_parse_expr(&ty, Some(&path)).to_string();
        assert!(expr.contains("SolveMode :: parse"));
        assert!(!expr.contains("invalid_input"));
    }

    #[test]
    fn build_cli_parse_expr_falls_back_to_from_str() {
        let ty: syn::Type = parse_quote!(usize);
        let expr = build_cli_parse_expr(&ty, None).to_string();
        assert!(expr.contains("parse :: < usize >"));
        assert!(expr.contains("invalid_input"));
    }

    #[test]
    fn kv_value_expr_supports_display_and_or_dash() {
        let field: syn::Ident = parse_quote!(input);
        let display = kv_value_expr(&field, "display").expect("display").to_string();
        assert_eq!(display, "self . input");
        let dashed = kv_value_expr(&field, "or_dash").expect("or_dash").to_string();
        assert!(dashed.contains("is_empty"));
        assert!(dashed.contains("\"-\""));
    }

    #[test]
    fn kv_value_expr_rejects_unknown_modes() {
        let field: syn::Ident = parse_quote!(input);
        let err = kv_value_expr(&field, "path").expect_err("unknown mode");
        assert!(err.contains("unsupported kv fmt mode: path"));
    }
}
