/// Convert a string to snake_case
///
/// `getOrder`, `get-order` and `Get Order` all become `get_order`.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_lower && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch.is_lowercase() || ch.is_ascii_digit() {
            result.push(ch);
            prev_lower = true;
        } else if ch == '-' || ch == ' ' || ch == '_' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
        }
    }

    result.trim_end_matches('_').to_string()
}

/// Convert a snake_case string to CamelCase
pub fn to_camel_case(s: &str) -> String {
    s.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Turn an arbitrary name into a usable Rust identifier
///
/// Invalid characters become `_`, a leading digit gets a `_` prefix and
/// keywords are emitted as raw identifiers.
pub fn sanitize_rust_identifier(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
        "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
        "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where",
        "while", "async", "await", "dyn",
    ];
    let mut s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if s.is_empty() {
        s = "_".to_string();
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    // `self`, `super` and friends cannot be raw identifiers
    if matches!(s.as_str(), "self" | "Self" | "super" | "crate") {
        s.push('_');
        return s;
    }
    if KEYWORDS.contains(&s.as_str()) {
        format!("r#{s}")
    } else {
        s
    }
}

/// Method or parameter identifier for a catalog name
pub fn method_ident(name: &str) -> String {
    sanitize_rust_identifier(&to_snake_case(name))
}
