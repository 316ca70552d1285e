/// atext RFC 5322 (ASCII) + UTF-8 (RFC 6532).
pub(crate) fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
        || (!c.is_ascii() && !c.is_whitespace() && !c.is_control())
}

/// Règles strictes: atext ASCII uniquement, pas de quoted-string, 1..=64 octets.
/// Le point final toléré par le fallback trailing-dot reste accepté ici.
pub(crate) fn check_local_strict(local: &str, reasons: &mut Vec<String>) {
    if local.is_empty() || local.len() > 64 {
        reasons.push(format!(
            "local part length {} invalid (1..=64)",
            local.len()
        ));
    }
    if local.starts_with('"') {
        reasons.push("quoted local part not allowed (strict rules)".to_string());
        return;
    }
    if !local
        .chars()
        .all(|c| c == '.' || (c.is_ascii() && is_atext(c)))
    {
        reasons.push("invalid local part (strict rules)".to_string());
    }
}
