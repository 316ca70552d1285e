/// Profil strict: le domaine doit être un nom d'hôte joignable.
/// Conversion IDNA puis contrôle des labels, raisons poussées dans `reasons`.
pub(crate) fn check_hostname(domain: &str, reasons: &mut Vec<String>) {
    if domain.starts_with('[') {
        reasons.push("domain literal not allowed (strict rules)".to_string());
        return;
    }

    let ascii = match idna::domain_to_ascii(domain) {
        Ok(d) => d,
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return;
        }
    };

    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return;
    }
    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }
    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!(
                "domain label '{}' length {} > 63",
                label,
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!(
                "domain label '{}' cannot start/end with '-'",
                label
            ));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{}' has invalid chars", label));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn hostname_ok() {
        let mut reasons = vec![];
        check_hostname("mail.example.com", &mut reasons);
        assert!(reasons.is_empty(), "{:?}", reasons);
    }

    #[test]
    fn idn_hostname_ok() {
        let mut reasons = vec![];
        check_hostname("exämple.fr", &mut reasons);
        assert!(reasons.is_empty(), "{:?}", reasons);
    }

    #[test]
    fn single_label_rejected() {
        let mut reasons = vec![];
        check_hostname("localhost", &mut reasons);
        assert!(reasons.iter().any(|r| r.contains("at least one dot")));
    }

    #[test]
    fn literal_and_long_label_rejected() {
        let mut reasons = vec![];
        check_hostname("[192.0.2.1]", &mut reasons);
        assert!(!reasons.is_empty());

        let mut reasons = vec![];
        check_hostname(&format!("{}.com", "a".repeat(64)), &mut reasons);
        assert!(!reasons.is_empty());
    }

    #[test]
    fn underscore_label_rejected() {
        let mut reasons = vec![];
        check_hostname("my_host.example.com", &mut reasons);
        assert!(!reasons.is_empty());
    }
}
