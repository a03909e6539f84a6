//! Email address utilities

/// Normalize an email address for use as a store key
///
/// Trims surrounding whitespace and lower-cases the address. All records
/// for an identity are keyed by this normalized form.
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Mask an email address for logging (e.g., `us***@example.com`)
///
/// Log lines never carry the full local part.
pub fn mask(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        _ => "***".to_string(),
    }
}
