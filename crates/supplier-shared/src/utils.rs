//! Utility functions

/// Upper-cased, trimmed form used for case-insensitive email lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_uppercase()
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible: String = local.chars().take(if local.chars().count() <= 2 { 1 } else { 2 }).collect();
        format!("{}***{}", visible, domain)
    } else {
        "***".to_string()
    }
}
