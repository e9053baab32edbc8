use serde::{Deserialize, Serialize};

/// One registered GitHub account stored in the accounts registry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    /// Unique account alias (e.g. "work", "personal")
    pub account: String,
    /// GitHub email address, also used as the key comment
    pub email: String,
    /// Path to the ED25519 private key file
    pub private_key: String,
    /// Path to the matching .pub file
    pub public_key: String,
    /// Registration date (%Y-%m-%d)
    pub created_at: String,
    /// Date the account was last associated with a repository (%Y-%m-%d)
    pub last_used: String,
}

impl AccountEntry {
    /// SSH config `Host` name used to select this account's keypair
    pub fn host_alias(&self) -> String {
        host_alias(&self.account)
    }
}

/// Replaces every character outside [A-Za-z0-9_] so the alias is safe
/// to use in filenames and SSH host names
pub fn sanitize_alias(alias: &str) -> String {
    alias
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Derives the SSH config host alias for an account alias
pub fn host_alias(alias: &str) -> String {
    format!("github-{}", sanitize_alias(alias))
}

/// Derives the key file name (without directory) for an account alias
pub fn key_file_name(alias: &str) -> String {
    format!("github_{}", sanitize_alias(alias))
}

/// Today's date in the registry's %Y-%m-%d format
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_non_word_characters() {
        assert_eq!(sanitize_alias("work"), "work");
        assert_eq!(sanitize_alias("work-mac"), "work_mac");
        assert_eq!(sanitize_alias("a.b c/d"), "a_b_c_d");
        assert_eq!(sanitize_alias("snake_case_9"), "snake_case_9");
    }

    #[test]
    fn host_alias_uses_sanitized_form() {
        assert_eq!(host_alias("side-gig"), "github-side_gig");
        assert_eq!(key_file_name("side-gig"), "github_side_gig");
    }
}
