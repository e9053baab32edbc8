use std::fs::{self, OpenOptions};
use std::io::Write;

use regex::Regex;

use crate::error::AppError;
use crate::registry::Paths;

/// Renders the SSH config stanza for one host alias
pub fn render_stanza(host_alias: &str, private_key: &str) -> String {
    format!(
        "Host {host_alias}\n  HostName github.com\n  User git\n  IdentityFile {private_key}\n\n"
    )
}

/// Whether `content` already contains a stanza for `host_alias`.
/// Header comparison is exact so `github-bob` does not match `github-bob2`.
pub fn has_stanza(content: &str, host_alias: &str) -> bool {
    let header = format!("Host {host_alias}");
    content.lines().any(|line| line.trim_end() == header)
}

/// Removes the stanza for `host_alias`: the header line plus the
/// immediately following indented `HostName`/`User`/`IdentityFile` lines.
/// Indented lines with any other field name are left behind.
pub fn remove_stanza(content: &str, host_alias: &str) -> Result<String, AppError> {
    let pattern = format!(
        r"(?m)^Host {}[ \t]*\n(?:[ \t]+(?:HostName|User|IdentityFile)\b.*\n?)*",
        regex::escape(host_alias)
    );
    let block = Regex::new(&pattern)?;
    Ok(block.replace_all(content, "").into_owned())
}

/// Appends a stanza to the github SSH config file
pub fn append_stanza(paths: &Paths, stanza: &str) -> Result<(), AppError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.github_config)?;
    file.write_all(stanza.as_bytes())?;
    log::info!("ssh config stanza written to {}", paths.github_config.display());
    Ok(())
}

/// Rewrites the github SSH config file with `content`
pub fn rewrite_config(paths: &Paths, content: &str) -> Result<(), AppError> {
    fs::write(&paths.github_config, content)?;
    Ok(())
}

/// Reads the github SSH config file; missing file means empty
pub fn read_config(paths: &Paths) -> Result<String, AppError> {
    if !paths.github_config.exists() {
        return Ok(String::new());
    }
    Ok(fs::read_to_string(&paths.github_config)?)
}

/// Ensures the main SSH config includes the github one, adding the
/// `Include` directive once. Idempotent.
pub fn ensure_include(paths: &Paths) -> Result<(), AppError> {
    fs::create_dir_all(&paths.ssh_dir)?;
    let include_line = format!("Include {}", paths.github_config.display());

    let existing = if paths.main_config.exists() {
        fs::read_to_string(&paths.main_config)?
    } else {
        String::new()
    };
    if existing.lines().any(|line| line.trim() == include_line) {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.main_config)?;
    writeln!(file, "\n{include_line}")?;
    log::info!("added Include directive to {}", paths.main_config.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn header_match_is_exact() {
        let content = render_stanza("github-bob2", "/keys/github_bob2");
        assert!(has_stanza(&content, "github-bob2"));
        assert!(!has_stanza(&content, "github-bob"));
    }

    #[test]
    fn remove_deletes_exactly_one_stanza() {
        let content = format!(
            "{}{}",
            render_stanza("github-bob", "/keys/github_bob"),
            render_stanza("github-alice", "/keys/github_alice")
        );
        let cleaned = remove_stanza(&content, "github-bob").unwrap();
        assert!(!has_stanza(&cleaned, "github-bob"));
        assert!(has_stanza(&cleaned, "github-alice"));
        assert!(!cleaned.contains("/keys/github_bob\n"));
        assert!(cleaned.contains("IdentityFile /keys/github_alice"));
    }

    #[test]
    fn remove_leaves_unrecognized_field_lines() {
        let content =
            "Host github-bob\n  HostName github.com\n  Port 443\n  User git\n";
        let cleaned = remove_stanza(content, "github-bob").unwrap();
        assert!(!cleaned.contains("Host github-bob"));
        assert!(!cleaned.contains("HostName"));
        // bounded pattern stops at the first unknown field
        assert!(cleaned.contains("Port 443"));
        assert!(cleaned.contains("User git"));
    }

    #[test]
    fn replace_then_append_keeps_one_stanza() {
        let old = render_stanza("github-bob", "/old/key");
        let cleaned = remove_stanza(&old, "github-bob").unwrap();
        let rebuilt = format!("{}{}", cleaned, render_stanza("github-bob", "/new/key"));
        assert_eq!(
            rebuilt.matches("Host github-bob\n").count(),
            1,
            "exactly one stanza after replace"
        );
        assert!(rebuilt.contains("IdentityFile /new/key"));
    }

    #[test]
    fn include_directive_is_added_once() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        ensure_include(&paths).unwrap();
        ensure_include(&paths).unwrap();

        let content = fs::read_to_string(&paths.main_config).unwrap();
        assert_eq!(content.matches("Include ").count(), 1);
    }
}
