use std::fs;
use std::path::{Path, PathBuf};

use crate::account::{self, AccountEntry};
use crate::error::AppError;

/// Fixed filesystem locations used by both workflows. Constructed from an
/// explicit root so tests can run against a temporary directory.
#[derive(Debug, Clone)]
pub struct Paths {
    /// `<root>/.ssh`
    pub ssh_dir: PathBuf,
    /// `<root>/.ssh/github` — keys, registry and per-account config live here
    pub github_dir: PathBuf,
    /// JSON array of [`AccountEntry`]
    pub accounts_file: PathBuf,
    /// SSH config stanzas for the github-* host aliases
    pub github_config: PathBuf,
    /// Optional `{name, email}` defaults
    pub defaults_file: PathBuf,
    /// The user's main SSH config, which must `Include` the github one
    pub main_config: PathBuf,
}

impl Paths {
    pub fn new(root: &Path) -> Self {
        let ssh_dir = root.join(".ssh");
        let github_dir = ssh_dir.join("github");
        Self {
            accounts_file: github_dir.join("accounts.json"),
            github_config: github_dir.join("config"),
            defaults_file: github_dir.join("account_defaults.json"),
            main_config: ssh_dir.join("config"),
            ssh_dir,
            github_dir,
        }
    }

    pub fn from_home() -> Result<Self, AppError> {
        let home = dirs::home_dir().ok_or_else(|| {
            AppError::Validation("failed to find the home directory".to_string())
        })?;
        Ok(Self::new(&home))
    }

    /// Absolute path of the private key file for an alias
    pub fn private_key(&self, alias: &str) -> PathBuf {
        self.github_dir.join(account::key_file_name(alias))
    }

    /// Absolute path of the matching public key file
    pub fn public_key(&self, alias: &str) -> PathBuf {
        self.private_key(alias).with_extension("pub")
    }
}

/// Creates the github directory and the registry/config/defaults files on
/// first run. Existing files are left untouched.
pub fn ensure_layout(paths: &Paths) -> Result<(), AppError> {
    fs::create_dir_all(&paths.github_dir)?;
    if !paths.accounts_file.exists() {
        save_accounts(paths, &[])?;
    }
    if !paths.github_config.exists() {
        fs::write(&paths.github_config, "")?;
    }
    if !paths.defaults_file.exists() {
        fs::write(&paths.defaults_file, "{\"name\": \"\", \"email\": \"\"}\n")?;
    }
    Ok(())
}

/// Loads all account entries. A missing file or directory means an empty
/// registry; an unparseable file is reported as corrupt.
pub fn load_accounts(paths: &Paths) -> Result<Vec<AccountEntry>, AppError> {
    if !paths.accounts_file.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(&paths.accounts_file)?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&contents).map_err(|source| AppError::RegistryCorrupt {
        path: paths.accounts_file.clone(),
        source,
    })
}

/// Rewrites the registry file
pub fn save_accounts(paths: &Paths, accounts: &[AccountEntry]) -> Result<(), AppError> {
    fs::create_dir_all(&paths.github_dir)?;
    let json = serde_json::to_string_pretty(accounts)?;
    fs::write(&paths.accounts_file, json)?;
    log::info!("registry saved: {} account(s)", accounts.len());
    Ok(())
}

/// Linear scan by the `account` field
pub fn find_account<'a>(accounts: &'a [AccountEntry], alias: &str) -> Option<&'a AccountEntry> {
    accounts.iter().find(|a| a.account == alias)
}

/// Appends a new entry and rewrites the registry
pub fn append_account(paths: &Paths, entry: AccountEntry) -> Result<(), AppError> {
    let mut accounts = load_accounts(paths)?;
    accounts.push(entry);
    save_accounts(paths, &accounts)
}

/// Deletes the entry for `alias` and its two key files. Missing key files
/// are not an error; returns whether an entry was removed.
pub fn remove_account(paths: &Paths, alias: &str) -> Result<bool, AppError> {
    let mut accounts = load_accounts(paths)?;
    let initial_len = accounts.len();
    let removed: Vec<AccountEntry> = accounts
        .iter()
        .filter(|a| a.account == alias)
        .cloned()
        .collect();
    accounts.retain(|a| a.account != alias);

    if accounts.len() == initial_len {
        // Stale key files may still exist without an entry
        remove_key_file(&paths.private_key(alias))?;
        remove_key_file(&paths.public_key(alias))?;
        return Ok(false);
    }

    save_accounts(paths, &accounts)?;
    for entry in removed {
        remove_key_file(Path::new(&entry.private_key))?;
        remove_key_file(Path::new(&entry.public_key))?;
    }
    Ok(true)
}

fn remove_key_file(path: &Path) -> Result<(), AppError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Stamps `last_used = today` on the entry for `alias`
pub fn touch_last_used(paths: &Paths, alias: &str) -> Result<(), AppError> {
    let mut accounts = load_accounts(paths)?;
    let Some(entry) = accounts.iter_mut().find(|a| a.account == alias) else {
        return Err(AppError::AccountNotFound(alias.to_string()));
    };
    entry.last_used = account::today();
    save_accounts(paths, &accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::today;
    use tempfile::TempDir;

    fn entry(paths: &Paths, alias: &str, email: &str) -> AccountEntry {
        AccountEntry {
            account: alias.to_string(),
            email: email.to_string(),
            private_key: paths.private_key(alias).to_string_lossy().into_owned(),
            public_key: paths.public_key(alias).to_string_lossy().into_owned(),
            created_at: today(),
            last_used: today(),
        }
    }

    #[test]
    fn missing_file_means_empty_registry() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        assert!(load_accounts(&paths).unwrap().is_empty());
    }

    #[test]
    fn empty_file_means_empty_registry() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        fs::create_dir_all(&paths.github_dir).unwrap();
        fs::write(&paths.accounts_file, "  \n").unwrap();
        assert!(load_accounts(&paths).unwrap().is_empty());
    }

    #[test]
    fn unparseable_file_is_corrupt() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        fs::create_dir_all(&paths.github_dir).unwrap();
        fs::write(&paths.accounts_file, "{not json").unwrap();
        assert!(matches!(
            load_accounts(&paths),
            Err(AppError::RegistryCorrupt { .. })
        ));
    }

    #[test]
    fn append_then_load_round_trips_field_values() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        let original = entry(&paths, "work", "dev@example.com");
        append_account(&paths, original.clone()).unwrap();

        let loaded = load_accounts(&paths).unwrap();
        assert_eq!(loaded, vec![original.clone()]);

        // Re-serialize and reload: field values must stay byte-for-byte equal
        save_accounts(&paths, &loaded).unwrap();
        let reloaded = load_accounts(&paths).unwrap();
        assert_eq!(reloaded, vec![original]);
    }

    #[test]
    fn remove_deletes_entry_and_key_files() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        fs::create_dir_all(&paths.github_dir).unwrap();
        let e = entry(&paths, "work", "dev@example.com");
        fs::write(&e.private_key, "key").unwrap();
        fs::write(&e.public_key, "key.pub").unwrap();
        append_account(&paths, e.clone()).unwrap();

        assert!(remove_account(&paths, "work").unwrap());
        assert!(find_account(&load_accounts(&paths).unwrap(), "work").is_none());
        assert!(!Path::new(&e.private_key).exists());
        assert!(!Path::new(&e.public_key).exists());
    }

    #[test]
    fn remove_is_idempotent_without_key_files() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        append_account(&paths, entry(&paths, "work", "dev@example.com")).unwrap();

        assert!(remove_account(&paths, "work").unwrap());
        assert!(!remove_account(&paths, "work").unwrap());
        assert!(find_account(&load_accounts(&paths).unwrap(), "work").is_none());
    }

    #[test]
    fn touch_last_used_updates_only_the_matching_entry() {
        let root = TempDir::new().unwrap();
        let paths = Paths::new(root.path());
        let mut stale = entry(&paths, "work", "dev@example.com");
        stale.last_used = "2001-01-01".to_string();
        append_account(&paths, stale).unwrap();
        append_account(&paths, entry(&paths, "personal", "me@example.com")).unwrap();

        touch_last_used(&paths, "work").unwrap();
        let accounts = load_accounts(&paths).unwrap();
        assert_eq!(find_account(&accounts, "work").unwrap().last_used, today());
    }
}
