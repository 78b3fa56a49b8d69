//! OCI CLI config file lookup

use crate::error::{ConfigError, Result};
use config::{Config, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `~/.oci/config`
pub fn default_oci_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(".oci").join("config"))
}

/// Resolve a leading `~/` the way the OCI CLI does
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

/// Read the `tenancy` OCID of `profile` from an OCI config file
pub fn read_tenancy(path: &Path, profile: &str) -> Result<String> {
    if !path.exists() {
        return Err(ConfigError::OciConfigNotFound(path.to_path_buf()));
    }

    let sections: HashMap<String, HashMap<String, String>> = Config::builder()
        .add_source(File::new(&path.to_string_lossy(), FileFormat::Ini))
        .build()?
        .try_deserialize()?;

    // Section and key case is not preserved by every config backend
    let section = sections
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(profile))
        .map(|(_, values)| values)
        .ok_or_else(|| ConfigError::ProfileNotFound {
            profile: profile.to_string(),
            path: path.to_path_buf(),
        })?;

    section
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("tenancy"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::TenancyNotFound(profile.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const OCI_CONFIG: &str = "\
[DEFAULT]
user=ocid1.user.oc1..aaaa
fingerprint=11:22:33
key_file=~/.oci/oci_api_key.pem
tenancy=ocid1.tenancy.oc1..default
region=us-phoenix-1

[DEV]
user=ocid1.user.oc1..bbbb
tenancy=ocid1.tenancy.oc1..dev
region=ap-tokyo-1
";

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_tenancy_default_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, OCI_CONFIG);

        assert_eq!(
            read_tenancy(&path, "DEFAULT").unwrap(),
            "ocid1.tenancy.oc1..default"
        );
    }

    #[test]
    fn test_read_tenancy_named_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, OCI_CONFIG);

        assert_eq!(read_tenancy(&path, "DEV").unwrap(), "ocid1.tenancy.oc1..dev");
    }

    #[test]
    fn test_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, OCI_CONFIG);

        let result = read_tenancy(&path, "PROD");
        assert!(matches!(result, Err(ConfigError::ProfileNotFound { .. })));
    }

    #[test]
    fn test_profile_without_tenancy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[DEFAULT]\nregion=us-ashburn-1\n");

        let result = read_tenancy(&path, "DEFAULT");
        assert!(matches!(result, Err(ConfigError::TenancyNotFound(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_tenancy(&dir.path().join("nope"), "DEFAULT");
        assert!(matches!(result, Err(ConfigError::OciConfigNotFound(_))));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("/etc/oci/config").unwrap(),
            PathBuf::from("/etc/oci/config")
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.oci/config").unwrap(), home.join(".oci/config"));
        }
    }
}
