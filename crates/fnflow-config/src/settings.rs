//! Environment settings

use crate::error::{ConfigError, Result};
use crate::oci_profile::{default_oci_config_path, expand_home, read_tenancy};
use fnflow_cloud::{DEFAULT_MEMORY_MBS, DEFAULT_RUN_NAME, DEFAULT_TIMEOUT_SECONDS, SubnetPlacement};
use std::ops::RangeInclusive;
use std::path::PathBuf;

pub const DEFAULT_OCI_PROFILE: &str = "DEFAULT";

/// Memory sizes accepted by OCI Functions
pub const ALLOWED_MEMORY_MBS: [u32; 5] = [128, 256, 512, 1024, 2048];

pub const TIMEOUT_RANGE_SECONDS: RangeInclusive<u32> = 5..=300;

/// How the target compartment was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompartmentRef {
    Id(String),
    /// Resolved against the tenancy of the OCI profile
    Name(String),
}

/// Everything fnflow reads from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub compartment: CompartmentRef,
    pub image: Option<String>,
    pub payload: String,
    pub run_name: String,
    pub memory_in_mbs: u32,
    pub timeout_in_seconds: u32,
    pub placement: SubnetPlacement,
    pub oci_config_path: Option<PathBuf>,
    pub oci_profile: String,
    pub debug: bool,
}

impl Settings {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`; empty values count as unset. Every value but
    /// the payload is trimmed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let compartment = match (get("COMPARTMENT_NAME"), get("COMPARTMENT_ID")) {
            (Some(name), _) => CompartmentRef::Name(name),
            (None, Some(id)) => CompartmentRef::Id(id),
            (None, None) => return Err(ConfigError::MissingCompartment),
        };

        let memory_in_mbs = match get("FN_MEMORY_MB") {
            Some(raw) => parse_memory(&raw)?,
            None => DEFAULT_MEMORY_MBS,
        };

        let timeout_in_seconds = match get("FN_TIMEOUT_SECONDS") {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        let placement = match get("AVAILABILITY_DOMAIN") {
            None => SubnetPlacement::Regional,
            Some(ad) if ad.eq_ignore_ascii_case("auto") => SubnetPlacement::FirstAvailabilityDomain,
            Some(ad) => SubnetPlacement::AvailabilityDomain(ad),
        };

        let oci_config_path = get("OCI_CONFIG_PATH")
            .map(|p| expand_home(&p))
            .transpose()?;

        let debug = match get("DEBUG") {
            Some(raw) => parse_debug(&raw)?,
            None => false,
        };

        Ok(Self {
            compartment,
            image: get("OCIR_FN_IMAGE"),
            payload: lookup("FN_PAYLOAD").unwrap_or_default(),
            run_name: get("FN_RUN_NAME").unwrap_or_else(|| DEFAULT_RUN_NAME.to_string()),
            memory_in_mbs,
            timeout_in_seconds,
            placement,
            oci_config_path,
            oci_profile: get("OCI_CONFIG_PROFILE").unwrap_or_else(|| DEFAULT_OCI_PROFILE.to_string()),
            debug,
        })
    }

    /// Image reference, required by setup only
    pub fn require_image(&self) -> Result<&str> {
        self.image
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OCIR_FN_IMAGE".to_string()))
    }

    /// Config file the OCI CLI will read
    pub fn resolved_oci_config_path(&self) -> Result<PathBuf> {
        match &self.oci_config_path {
            Some(path) => Ok(path.clone()),
            None => default_oci_config_path(),
        }
    }

    /// Tenancy OCID of the configured profile
    pub fn tenancy_id(&self) -> Result<String> {
        read_tenancy(&self.resolved_oci_config_path()?, &self.oci_profile)
    }
}

fn parse_memory(raw: &str) -> Result<u32> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: "FN_MEMORY_MB".to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let mb: u32 = raw.parse().map_err(|_| invalid("整数で指定してください"))?;
    if !ALLOWED_MEMORY_MBS.contains(&mb) {
        return Err(invalid("128, 256, 512, 1024, 2048 のいずれかを指定してください"));
    }
    Ok(mb)
}

fn parse_timeout(raw: &str) -> Result<u32> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: "FN_TIMEOUT_SECONDS".to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let secs: u32 = raw.parse().map_err(|_| invalid("整数で指定してください"))?;
    if !TIMEOUT_RANGE_SECONDS.contains(&secs) {
        return Err(invalid("5 から 300 の範囲で指定してください"));
    }
    Ok(secs)
}

fn parse_debug(raw: &str) -> Result<bool> {
    raw.parse::<i64>()
        .map(|level| level > 0)
        .map_err(|_| ConfigError::InvalidValue {
            var: "DEBUG".to_string(),
            value: raw.to_string(),
            reason: "整数で指定してください".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[("COMPARTMENT_ID", "ocid1.compartment.oc1..a")]).unwrap();

        assert_eq!(
            settings.compartment,
            CompartmentRef::Id("ocid1.compartment.oc1..a".to_string())
        );
        assert_eq!(settings.image, None);
        assert_eq!(settings.payload, "");
        assert_eq!(settings.run_name, "fnflow-function-example");
        assert_eq!(settings.memory_in_mbs, 128);
        assert_eq!(settings.timeout_in_seconds, 30);
        assert_eq!(settings.placement, SubnetPlacement::Regional);
        assert_eq!(settings.oci_profile, "DEFAULT");
        assert!(!settings.debug);
    }

    #[test]
    fn test_missing_compartment() {
        let result = load(&[("OCIR_FN_IMAGE", "phx.ocir.io/t/fn/hello:1")]);
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::MissingCompartment));
        assert!(err.to_string().contains("COMPARTMENT_ID"));
    }

    #[test]
    fn test_empty_counts_as_unset() {
        let result = load(&[("COMPARTMENT_ID", ""), ("COMPARTMENT_NAME", "  ")]);
        assert!(matches!(result, Err(ConfigError::MissingCompartment)));

        let settings = load(&[("COMPARTMENT_ID", "c"), ("FN_RUN_NAME", "")]).unwrap();
        assert_eq!(settings.run_name, "fnflow-function-example");
    }

    #[test]
    fn test_compartment_name_wins_over_id() {
        let settings = load(&[("COMPARTMENT_ID", "c"), ("COMPARTMENT_NAME", "sandbox")]).unwrap();
        assert_eq!(settings.compartment, CompartmentRef::Name("sandbox".to_string()));

        let settings = load(&[("COMPARTMENT_ID", "c"), ("COMPARTMENT_NAME", "")]).unwrap();
        assert_eq!(settings.compartment, CompartmentRef::Id("c".to_string()));
    }

    #[test]
    fn test_payload_is_not_trimmed() {
        let settings = load(&[("COMPARTMENT_ID", "c"), ("FN_PAYLOAD", "  hello world \n")]).unwrap();
        assert_eq!(settings.payload, "  hello world \n");

        let settings = load(&[("COMPARTMENT_ID", "c"), ("FN_PAYLOAD", "")]).unwrap();
        assert_eq!(settings.payload, "");
    }

    #[test]
    fn test_require_image() {
        let settings = load(&[("COMPARTMENT_ID", "c")]).unwrap();
        let err = settings.require_image().unwrap_err();
        assert!(err.to_string().contains("OCIR_FN_IMAGE"));

        let settings = load(&[("COMPARTMENT_ID", "c"), ("OCIR_FN_IMAGE", "img:1")]).unwrap();
        assert_eq!(settings.require_image().unwrap(), "img:1");
    }

    #[test]
    fn test_memory_validation() {
        let settings = load(&[("COMPARTMENT_ID", "c"), ("FN_MEMORY_MB", "512")]).unwrap();
        assert_eq!(settings.memory_in_mbs, 512);

        for bad in ["100", "lots", "-128"] {
            let result = load(&[("COMPARTMENT_ID", "c"), ("FN_MEMORY_MB", bad)]);
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { ref var, .. }) if var == "FN_MEMORY_MB"),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_timeout_validation() {
        let settings = load(&[("COMPARTMENT_ID", "c"), ("FN_TIMEOUT_SECONDS", "300")]).unwrap();
        assert_eq!(settings.timeout_in_seconds, 300);

        for bad in ["4", "301", "soon"] {
            assert!(load(&[("COMPARTMENT_ID", "c"), ("FN_TIMEOUT_SECONDS", bad)]).is_err());
        }
    }

    #[test]
    fn test_availability_domain() {
        let settings = load(&[("COMPARTMENT_ID", "c"), ("AVAILABILITY_DOMAIN", "auto")]).unwrap();
        assert_eq!(settings.placement, SubnetPlacement::FirstAvailabilityDomain);

        let settings =
            load(&[("COMPARTMENT_ID", "c"), ("AVAILABILITY_DOMAIN", "Uocm:PHX-AD-2")]).unwrap();
        assert_eq!(
            settings.placement,
            SubnetPlacement::AvailabilityDomain("Uocm:PHX-AD-2".to_string())
        );
    }

    #[test]
    fn test_debug_level() {
        assert!(load(&[("COMPARTMENT_ID", "c"), ("DEBUG", "1")]).unwrap().debug);
        assert!(!load(&[("COMPARTMENT_ID", "c"), ("DEBUG", "0")]).unwrap().debug);
        assert!(load(&[("COMPARTMENT_ID", "c"), ("DEBUG", "yes")]).is_err());
    }

    #[test]
    fn test_tenancy_from_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "[SANDBOX]\ntenancy=ocid1.tenancy.oc1..s\n").unwrap();

        let settings = load(&[
            ("COMPARTMENT_NAME", "dev"),
            ("OCI_CONFIG_PATH", path.to_str().unwrap()),
            ("OCI_CONFIG_PROFILE", "SANDBOX"),
        ])
        .unwrap();
        assert_eq!(settings.tenancy_id().unwrap(), "ocid1.tenancy.oc1..s");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("COMPARTMENT_ID", Some("ocid1.compartment.oc1..env")),
                ("COMPARTMENT_NAME", None),
                ("FN_PAYLOAD", Some("hello")),
                ("FN_RUN_NAME", Some("env-run")),
                ("FN_MEMORY_MB", None),
                ("FN_TIMEOUT_SECONDS", None),
                ("AVAILABILITY_DOMAIN", None),
                ("DEBUG", None),
            ],
            || {
                let settings = Settings::from_env().unwrap();
                assert_eq!(
                    settings.compartment,
                    CompartmentRef::Id("ocid1.compartment.oc1..env".to_string())
                );
                assert_eq!(settings.payload, "hello");
                assert_eq!(settings.run_name, "env-run");
            },
        );
    }
}
