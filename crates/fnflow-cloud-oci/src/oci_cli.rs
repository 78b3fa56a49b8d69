//! oci CLI wrapper
//!
//! Wraps the `oci` CLI commands used by the function lifecycle. Every call
//! runs one CLI process with JSON output and unwraps the `{"data": ...}`
//! envelope.

use crate::error::{OciError, Result};
use fnflow_cloud::{
    Application, AvailabilityDomain, Compartment, CreateApplicationDetails, CreateFunctionDetails,
    CreateInternetGatewayDetails, CreateRouteTableDetails, CreateSubnetDetails, CreateVcnDetails,
    FreeformTags, Function, InternetGateway, RouteRule, RouteTable, Subnet, Vcn,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// oci CLI wrapper
#[derive(Debug, Clone)]
pub struct OciCli {
    program: String,
    config_file: Option<PathBuf>,
    profile: Option<String>,
    debug: bool,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Body the CLI prints after `ServiceError:` on stderr
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    status: u16,
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl OciCli {
    pub fn new() -> Self {
        Self {
            program: "oci".to_string(),
            config_file: None,
            profile: None,
            debug: false,
        }
    }

    /// Use another executable in place of `oci`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Pass `--debug` through to every command
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check the CLI is installed and return its version string
    pub async fn version(&self) -> Result<String> {
        let output = self.run_raw(&["--version"]).await?;
        Ok(output.trim().to_string())
    }

    fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(path) = &self.config_file {
            args.push("--config-file".to_string());
            args.push(path.display().to_string());
        }
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if self.debug {
            args.push("--debug".to_string());
        }
        args
    }

    /// Run a command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<String> = self.global_args();
        full.extend(args.iter().map(|a| a.to_string()));
        full.push("--output".to_string());
        full.push("json".to_string());
        let full: Vec<&str> = full.iter().map(String::as_str).collect();
        self.run_raw(&full).await
    }

    async fn run_raw(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => OciError::OciCliNotFound,
            _ => OciError::IoError(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(parse_failure(&stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a command returning a single resource
    async fn run_data<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let output = self.run_command(args).await?;
        if output.trim().is_empty() {
            return Err(OciError::UnexpectedOutput(format!(
                "no output from `{}`",
                args.join(" ")
            )));
        }
        let envelope: Envelope<T> = serde_json::from_str(&output)?;
        Ok(envelope.data)
    }

    /// Run a list command; the CLI prints nothing when the list is empty
    async fn run_list<T: DeserializeOwned>(&self, args: &[&str]) -> Result<Vec<T>> {
        let output = self.run_command(args).await?;
        if output.trim().is_empty() {
            return Ok(Vec::new());
        }
        let envelope: Envelope<Vec<T>> = serde_json::from_str(&output)?;
        Ok(envelope.data)
    }

    // ---- Networking ----

    pub async fn create_vcn(&self, details: &CreateVcnDetails) -> Result<Vcn> {
        let tags = tags_json(&details.freeform_tags)?;
        self.run_data(&[
            "network",
            "vcn",
            "create",
            "--compartment-id",
            &details.compartment_id,
            "--display-name",
            &details.display_name,
            "--cidr-block",
            &details.cidr_block,
            "--freeform-tags",
            &tags,
        ])
        .await
    }

    pub async fn get_vcn(&self, vcn_id: &str) -> Result<Vcn> {
        self.run_data(&["network", "vcn", "get", "--vcn-id", vcn_id])
            .await
    }

    pub async fn list_vcns(&self, compartment_id: &str, display_name: &str) -> Result<Vec<Vcn>> {
        self.run_list(&[
            "network",
            "vcn",
            "list",
            "--compartment-id",
            compartment_id,
            "--display-name",
            display_name,
            "--all",
        ])
        .await
    }

    pub async fn delete_vcn(&self, vcn_id: &str) -> Result<()> {
        self.run_command(&["network", "vcn", "delete", "--vcn-id", vcn_id, "--force"])
            .await?;
        Ok(())
    }

    pub async fn create_internet_gateway(
        &self,
        details: &CreateInternetGatewayDetails,
    ) -> Result<InternetGateway> {
        let tags = tags_json(&details.freeform_tags)?;
        let enabled = details.is_enabled.to_string();
        self.run_data(&[
            "network",
            "internet-gateway",
            "create",
            "--compartment-id",
            &details.compartment_id,
            "--vcn-id",
            &details.vcn_id,
            "--display-name",
            &details.display_name,
            "--is-enabled",
            &enabled,
            "--freeform-tags",
            &tags,
        ])
        .await
    }

    pub async fn get_internet_gateway(&self, ig_id: &str) -> Result<InternetGateway> {
        self.run_data(&["network", "internet-gateway", "get", "--ig-id", ig_id])
            .await
    }

    pub async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<InternetGateway>> {
        self.run_list(&[
            "network",
            "internet-gateway",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--display-name",
            display_name,
            "--all",
        ])
        .await
    }

    pub async fn delete_internet_gateway(&self, ig_id: &str) -> Result<()> {
        self.run_command(&[
            "network",
            "internet-gateway",
            "delete",
            "--ig-id",
            ig_id,
            "--force",
        ])
        .await?;
        Ok(())
    }

    pub async fn create_route_table(&self, details: &CreateRouteTableDetails) -> Result<RouteTable> {
        let tags = tags_json(&details.freeform_tags)?;
        let rules = route_rules_json(&details.route_rules)?;
        self.run_data(&[
            "network",
            "route-table",
            "create",
            "--compartment-id",
            &details.compartment_id,
            "--vcn-id",
            &details.vcn_id,
            "--display-name",
            &details.display_name,
            "--route-rules",
            &rules,
            "--freeform-tags",
            &tags,
        ])
        .await
    }

    pub async fn get_route_table(&self, rt_id: &str) -> Result<RouteTable> {
        self.run_data(&["network", "route-table", "get", "--rt-id", rt_id])
            .await
    }

    pub async fn list_route_tables(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<RouteTable>> {
        self.run_list(&[
            "network",
            "route-table",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--display-name",
            display_name,
            "--all",
        ])
        .await
    }

    pub async fn delete_route_table(&self, rt_id: &str) -> Result<()> {
        self.run_command(&["network", "route-table", "delete", "--rt-id", rt_id, "--force"])
            .await?;
        Ok(())
    }

    pub async fn create_subnet(&self, details: &CreateSubnetDetails) -> Result<Subnet> {
        let tags = tags_json(&details.freeform_tags)?;
        let mut args = vec![
            "network",
            "subnet",
            "create",
            "--compartment-id",
            details.compartment_id.as_str(),
            "--vcn-id",
            details.vcn_id.as_str(),
            "--display-name",
            details.display_name.as_str(),
            "--cidr-block",
            details.cidr_block.as_str(),
            "--route-table-id",
            details.route_table_id.as_str(),
            "--freeform-tags",
            tags.as_str(),
        ];

        // Omitted for a regional subnet
        if let Some(ref ad) = details.availability_domain {
            args.push("--availability-domain");
            args.push(ad.as_str());
        }

        self.run_data(&args).await
    }

    pub async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet> {
        self.run_data(&["network", "subnet", "get", "--subnet-id", subnet_id])
            .await
    }

    pub async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<Subnet>> {
        self.run_list(&[
            "network",
            "subnet",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--display-name",
            display_name,
            "--all",
        ])
        .await
    }

    pub async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.run_command(&[
            "network",
            "subnet",
            "delete",
            "--subnet-id",
            subnet_id,
            "--force",
        ])
        .await?;
        Ok(())
    }

    // ---- Functions ----

    pub async fn create_application(
        &self,
        details: &CreateApplicationDetails,
    ) -> Result<Application> {
        let tags = tags_json(&details.freeform_tags)?;
        let subnet_ids = serde_json::to_string(&details.subnet_ids)?;
        self.run_data(&[
            "fn",
            "application",
            "create",
            "--compartment-id",
            &details.compartment_id,
            "--display-name",
            &details.display_name,
            "--subnet-ids",
            &subnet_ids,
            "--freeform-tags",
            &tags,
        ])
        .await
    }

    pub async fn get_application(&self, application_id: &str) -> Result<Application> {
        self.run_data(&["fn", "application", "get", "--application-id", application_id])
            .await
    }

    pub async fn list_applications(
        &self,
        compartment_id: &str,
        display_name: &str,
    ) -> Result<Vec<Application>> {
        self.run_list(&[
            "fn",
            "application",
            "list",
            "--compartment-id",
            compartment_id,
            "--display-name",
            display_name,
            "--all",
        ])
        .await
    }

    pub async fn delete_application(&self, application_id: &str) -> Result<()> {
        self.run_command(&[
            "fn",
            "application",
            "delete",
            "--application-id",
            application_id,
            "--force",
        ])
        .await?;
        Ok(())
    }

    pub async fn create_function(&self, details: &CreateFunctionDetails) -> Result<Function> {
        let tags = tags_json(&details.freeform_tags)?;
        let memory = details.memory_in_mbs.to_string();
        let timeout = details.timeout_in_seconds.to_string();
        self.run_data(&[
            "fn",
            "function",
            "create",
            "--application-id",
            &details.application_id,
            "--display-name",
            &details.display_name,
            "--image",
            &details.image,
            "--memory-in-mbs",
            &memory,
            "--timeout-in-seconds",
            &timeout,
            "--freeform-tags",
            &tags,
        ])
        .await
    }

    pub async fn get_function(&self, function_id: &str) -> Result<Function> {
        self.run_data(&["fn", "function", "get", "--function-id", function_id])
            .await
    }

    pub async fn list_functions(
        &self,
        application_id: &str,
        display_name: &str,
    ) -> Result<Vec<Function>> {
        self.run_list(&[
            "fn",
            "function",
            "list",
            "--application-id",
            application_id,
            "--display-name",
            display_name,
            "--all",
        ])
        .await
    }

    pub async fn delete_function(&self, function_id: &str) -> Result<()> {
        self.run_command(&[
            "fn",
            "function",
            "delete",
            "--function-id",
            function_id,
            "--force",
        ])
        .await?;
        Ok(())
    }

    /// Invoke and return the response body exactly as written by the function
    pub async fn invoke_function(&self, function_id: &str, payload: &str) -> Result<String> {
        let mut args = self.global_args();
        args.extend(
            [
                "fn",
                "function",
                "invoke",
                "--function-id",
                function_id,
                "--file",
                "-",
                "--body",
                payload,
            ]
            .iter()
            .map(|a| a.to_string()),
        );
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_raw(&args).await
    }

    // ---- Identity ----

    pub async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AvailabilityDomain>> {
        self.run_list(&[
            "iam",
            "availability-domain",
            "list",
            "--compartment-id",
            compartment_id,
        ])
        .await
    }

    /// Compartments anywhere under the tenancy
    pub async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>> {
        self.run_list(&[
            "iam",
            "compartment",
            "list",
            "--compartment-id",
            tenancy_id,
            "--compartment-id-in-subtree",
            "true",
            "--access-level",
            "ACCESSIBLE",
            "--all",
        ])
        .await
    }
}

impl Default for OciCli {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a failed command's stderr to an error, preferring the service error body
fn parse_failure(stderr: &str) -> OciError {
    match parse_service_error(stderr) {
        Some(body) if body.status == 404 => OciError::NotFound(body.message),
        Some(body) => OciError::ServiceError {
            status: body.status,
            code: body.code,
            message: body.message,
        },
        None => OciError::CommandFailed(stderr.trim().to_string()),
    }
}

fn parse_service_error(stderr: &str) -> Option<ServiceErrorBody> {
    let rest = &stderr[stderr.find("ServiceError:")?..];
    let start = rest.find('{')?;
    let end = rest.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&rest[start..=end]).ok()
}

fn tags_json(tags: &FreeformTags) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}

/// Route rules in the camelCase form the CLI accepts
fn route_rules_json(rules: &[RouteRule]) -> Result<String> {
    let rules: Vec<serde_json::Value> = rules
        .iter()
        .map(|r| {
            serde_json::json!({
                "destination": r.destination,
                "destinationType": r.destination_type,
                "networkEntityId": r.network_entity_id,
            })
        })
        .collect();
    Ok(serde_json::to_string(&rules)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_not_found() {
        let stderr = r#"ServiceError:
{
    "code": "NotAuthorizedOrNotFound",
    "message": "Authorization failed or requested resource not found.",
    "opc-request-id": "ABC/DEF",
    "status": 404
}
"#;
        assert!(matches!(parse_failure(stderr), OciError::NotFound(_)));
    }

    #[test]
    fn test_parse_conflict() {
        let stderr = r#"ServiceError:
{"code": "Conflict", "message": "The Subnet is in use", "status": 409}"#;
        match parse_failure(stderr) {
            OciError::ServiceError { status, code, .. } => {
                assert_eq!(status, 409);
                assert_eq!(code, "Conflict");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_plain_failure() {
        let err = parse_failure("Error: Missing option(s) --compartment-id.\n");
        assert!(matches!(err, OciError::CommandFailed(ref m) if m.contains("--compartment-id")));
    }

    #[test]
    fn test_route_rules_json_is_camel_case() {
        let json = route_rules_json(&[RouteRule::default_route("ocid1.internetgateway.oc1..x")])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["destination"], "0.0.0.0/0");
        assert_eq!(value[0]["destinationType"], "CIDR_BLOCK");
        assert_eq!(value[0]["networkEntityId"], "ocid1.internetgateway.oc1..x");
    }

    #[test]
    fn test_global_args() {
        let cli = OciCli::new()
            .with_config_file("/tmp/oci/config")
            .with_profile("DEV")
            .with_debug(true);
        assert_eq!(
            cli.global_args(),
            vec!["--config-file", "/tmp/oci/config", "--profile", "DEV", "--debug"]
        );
        assert!(OciCli::new().global_args().is_empty());
    }

    #[cfg(unix)]
    mod with_fake_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Write an executable script standing in for `oci`
        fn fake_oci(dir: &TempDir, body: &str) -> String {
            let path = dir.path().join("oci");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path.display().to_string()
        }

        #[tokio::test]
        async fn test_get_unwraps_data_envelope() {
            let dir = TempDir::new().unwrap();
            let program = fake_oci(
                &dir,
                r#"echo '{"data": {"id": "ocid1.vcn.oc1..a", "compartment-id": "c", "display-name": "demo-vcn", "cidr-block": "10.0.0.0/16", "lifecycle-state": "AVAILABLE", "freeform-tags": {"fnflow-run": "demo"}}, "etag": "x"}'"#,
            );

            let vcn = OciCli::new()
                .with_program(program)
                .get_vcn("ocid1.vcn.oc1..a")
                .await
                .unwrap();
            assert_eq!(vcn.display_name, "demo-vcn");
            assert!(vcn.lifecycle_state.is_ready());
        }

        #[tokio::test]
        async fn test_empty_list_output() {
            let dir = TempDir::new().unwrap();
            let program = fake_oci(&dir, "exit 0");

            let apps = OciCli::new()
                .with_program(program)
                .list_applications("c", "demo-app")
                .await
                .unwrap();
            assert!(apps.is_empty());
        }

        #[tokio::test]
        async fn test_get_missing_resource() {
            let dir = TempDir::new().unwrap();
            let program = fake_oci(
                &dir,
                r#"echo 'ServiceError:' >&2
echo '{"code": "NotAuthorizedOrNotFound", "message": "not found", "status": 404}' >&2
exit 1"#,
            );

            let result = OciCli::new()
                .with_program(program)
                .get_subnet("ocid1.subnet.oc1..gone")
                .await;
            assert!(matches!(result, Err(OciError::NotFound(_))));
        }

        #[tokio::test]
        async fn test_invoke_returns_raw_body() {
            let dir = TempDir::new().unwrap();
            // Echo the --body argument back the way a hello-world function would
            let program = fake_oci(
                &dir,
                r#"while [ $# -gt 0 ]; do
  if [ "$1" = "--body" ]; then printf 'Hello %s!' "$2"; fi
  shift
done"#,
            );

            let body = OciCli::new()
                .with_program(program)
                .invoke_function("ocid1.fnfunc.oc1..a", "fnflow")
                .await
                .unwrap();
            assert_eq!(body, "Hello fnflow!");
        }

        #[tokio::test]
        async fn test_list_compartments_accessible_only() {
            let dir = TempDir::new().unwrap();
            // Only answer when the listing is restricted to accessible compartments
            let program = fake_oci(
                &dir,
                r#"case "$*" in
  *"--access-level ACCESSIBLE"*)
    echo '{"data": [{"id": "ocid1.compartment.oc1..sb", "name": "sandbox", "lifecycle-state": "ACTIVE"}]}' ;;
  *) exit 2 ;;
esac"#,
            );

            let compartments = OciCli::new()
                .with_program(program)
                .list_compartments("ocid1.tenancy.oc1..t")
                .await
                .unwrap();
            assert_eq!(compartments.len(), 1);
            assert_eq!(compartments[0].name, "sandbox");
        }
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let result = OciCli::new()
            .with_program("/nonexistent/oci-cli-for-tests")
            .version()
            .await;
        assert!(matches!(result, Err(OciError::OciCliNotFound)));
    }
}
