use colored::Colorize;
use fnflow_cloud::{FunctionLifecycle, ResourceNames, resolve_compartment};
use fnflow_cloud_oci::{OciCli, OciProvider};
use fnflow_config::{CompartmentRef, Settings};

/// Settings plus a connected provider, shared by every command
pub struct Context {
    pub settings: Settings,
    pub compartment_id: String,
    provider: OciProvider,
}

impl Context {
    /// Build the OCI provider and resolve the compartment
    pub async fn connect(settings: Settings) -> anyhow::Result<Self> {
        let mut cli = OciCli::new()
            .with_profile(&settings.oci_profile)
            .with_debug(settings.debug);
        if let Some(path) = &settings.oci_config_path {
            cli = cli.with_config_file(path);
        }
        let provider = OciProvider::new(cli);
        provider.check_cli().await?;

        let compartment_id = match &settings.compartment {
            CompartmentRef::Id(id) => id.clone(),
            CompartmentRef::Name(name) => {
                let tenancy = settings.tenancy_id()?;
                let id = resolve_compartment(&provider, &tenancy, name).await?;
                // stdout は JSON 出力と関数レスポンス専用
                eprintln!("コンパートメント {} → {}", name.cyan(), id.dimmed());
                id
            }
        };

        tracing::debug!("Using compartment {}", compartment_id);

        Ok(Self {
            settings,
            compartment_id,
            provider,
        })
    }

    pub fn names(&self) -> ResourceNames {
        ResourceNames::new(&self.settings.run_name)
    }

    pub fn lifecycle(&self) -> FunctionLifecycle<'_> {
        FunctionLifecycle::new(&self.provider, &self.provider, &self.provider, self.names())
    }
}
