use super::FunctionLifecycle;
use crate::error::{CloudError, Result};
use crate::resource::{Function, Resource, ResourceKind};

impl FunctionLifecycle<'_> {
    /// Look up this run's function, requiring both it and its application to
    /// exist and be ACTIVE
    pub async fn find_function(&self, compartment_id: &str) -> Result<Function> {
        let app_name = self.names.application();
        let apps = self
            .functions
            .list_applications(compartment_id, &app_name)
            .await?;
        let app = self
            .find_unique(apps, &app_name)?
            .ok_or_else(|| CloudError::NotProvisioned {
                kind: ResourceKind::Application,
                name: app_name.clone(),
            })?;
        ensure_ready(&app)?;

        let fn_name = self.names.function();
        let functions = self.functions.list_functions(&app.id, &fn_name).await?;
        let function = self
            .find_unique(functions, &fn_name)?
            .ok_or_else(|| CloudError::NotProvisioned {
                kind: ResourceKind::Function,
                name: fn_name.clone(),
            })?;
        ensure_ready(&function)?;

        Ok(function)
    }

    /// Invoke this run's function once and return the raw response body
    pub async fn invoke(&self, compartment_id: &str, payload: &str) -> Result<String> {
        let function = self.find_function(compartment_id).await?;
        tracing::info!(
            "Invoking {} ({}) with {} byte payload",
            function.display_name,
            function.id,
            payload.len()
        );
        self.functions.invoke_function(&function, payload).await
    }
}

fn ensure_ready<R: Resource>(resource: &R) -> Result<()> {
    let state = resource.lifecycle_state();
    if state.is_ready() {
        Ok(())
    } else {
        Err(CloudError::NotReady {
            kind: R::KIND,
            name: resource.display_name().to_string(),
            state: state.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::SetupRequest;
    use crate::naming::ResourceNames;
    use crate::testing::FakeCloud;
    use crate::waiter::WaitConfig;

    const COMPARTMENT: &str = "ocid1.compartment.oc1..test";

    fn lifecycle<'a>(cloud: &'a FakeCloud, run: &str) -> FunctionLifecycle<'a> {
        FunctionLifecycle::new(cloud, cloud, cloud, ResourceNames::new(run))
            .with_wait_config(WaitConfig::immediate(5))
    }

    #[tokio::test]
    async fn test_invoke_after_setup_returns_response() {
        let cloud = FakeCloud::new();
        lifecycle(&cloud, "demo")
            .setup(&SetupRequest::new(COMPARTMENT, "phx.ocir.io/t/fn/hello:1"))
            .await
            .unwrap();

        let response = lifecycle(&cloud, "demo")
            .invoke(COMPARTMENT, "hello")
            .await
            .unwrap();
        assert!(response.contains("hello"));
        assert_eq!(cloud.calls().last().map(String::as_str), Some("invoke_function"));
    }

    #[tokio::test]
    async fn test_invoke_before_setup_fails_clearly() {
        let cloud = FakeCloud::new();
        let result = lifecycle(&cloud, "demo").invoke(COMPARTMENT, "hello").await;

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            CloudError::NotProvisioned {
                kind: ResourceKind::Application,
                ..
            }
        ));
        assert!(err.to_string().contains("demo-app"));
        assert!(err.to_string().contains("fnflow setup"));
        assert!(!cloud.calls().iter().any(|c| c == "invoke_function"));
    }

    #[tokio::test]
    async fn test_invoke_after_partial_setup_fails() {
        let cloud = FakeCloud::new().fail_on("create_function");
        let _ = lifecycle(&cloud, "demo")
            .setup(&SetupRequest::new(COMPARTMENT, "phx.ocir.io/t/fn/hello:1"))
            .await;

        let result = lifecycle(&cloud, "demo").invoke(COMPARTMENT, "hello").await;
        assert!(matches!(
            result,
            Err(CloudError::NotProvisioned {
                kind: ResourceKind::Function,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_invoke_ignores_other_runs() {
        let cloud = FakeCloud::new();
        lifecycle(&cloud, "demo")
            .setup(&SetupRequest::new(COMPARTMENT, "phx.ocir.io/t/fn/hello:1"))
            .await
            .unwrap();

        let result = lifecycle(&cloud, "another").invoke(COMPARTMENT, "hello").await;
        assert!(matches!(result, Err(CloudError::NotProvisioned { .. })));
    }
}
