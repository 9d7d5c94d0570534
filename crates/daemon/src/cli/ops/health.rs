use clap::Args;

use object_store::ObjectStoreConfig;
use quire_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        // 1. Check config directory
        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:    {}", state.quire_dir.display()));
                lines.push("  config.toml:  OK".to_string());
                match &state.config.store {
                    ObjectStoreConfig::Local { path } => {
                        let status = if path.is_dir() { "OK" } else { "MISSING" };
                        lines.push(format!("  store:        local {} ({})", status, path.display()));
                    }
                    ObjectStoreConfig::S3 {
                        endpoint, bucket, ..
                    } => {
                        lines.push(format!("  store:        s3 {}/{}", endpoint, bucket));
                    }
                    ObjectStoreConfig::Memory => {
                        lines.push("  store:        memory".to_string());
                    }
                }
                lines.push(format!("  api_port:     {}", state.config.api_port));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check daemon liveness and readiness
        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Daemon ({}):", base));

        for probe in ["livez", "readyz"] {
            let url = format!("{}/_status/{}", base.as_str().trim_end_matches('/'), probe);
            let status = match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => "OK".to_string(),
                Ok(resp) => format!("UNHEALTHY ({})", resp.status()),
                Err(_) => "NOT REACHABLE".to_string(),
            };
            lines.push(format!("  {:<7} {}", format!("{}:", probe), status));
        }

        // 3. Check the token, if one was given
        if ctx.client.token().is_some() {
            lines.push(String::new());
            let line = match ctx
                .client
                .call(quire_daemon::http_server::api::v0::auth::VerifyRequest::default())
                .await
            {
                Ok(resp) => format!("Token: OK ({})", resp.user.id),
                Err(e) => format!("Token: REJECTED ({})", e),
            };
            lines.push(line);
        }

        Ok(lines.join("\n"))
    }
}
