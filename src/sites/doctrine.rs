use async_trait::async_trait;
use tracing::info;

use crate::error::ScraperError;
use crate::traits::PageHandle;
use crate::types::Credentials;

use super::{run_procedure, LoginStep, SiteAdapter};

const SUBMIT: &str = "button[type=\"submit\"]";

/// Doctrine only asks for credentials after redirecting to its auth pages.
/// Anywhere else the session counts as already authenticated.
pub struct Doctrine;

impl Doctrine {
    fn on_auth_page(url: &str) -> bool {
        url.contains("/login") || url.contains("/auth")
    }
}

#[async_trait]
impl SiteAdapter for Doctrine {
    fn name(&self) -> &'static str {
        "Doctrine"
    }

    fn selectors(&self) -> &'static [&'static str] {
        &["article", "[data-test-id=\"document-content\"]"]
    }

    fn procedure(&self, credentials: &Credentials) -> Vec<LoginStep> {
        vec![
            LoginStep::fill(
                "input[name=\"username\"], input[type=\"email\"]",
                &credentials.username,
            ),
            LoginStep::click(SUBMIT),
            LoginStep::wait_ms(3_000),
            LoginStep::fill("input[name=\"password\"]", &credentials.password),
            LoginStep::click(SUBMIT),
            LoginStep::wait_ms(5_000),
        ]
    }

    async fn login(
        &self,
        page: &dyn PageHandle,
        credentials: &Credentials,
    ) -> Result<(), ScraperError> {
        let url = page
            .current_url()
            .await
            .map_err(|e| ScraperError::Login(format!("{}: {}", self.name(), e)))?;

        if !Self::on_auth_page(&url) {
            info!("[{}] Not on an auth page ({}), skipping login", self.name(), url);
            return Ok(());
        }

        run_procedure(self.name(), page, &self.procedure(credentials)).await
    }
}
