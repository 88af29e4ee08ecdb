use crate::types::Credentials;

use super::{LoginStep, SiteAdapter};

const LOGIN_URL: &str = "https://www.lexis360intelligence.fr/login";
const PASSWORD_FIELD_TIMEOUT_MS: u64 = 10_000;
/// OAuth redirect chain back to the application.
const OAUTH_REDIRECT_WAIT_MS: u64 = 10_000;

/// LexisNexis 360: identifier first, then a separate password screen.
pub struct LexisNexis;

impl SiteAdapter for LexisNexis {
    fn name(&self) -> &'static str {
        "Lexis"
    }

    fn selectors(&self) -> &'static [&'static str] {
        &["article", "main", ".document-content"]
    }

    fn procedure(&self, credentials: &Credentials) -> Vec<LoginStep> {
        vec![
            LoginStep::navigate(LOGIN_URL),
            LoginStep::wait_ms(2_000),
            LoginStep::fill("#userid", &credentials.username),
            LoginStep::click("#signInSbmtBtn"),
            // The only step allowed to fail on its own timer.
            LoginStep::wait_for("#password", PASSWORD_FIELD_TIMEOUT_MS),
            LoginStep::fill("#password", &credentials.password),
            LoginStep::click("button[type=\"submit\"]"),
            LoginStep::wait_ms(OAUTH_REDIRECT_WAIT_MS),
        ]
    }
}
