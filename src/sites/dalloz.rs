use crate::types::Credentials;

use super::{LoginStep, SiteAdapter};

const LOGIN_URL: &str = "https://connexion.dalloz.fr/login";
const SUBMIT: &str = "#soumettre";

/// Dalloz: username and password are posted one after the other through the
/// same submit button.
pub struct Dalloz;

impl SiteAdapter for Dalloz {
    fn name(&self) -> &'static str {
        "Dalloz"
    }

    fn selectors(&self) -> &'static [&'static str] {
        &["#content", ".flash-content", "article"]
    }

    fn procedure(&self, credentials: &Credentials) -> Vec<LoginStep> {
        vec![
            LoginStep::navigate(LOGIN_URL),
            LoginStep::wait_ms(2_000),
            LoginStep::fill("#username", &credentials.username),
            LoginStep::click(SUBMIT),
            LoginStep::wait_ms(3_000),
            LoginStep::fill("#password", &credentials.password),
            LoginStep::click(SUBMIT),
            LoginStep::wait_ms(5_000),
        ]
    }
}
