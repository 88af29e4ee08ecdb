use crate::types::Credentials;

use super::{LoginStep, SiteAdapter};

const LOGIN_URL: &str = "https://www.linkedin.com/login";

/// Long enough for an operator watching the browser to complete a
/// two-factor challenge by hand. LinkedIn logins are not unattended.
pub const MANUAL_TWO_FACTOR_WAIT_MS: u64 = 15_000;

pub struct Linkedin;

impl SiteAdapter for Linkedin {
    fn name(&self) -> &'static str {
        "LinkedIn"
    }

    fn selectors(&self) -> &'static [&'static str] {
        &[".feed-shared-update-v2__description", ".break-words"]
    }

    fn procedure(&self, credentials: &Credentials) -> Vec<LoginStep> {
        vec![
            LoginStep::navigate(LOGIN_URL),
            LoginStep::wait_ms(2_000),
            LoginStep::fill("input[name=\"session_key\"]", &credentials.username),
            LoginStep::fill("input[name=\"session_password\"]", &credentials.password),
            LoginStep::click("button[type=\"submit\"]"),
            LoginStep::wait_ms(MANUAL_TWO_FACTOR_WAIT_MS),
        ]
    }
}
