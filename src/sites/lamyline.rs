use crate::types::Credentials;

use super::{LoginStep, SiteAdapter};

/// Lamyline: both fields sit on whatever page the session is on. The login
/// button can be covered by an overlay, so it is clicked from script.
pub struct Lamyline;

impl SiteAdapter for Lamyline {
    fn name(&self) -> &'static str {
        "Lamyline"
    }

    fn selectors(&self) -> &'static [&'static str] {
        &["#cDocument", "#dTxT", "div.mainContent"]
    }

    fn procedure(&self, credentials: &Credentials) -> Vec<LoginStep> {
        vec![
            LoginStep::fill("#username", &credentials.username),
            LoginStep::fill("#password", &credentials.password),
            LoginStep::force_click("#btnlogin"),
            LoginStep::wait_ms(5_000),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Action, ScriptedPage};
    use crate::traits::ClickOptions;

    #[tokio::test(start_paused = true)]
    async fn test_single_step_forced_submit() {
        let page = ScriptedPage::new();

        Lamyline
            .login(&page, &Credentials::new("juriste", "pw"))
            .await
            .unwrap();

        assert_eq!(
            page.actions(),
            vec![
                Action::Fill("#username".into(), "juriste".into()),
                Action::Fill("#password".into(), "pw".into()),
                Action::Click("#btnlogin".into(), ClickOptions::forced()),
            ]
        );
    }
}
