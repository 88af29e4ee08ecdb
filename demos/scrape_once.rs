use supernovia_scraper::{
    ChromiumLauncher, Credentials, ScrapeRequest, ScraperConfig, SessionDriver, SiteIdentifier,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let url = std::env::var("SCRAPE_URL").expect("SCRAPE_URL environment variable not set");
    let mut request = ScrapeRequest::new(url).expect("SCRAPE_URL is blank");

    if let Ok(database) = std::env::var("SCRAPE_DATABASE") {
        if let Some(site) = SiteIdentifier::from_name(&database) {
            request = request.with_site(site);
        }
    }
    if let (Ok(username), Ok(password)) = (
        std::env::var("SCRAPE_USERNAME"),
        std::env::var("SCRAPE_PASSWORD"),
    ) {
        request = request.with_credentials(Credentials::new(username, password));
    }

    // Visible browser: LinkedIn two-factor prompts need a human.
    let config = ScraperConfig::from_env().with_headless(false).with_debug(true);
    let driver = SessionDriver::new(ChromiumLauncher::new(config.clone()), &config);

    println!("=== Scrape {} ({}) ===", request.url, request.site_label());

    match driver.scrape(&request).await {
        Ok(result) => {
            println!("Extracted at {}", result.extracted_at_iso());
            println!("{}", result.content);
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
        }
    }
}
