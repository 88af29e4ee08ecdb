//! Authenticated document scraper
//!
//! - Logs into LexisNexis, Dalloz, Doctrine, Lamyline or LinkedIn with a scripted
//!   procedure when credentials are supplied
//! - Navigates to the target document and extracts its main text
//! - One fresh Chromium per request, always closed before the request completes
//!
//! # Usage
//!
//! ```rust,ignore
//! use supernovia_scraper::{Credentials, ScrapeRequest, ScraperConfig, ScraperService, SiteIdentifier};
//! use tower::ServiceExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScraperConfig::from_env();
//!     let service = ScraperService::new(&config);
//!
//!     let request = ScrapeRequest::new("https://www.dalloz.fr/documentation/Document?id=...")
//!         .unwrap()
//!         .with_site(SiteIdentifier::Dalloz)
//!         .with_credentials(Credentials::new("user", "password"));
//!
//!     let result = service.oneshot(request).await.unwrap();
//!     println!("{} ({})", result.content, result.extracted_at_iso());
//! }
//! ```

pub mod browser;
pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod server;
pub mod service;
pub mod settle;
pub mod sites;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::ChromiumLauncher;
pub use config::{ScraperConfig, SERVICE_NAME};
pub use driver::SessionDriver;
pub use error::ScraperError;
pub use service::ScraperService;
pub use settle::Settle;
pub use sites::{adapter_for, SiteAdapter, SiteIdentifier};
pub use traits::{BrowserSession, ClickOptions, PageHandle, SessionLauncher, TextSnapshot};
pub use types::{Credentials, ExtractionResult, ScrapeRequest};
