//! Scripted page and launcher doubles for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::ScraperError;
use crate::traits::{BrowserSession, ClickOptions, PageHandle, SessionLauncher, TextSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Goto(String),
    Fill(String, String),
    Click(String, ClickOptions),
}

#[derive(Clone)]
pub(crate) struct ScriptedPage {
    url: Arc<Mutex<String>>,
    texts: HashMap<String, String>,
    body: String,
    absent: HashSet<String>,
    delayed: HashMap<String, Instant>,
    failing_urls: HashSet<String>,
    failing_reads: bool,
    log: Arc<Mutex<Vec<Action>>>,
    goto_timeouts: Arc<Mutex<Vec<Duration>>>,
    snapshots: Arc<AtomicUsize>,
}

impl ScriptedPage {
    pub(crate) fn new() -> Self {
        Self {
            url: Arc::new(Mutex::new("about:blank".to_string())),
            texts: HashMap::new(),
            body: String::new(),
            absent: HashSet::new(),
            delayed: HashMap::new(),
            failing_urls: HashSet::new(),
            failing_reads: false,
            log: Arc::new(Mutex::new(Vec::new())),
            goto_timeouts: Arc::new(Mutex::new(Vec::new())),
            snapshots: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_url(self, url: &str) -> Self {
        *self.url.lock().unwrap() = url.to_string();
        self
    }

    pub(crate) fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub(crate) fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// `selector` never matches.
    pub(crate) fn without(mut self, selector: &str) -> Self {
        self.absent.insert(selector.to_string());
        self
    }

    /// `selector` only matches once `delay` of (virtual) time has passed.
    pub(crate) fn appearing_after(mut self, selector: &str, delay: Duration) -> Self {
        self.delayed
            .insert(selector.to_string(), Instant::now() + delay);
        self
    }

    pub(crate) fn failing_goto(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    /// Every text read errors, as if the page crashed.
    pub(crate) fn failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }

    pub(crate) fn actions(&self) -> Vec<Action> {
        self.log.lock().unwrap().clone()
    }

    /// The bound passed to every `goto`, in call order.
    pub(crate) fn goto_timeouts(&self) -> Vec<Duration> {
        self.goto_timeouts.lock().unwrap().clone()
    }

    pub(crate) fn snapshot_count(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }

    fn present(&self, selector: &str) -> bool {
        if self.absent.contains(selector) {
            return false;
        }
        match self.delayed.get(selector) {
            Some(at) => Instant::now() >= *at,
            None => true,
        }
    }

    fn record(&self, action: Action) {
        self.log.lock().unwrap().push(action);
    }
}

#[async_trait]
impl PageHandle for ScriptedPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        self.record(Action::Goto(url.to_string()));
        self.goto_timeouts.lock().unwrap().push(timeout);
        if self.failing_urls.contains(url) {
            return Err(ScraperError::Navigation(format!("{}: net::ERR_NAME_NOT_RESOLVED", url)));
        }
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, ScraperError> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), ScraperError> {
        if !self.present(selector) {
            return Err(ScraperError::ElementNotFound(selector.to_string()));
        }
        self.record(Action::Fill(selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&self, selector: &str, options: ClickOptions) -> Result<(), ScraperError> {
        if !self.present(selector) {
            return Err(ScraperError::ElementNotFound(selector.to_string()));
        }
        self.record(Action::Click(selector.to_string(), options));
        Ok(())
    }

    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError> {
        Ok(self.present(selector))
    }

    async fn text_snapshot(&self, selectors: &[&str]) -> Result<TextSnapshot, ScraperError> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        if self.failing_reads {
            return Err(ScraperError::JavaScript("Execution context was destroyed".into()));
        }
        Ok(TextSnapshot {
            candidates: selectors
                .iter()
                .map(|selector| self.texts.get(*selector).cloned())
                .collect(),
            body: self.body.clone(),
        })
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ScraperError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

/// Hands out sessions wrapping clones of one scripted page and counts their lifecycle.
#[derive(Clone)]
pub(crate) struct ScriptedLauncher {
    page: ScriptedPage,
    fail_launch: bool,
    pub(crate) launches: Arc<AtomicUsize>,
    pub(crate) closes: Arc<AtomicUsize>,
    pub(crate) live: Arc<AtomicUsize>,
}

impl ScriptedLauncher {
    pub(crate) fn new(page: ScriptedPage) -> Self {
        Self {
            page,
            fail_launch: false,
            launches: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub(crate) fn page(&self) -> &ScriptedPage {
        &self.page
    }

    pub(crate) fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct ScriptedSession {
    page: ScriptedPage,
    closes: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    fn page(&self) -> &dyn PageHandle {
        &self.page
    }

    async fn close(self: Box<Self>) -> Result<(), ScraperError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SessionLauncher for ScriptedLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScraperError> {
        if self.fail_launch {
            return Err(ScraperError::BrowserInit("Could not auto detect a chrome executable".into()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            page: self.page.clone(),
            closes: self.closes.clone(),
            live: self.live.clone(),
        }))
    }
}
