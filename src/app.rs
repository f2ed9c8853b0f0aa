use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config;
use crate::controller::FilterEvent;
use crate::filter::Topic;
use crate::loader::{FetcherConfig, HttpFetcher, RecordLoader};
use crate::normalize::{NormalizeOptions, Normalizer};
use crate::page::Page;
use crate::parser::ParserBootstrap;
use crate::session::{LoadState, PageEvent, PageSession, SessionOptions};

/// Grace period on top of the HTTP timeout before giving up on a load.
const LOAD_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_file: Option<PathBuf>,
    /// Stands in for the post list's `data-csv-path` attribute.
    pub source: Option<String>,
    pub topic: Option<String>,
    /// Select `topic` through the overflow menu instead of a top-level button.
    pub via_overflow: bool,
    pub expand: bool,
    pub output: Option<PathBuf>,
}

pub fn run(opts: RunOptions) -> Result<()> {
    let cfg = config::load(config::LoadOptions {
        config_file: opts.config_file.clone(),
        env_prefix: None,
    })
    .context("load config")?;

    let fetcher = HttpFetcher::new(FetcherConfig {
        user_agent: cfg.source.user_agent.clone(),
        timeout: cfg.source.timeout,
        http_client: None,
    })
    .context("build fetcher")?;
    let loader = RecordLoader::new(
        Arc::new(fetcher),
        Arc::new(ParserBootstrap::builtin()),
        Normalizer::new(NormalizeOptions {
            excerpt_placeholder: cfg.display.excerpt_placeholder.clone(),
        }),
    );

    let mut page = Page::new(cfg.page.clone());
    if let Some(source) = opts.source.as_ref() {
        page = page.with_csv_path(source.clone());
    }

    let mut session = PageSession::new(page, loader, SessionOptions::from_config(&cfg));
    session.dispatch(PageEvent::Ready);
    let wait = cfg.source.timeout.saturating_add(LOAD_GRACE);
    if !session.wait_for_load(wait) {
        warn!(?wait, "no post table in time, rendering without posts");
        session.abandon_load();
    } else if session.load_state() == &LoadState::Failed {
        info!("rendering without posts");
    }

    if let Some(key) = opts.topic.as_deref() {
        let topic = Topic::from_key(key.trim());
        let event = if opts.via_overflow {
            session.dispatch(PageEvent::Filter(FilterEvent::ToggleOverflow));
            FilterEvent::SelectOverflowEntry(topic)
        } else {
            FilterEvent::SelectTopic(topic)
        };
        session.dispatch(PageEvent::Filter(event));
    }
    if opts.expand {
        session.dispatch(PageEvent::Expand);
    }

    let document = session.page().document();
    match opts.output.as_ref() {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("write {}", path.display()))?,
        None => io::stdout()
            .write_all(document.as_bytes())
            .context("write stdout")?,
    }
    Ok(())
}
