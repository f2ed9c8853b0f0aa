use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::controller::{FilterController, FilterEvent, Key, Signal};
use crate::filter::filter;
use crate::loader::{LoadResponse, RecordLoader, SourceLocation};
use crate::model::PostCollection;
use crate::page::Page;
use crate::render::{RenderOptions, Renderer};
use crate::topics::TopicCatalog;
use crate::window::{window, DEFAULT_CAP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub cap: usize,
    pub chip_limit: usize,
    pub primary_topics: usize,
    pub expand_resets_filter: bool,
    pub default_source: String,
    pub site_root: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            cap: cfg.display.cap,
            chip_limit: cfg.display.chip_limit,
            primary_topics: cfg.display.primary_topics,
            expand_resets_filter: cfg.display.expand_resets_filter,
            default_source: cfg.source.default_path.clone(),
            site_root: cfg.source.site_root.clone(),
        }
    }
}

/// Page lifecycle and input events, as delivered by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Ready,
    Filter(FilterEvent),
    /// Pointer press; `inside_filters` is true when it landed in the filter root.
    Pointer { inside_filters: bool },
    Key(Key),
    /// The expand card was activated.
    Expand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Pending { request_id: u64, location: SourceLocation },
    Loaded,
    Failed,
}

/// State for one page view: the loaded posts, the filter controller and the
/// expand flag. Every render goes through this type.
pub struct PageSession {
    page: Page,
    loader: RecordLoader,
    options: SessionOptions,
    renderer: Renderer,
    controller: FilterController,
    posts: PostCollection,
    catalog: TopicCatalog,
    expanded: bool,
    load_state: LoadState,
    next_request_id: u64,
    response_tx: Sender<LoadResponse>,
    response_rx: Receiver<LoadResponse>,
}

impl PageSession {
    pub fn new(page: Page, loader: RecordLoader, options: SessionOptions) -> Self {
        let (response_tx, response_rx) = unbounded();
        let mut options = options;
        if options.cap == 0 {
            options.cap = DEFAULT_CAP;
        }
        let renderer = Renderer::new(RenderOptions {
            chip_limit: options.chip_limit,
        });
        Self {
            page,
            loader,
            options,
            renderer,
            controller: FilterController::new(),
            posts: PostCollection::default(),
            catalog: TopicCatalog::default(),
            expanded: false,
            load_state: LoadState::Idle,
            next_request_id: 1,
            response_tx,
            response_rx,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn posts(&self) -> &PostCollection {
        &self.posts
    }

    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Pending { .. })
    }

    pub fn dispatch(&mut self, event: PageEvent) {
        match event {
            PageEvent::Ready => {
                self.begin_load();
            }
            PageEvent::Filter(event) => {
                let signals = self.controller.handle(event);
                self.apply_signals(signals);
            }
            PageEvent::Pointer { inside_filters } => {
                if !inside_filters {
                    let signals = self.controller.handle(FilterEvent::PointerOutside);
                    self.apply_signals(signals);
                }
            }
            PageEvent::Key(key) => {
                let signals = self.controller.handle(FilterEvent::KeyDown(key));
                self.apply_signals(signals);
            }
            PageEvent::Expand => self.expand(),
        }
    }

    /// Starts the one load this page view gets. Returns false when a load
    /// was already started.
    pub fn begin_load(&mut self) -> bool {
        if self.load_state != LoadState::Idle {
            debug!(state = ?self.load_state, "load already started");
            return false;
        }
        let raw = self.page.source_path(&self.options.default_source);
        let location = SourceLocation::resolve(raw, &self.options.site_root);
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        info!(%location, "loading posts");

        self.load_state = LoadState::Pending {
            request_id,
            location: location.clone(),
        };
        self.loader
            .spawn(request_id, location, self.response_tx.clone());
        true
    }

    /// Applies any finished loads. Returns true if something changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.response_rx.try_recv() {
            changed |= self.handle_load_response(response);
        }
        changed
    }

    /// Blocks until the pending load finishes or `timeout` passes. Returns
    /// true once nothing is pending.
    pub fn wait_for_load(&mut self, timeout: Duration) -> bool {
        // No deadline when `timeout` is too large to add to the clock.
        let deadline = Instant::now().checked_add(timeout);
        while self.is_loading() {
            let received = match deadline {
                Some(deadline) => self.response_rx.recv_deadline(deadline),
                None => self
                    .response_rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(response) => {
                    self.handle_load_response(response);
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(?timeout, "post load still pending");
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    /// Gives up on a pending load and renders the empty state. A response
    /// arriving afterwards is ignored. Returns false when nothing was pending.
    pub fn abandon_load(&mut self) -> bool {
        let LoadState::Pending { location, .. } = &self.load_state else {
            return false;
        };
        warn!(%location, "abandoning post load");
        self.load_state = LoadState::Failed;
        self.expanded = false;
        self.render_filters();
        self.render_posts();
        true
    }

    fn handle_load_response(&mut self, response: LoadResponse) -> bool {
        let LoadState::Pending { request_id, .. } = &self.load_state else {
            return false;
        };
        if *request_id != response.request_id {
            return false;
        }

        match response.result {
            Ok(posts) => {
                info!(location = %response.location, posts = posts.len(), "loaded posts");
                self.catalog = TopicCatalog::build(&posts, self.options.primary_topics);
                self.posts = posts;
                self.load_state = LoadState::Loaded;
            }
            Err(err) => {
                warn!(location = %response.location, error = %err, "failed to load posts");
                self.load_state = LoadState::Failed;
            }
        }

        self.expanded = false;
        self.render_filters();
        self.render_posts();
        true
    }

    fn expand(&mut self) {
        if self.options.expand_resets_filter {
            self.controller.reset_to_all();
        }
        self.expanded = true;
        self.render_filters();
        self.render_posts();
    }

    fn apply_signals(&mut self, signals: Vec<Signal>) {
        if signals.is_empty() {
            return;
        }
        let mut topic_changed = false;
        for signal in signals {
            match signal {
                Signal::TopicSelected(topic) => {
                    debug!(%topic, "topic selected");
                    topic_changed = true;
                }
                Signal::OverflowChanged(open) => debug!(open, "overflow menu"),
            }
        }
        self.render_filters();
        if topic_changed {
            self.expanded = false;
            self.render_posts();
        }
    }

    fn render_posts(&mut self) {
        let matches = filter(self.posts.as_slice(), self.controller.topic());
        let shown = window(matches, self.options.cap, self.expanded);
        if let Some(container) = self.page.post_list_mut() {
            self.renderer.render_posts(container, &shown);
        }
    }

    fn render_filters(&mut self) {
        let highlight = self.controller.highlight();
        let overflow_open = self.controller.is_overflow_open();
        let ids = self.page.ids().clone();
        if let Some(container) = self.page.filter_root_mut() {
            self.renderer
                .render_filters(container, &ids, &self.catalog, &highlight, overflow_open);
        }
    }
}
