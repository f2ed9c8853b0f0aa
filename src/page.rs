use tracing::debug;

use crate::config::PageConfig;
use crate::markup::Element;

/// Render target. Each write replaces what was there before.
pub trait Container {
    fn replace_content(&mut self, html: String);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlBuffer {
    html: String,
    writes: usize,
}

impl HtmlBuffer {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Container for HtmlBuffer {
    fn replace_content(&mut self, html: String) {
        self.html = html;
        self.writes += 1;
    }
}

/// Headless stand-in for the page's DOM: the post list, the filter root and
/// the post list's `data-csv-path` attribute. Either container may be
/// missing.
#[derive(Debug, Clone)]
pub struct Page {
    ids: PageConfig,
    post_list: Option<HtmlBuffer>,
    filter_root: Option<HtmlBuffer>,
    csv_path: Option<String>,
}

impl Page {
    pub fn new(ids: PageConfig) -> Self {
        Self {
            ids,
            post_list: Some(HtmlBuffer::default()),
            filter_root: Some(HtmlBuffer::default()),
            csv_path: None,
        }
    }

    pub fn without_post_list(mut self) -> Self {
        self.post_list = None;
        self
    }

    pub fn without_filter_root(mut self) -> Self {
        self.filter_root = None;
        self
    }

    pub fn with_csv_path<S: Into<String>>(mut self, path: S) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    pub fn ids(&self) -> &PageConfig {
        &self.ids
    }

    /// The post list's `data-csv-path`, or `fallback` when it has none. The
    /// attribute is only read from a post list that exists.
    pub fn source_path<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.post_list
            .as_ref()
            .and(self.csv_path.as_deref())
            .filter(|path| !path.trim().is_empty())
            .unwrap_or(fallback)
    }

    pub fn post_list_mut(&mut self) -> Option<&mut dyn Container> {
        if self.post_list.is_none() {
            debug!(id = %self.ids.post_list_id, "post list container missing");
        }
        self.post_list.as_mut().map(|buffer| buffer as &mut dyn Container)
    }

    pub fn filter_root_mut(&mut self) -> Option<&mut dyn Container> {
        if self.filter_root.is_none() {
            debug!(id = %self.ids.filter_root_id, "filter root missing");
        }
        self.filter_root.as_mut().map(|buffer| buffer as &mut dyn Container)
    }

    pub fn post_list(&self) -> Option<&HtmlBuffer> {
        self.post_list.as_ref()
    }

    pub fn filter_root(&self) -> Option<&HtmlBuffer> {
        self.filter_root.as_ref()
    }

    /// Both containers with their current content, for writing out.
    pub fn document(&self) -> String {
        let mut out = String::new();
        if let Some(filters) = &self.filter_root {
            let root = Element::new("div")
                .attr("id", self.ids.filter_root_id.clone())
                .raw(filters.html());
            out.push_str(&root.render());
            out.push('\n');
        }
        if let Some(posts) = &self.post_list {
            let mut list = Element::new("div")
                .class("row")
                .attr("id", self.ids.post_list_id.clone());
            if let Some(path) = &self.csv_path {
                list = list.attr("data-csv-path", path.clone());
            }
            out.push_str(&list.raw(posts.html()).render());
            out.push('\n');
        }
        out
    }
}
