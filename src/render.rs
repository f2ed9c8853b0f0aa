use crate::config::PageConfig;
use crate::controller::Highlight;
use crate::filter::Topic;
use crate::markup::{render_all, Element};
use crate::model::Post;
use crate::page::Container;
use crate::topics::TopicCatalog;
use crate::window::Window;

pub const EMPTY_MESSAGE: &str = "No posts found for this topic.";
/// Value of `data-action` on the expand card.
pub const EXPAND_ACTION: &str = "expand";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Topic chips shown per card before collapsing into "+N".
    pub chip_limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { chip_limit: 3 }
    }
}

/// Builds card and filter markup. Holds no page state.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn render_posts(&self, container: &mut dyn Container, window: &Window<&Post>) {
        container.replace_content(self.posts_markup(window));
    }

    pub fn posts_markup(&self, window: &Window<&Post>) -> String {
        if window.is_empty() {
            return empty_placeholder().render();
        }
        let mut cards: Vec<Element> = window.visible.iter().map(|post| self.card(post)).collect();
        if window.truncated {
            cards.push(expand_card(window.total_count));
        }
        render_all(&cards)
    }

    fn card(&self, post: &Post) -> Element {
        let mut body = Element::new("div")
            .class("card-body")
            .child(Element::new("h5").class("card-title").text(post.title.clone()))
            .child(Element::new("p").class("card-text").text(post.excerpt.clone()));

        if !post.topics.is_empty() {
            body = body.child(self.chips(&post.topics));
        }

        let mut link = Element::new("a")
            .class("stretched-link")
            .attr("href", post.url.clone());
        if !post.title.is_empty() {
            link = link.attr("aria-label", post.title.clone());
        }

        Element::new("div")
            .class("card col-md-6 col-lg-4 mb-3")
            .child(body.child(link))
    }

    fn chips(&self, topics: &[String]) -> Element {
        let shown = topics.len().min(self.options.chip_limit);
        let mut line = Element::new("small").class("text-muted").text("Topics: ");
        for topic in &topics[..shown] {
            line = line.child(
                Element::new("span")
                    .class("topic-chip")
                    .text(topic.clone()),
            );
        }
        let hidden = topics.len() - shown;
        if hidden > 0 {
            line = line.child(
                Element::new("span")
                    .class("topic-chip topic-chip-more")
                    .text(format!("+{hidden}")),
            );
        }
        Element::new("p").class("card-text").child(line)
    }

    /// Top-level buttons, then the overflow toggle and its menu when the
    /// catalog has overflow entries.
    pub fn render_filters(
        &self,
        container: &mut dyn Container,
        ids: &PageConfig,
        catalog: &TopicCatalog,
        highlight: &Highlight,
        overflow_open: bool,
    ) {
        container.replace_content(self.filters_markup(ids, catalog, highlight, overflow_open));
    }

    pub fn filters_markup(
        &self,
        ids: &PageConfig,
        catalog: &TopicCatalog,
        highlight: &Highlight,
        overflow_open: bool,
    ) -> String {
        let mut controls = vec![filter_button(&Topic::All, "All", highlight)];
        controls.extend(catalog.primary().iter().map(|entry| {
            filter_button(&Topic::from_key(&entry.name), &entry.name, highlight)
        }));

        if !catalog.overflow().is_empty() {
            let toggle = Element::new("button")
                .class("btn filter-btn dropdown-toggle")
                .class_if(highlight.overflow_button, "active")
                .attr("type", "button")
                .attr("id", ids.overflow_toggle_id.clone())
                .attr("aria-haspopup", "true")
                .attr("aria-expanded", overflow_open.to_string())
                .text("More topics");
            let entries = catalog.overflow().iter().map(|entry| {
                let topic = Topic::from_key(&entry.name);
                Element::new("a")
                    .class("dropdown-item")
                    .class_if(highlight.is_overflow_entry(&topic), "active")
                    .attr("href", "#")
                    .attr("data-topic", entry.name.clone())
                    .text(entry.name.clone())
            });
            let menu = Element::new("div")
                .class("dropdown-menu")
                .class_if(overflow_open, "show")
                .attr("id", ids.overflow_menu_id.clone())
                .children(entries);
            controls.push(
                Element::new("div")
                    .class("dropdown d-inline-block")
                    .child(toggle)
                    .child(menu),
            );
        }
        render_all(&controls)
    }
}

fn filter_button(topic: &Topic, label: &str, highlight: &Highlight) -> Element {
    Element::new("button")
        .class("btn filter-btn")
        .class_if(highlight.is_top_level(topic), "active")
        .attr("type", "button")
        .attr("data-topic", topic.key())
        .text(label)
}

fn empty_placeholder() -> Element {
    Element::new("div")
        .class("col-12")
        .child(Element::new("p").child(Element::new("em").text(EMPTY_MESSAGE)))
}

fn expand_card(total: usize) -> Element {
    Element::new("div")
        .class("card col-md-6 col-lg-4 mb-3 view-all-card")
        .attr("role", "button")
        .attr("tabindex", "0")
        .attr("data-action", EXPAND_ACTION)
        .child(
            Element::new("div")
                .class("card-body")
                .child(Element::new("h5").class("card-title").text("View All Posts"))
                .child(
                    Element::new("p")
                        .class("card-text")
                        .text(format!("Click here to see all {total} blog posts")),
                ),
        )
}
