use tracing::debug;

use crate::filter::Topic;

/// Which group of filter controls made the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlGroup {
    #[default]
    TopLevel,
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// A top-level topic button was activated.
    SelectTopic(Topic),
    /// An entry inside the overflow menu was activated.
    SelectOverflowEntry(Topic),
    ToggleOverflow,
    /// Pointer press anywhere outside the filter controls.
    PointerOutside,
    KeyDown(Key),
}

/// What a transition changed. The session turns these into render passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    TopicSelected(Topic),
    OverflowChanged(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub topic: Topic,
    pub group: ControlGroup,
    pub overflow_open: bool,
}

/// Controls to mark as "active".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub top_level: Option<Topic>,
    pub overflow_button: bool,
    pub overflow_entry: Option<Topic>,
}

impl Highlight {
    pub fn is_top_level(&self, topic: &Topic) -> bool {
        self.top_level.as_ref() == Some(topic)
    }

    pub fn is_overflow_entry(&self, topic: &Topic) -> bool {
        self.overflow_entry.as_ref() == Some(topic)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterController {
    state: FilterState,
}

impl FilterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn topic(&self) -> &Topic {
        &self.state.topic
    }

    pub fn is_overflow_open(&self) -> bool {
        self.state.overflow_open
    }

    pub fn highlight(&self) -> Highlight {
        match self.state.group {
            ControlGroup::TopLevel => Highlight {
                top_level: Some(self.state.topic.clone()),
                overflow_button: false,
                overflow_entry: None,
            },
            ControlGroup::Overflow => Highlight {
                top_level: None,
                overflow_button: true,
                overflow_entry: Some(self.state.topic.clone()),
            },
        }
    }

    pub fn handle(&mut self, event: FilterEvent) -> Vec<Signal> {
        debug!(?event, "filter event");
        match event {
            FilterEvent::SelectTopic(topic) => self.select(topic, ControlGroup::TopLevel),
            FilterEvent::SelectOverflowEntry(topic) => self.select(topic, ControlGroup::Overflow),
            FilterEvent::ToggleOverflow => {
                self.state.overflow_open = !self.state.overflow_open;
                vec![Signal::OverflowChanged(self.state.overflow_open)]
            }
            FilterEvent::PointerOutside | FilterEvent::KeyDown(Key::Escape) => self.close_overflow(),
            FilterEvent::KeyDown(Key::Other) => Vec::new(),
        }
    }

    /// Moves the selection back to the `All` control without going through
    /// a user event.
    pub fn reset_to_all(&mut self) -> Vec<Signal> {
        self.select(Topic::All, ControlGroup::TopLevel)
    }

    fn select(&mut self, topic: Topic, group: ControlGroup) -> Vec<Signal> {
        let mut signals = self.close_overflow();
        self.state.topic = topic.clone();
        self.state.group = group;
        signals.push(Signal::TopicSelected(topic));
        signals
    }

    fn close_overflow(&mut self) -> Vec<Signal> {
        if !self.state.overflow_open {
            return Vec::new();
        }
        self.state.overflow_open = false;
        vec![Signal::OverflowChanged(false)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(key: &str) -> Topic {
        Topic::from_key(key)
    }

    #[test]
    fn starts_on_all_with_menu_closed() {
        let controller = FilterController::new();
        assert_eq!(controller.topic(), &Topic::All);
        assert!(!controller.is_overflow_open());
        assert!(controller.highlight().is_top_level(&Topic::All));
    }

    #[test]
    fn top_level_selection_closes_menu_and_highlights_button() {
        let mut controller = FilterController::new();
        controller.handle(FilterEvent::ToggleOverflow);
        let signals = controller.handle(FilterEvent::SelectTopic(named("ml")));
        assert_eq!(
            signals,
            vec![
                Signal::OverflowChanged(false),
                Signal::TopicSelected(named("ml"))
            ]
        );
        let highlight = controller.highlight();
        assert!(highlight.is_top_level(&named("ml")));
        assert!(!highlight.overflow_button);
        assert_eq!(highlight.overflow_entry, None);
    }

    #[test]
    fn overflow_entry_marks_button_and_entry() {
        let mut controller = FilterController::new();
        controller.handle(FilterEvent::ToggleOverflow);
        controller.handle(FilterEvent::SelectOverflowEntry(named("robotics")));
        assert_eq!(controller.topic(), &named("robotics"));
        assert!(!controller.is_overflow_open());
        let highlight = controller.highlight();
        assert!(highlight.overflow_button);
        assert!(highlight.is_overflow_entry(&named("robotics")));
        assert_eq!(highlight.top_level, None);
    }

    #[test]
    fn toggle_flips_menu() {
        let mut controller = FilterController::new();
        assert_eq!(
            controller.handle(FilterEvent::ToggleOverflow),
            vec![Signal::OverflowChanged(true)]
        );
        assert_eq!(
            controller.handle(FilterEvent::ToggleOverflow),
            vec![Signal::OverflowChanged(false)]
        );
    }

    #[test]
    fn outside_click_and_escape_dismiss_without_changing_topic() {
        for dismiss in [FilterEvent::PointerOutside, FilterEvent::KeyDown(Key::Escape)] {
            let mut controller = FilterController::new();
            controller.handle(FilterEvent::SelectTopic(named("cv")));
            controller.handle(FilterEvent::ToggleOverflow);
            let signals = controller.handle(dismiss);
            assert_eq!(signals, vec![Signal::OverflowChanged(false)]);
            assert!(!controller.is_overflow_open());
            assert_eq!(controller.topic(), &named("cv"));
        }
    }

    #[test]
    fn dismissal_is_guarded_by_open_menu() {
        let mut controller = FilterController::new();
        assert!(controller.handle(FilterEvent::PointerOutside).is_empty());
        assert!(controller.handle(FilterEvent::KeyDown(Key::Escape)).is_empty());
        controller.handle(FilterEvent::ToggleOverflow);
        assert!(controller.handle(FilterEvent::KeyDown(Key::Other)).is_empty());
        assert!(controller.is_overflow_open());
    }

    #[test]
    fn reselecting_same_topic_still_signals() {
        let mut controller = FilterController::new();
        assert_eq!(
            controller.handle(FilterEvent::SelectTopic(Topic::All)),
            vec![Signal::TopicSelected(Topic::All)]
        );
    }

    #[test]
    fn reset_returns_to_all_control() {
        let mut controller = FilterController::new();
        controller.handle(FilterEvent::SelectOverflowEntry(named("rust")));
        controller.reset_to_all();
        assert_eq!(controller.state(), &FilterState::default());
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }
}
