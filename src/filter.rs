use std::fmt;

use crate::model::Post;

/// Topic key carried by the "show everything" control.
pub const ALL_TOPICS_KEY: &str = "All";

/// A filter selection: the sentinel `All` or one exact topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Topic {
    #[default]
    All,
    Named(String),
}

impl Topic {
    /// Maps a control's `data-topic` value to a selection.
    pub fn from_key(key: &str) -> Self {
        if key == ALL_TOPICS_KEY {
            Topic::All
        } else {
            Topic::Named(key.to_string())
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Topic::All => ALL_TOPICS_KEY,
            Topic::Named(name) => name,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Topic::All)
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Topic::All => true,
            Topic::Named(name) => post.has_topic(name),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Posts matching `topic`, in collection order.
pub fn filter<'a>(posts: &'a [Post], topic: &Topic) -> Vec<&'a Post> {
    posts.iter().filter(|post| topic.matches(post)).collect()
}
