use std::collections::HashMap;

use crate::filter::ALL_TOPICS_KEY;
use crate::model::Post;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCount {
    pub name: String,
    pub posts: usize,
}

/// Filter controls derived from the loaded posts: the most used topics get a
/// top-level button, the rest go into the overflow menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCatalog {
    primary: Vec<TopicCount>,
    overflow: Vec<TopicCount>,
}

impl TopicCatalog {
    /// Ordered by post count, ties broken by first appearance. A topic named
    /// like the `All` control is left out, since selecting it could not be
    /// told apart from clearing the filter.
    pub fn build<'a, I>(posts: I, primary_limit: usize) -> Self
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut order: Vec<TopicCount> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for post in posts {
            let mut seen: Vec<&str> = Vec::with_capacity(post.topics.len());
            for topic in &post.topics {
                if topic == ALL_TOPICS_KEY || seen.contains(&topic.as_str()) {
                    continue;
                }
                seen.push(topic);
                match index.get(topic) {
                    Some(&slot) => order[slot].posts += 1,
                    None => {
                        index.insert(topic.clone(), order.len());
                        order.push(TopicCount {
                            name: topic.clone(),
                            posts: 1,
                        });
                    }
                }
            }
        }

        order.sort_by(|a, b| b.posts.cmp(&a.posts));
        let overflow = order.split_off(primary_limit.min(order.len()));
        Self {
            primary: order,
            overflow,
        }
    }

    pub fn primary(&self) -> &[TopicCount] {
        &self.primary
    }

    pub fn overflow(&self) -> &[TopicCount] {
        &self.overflow
    }

    pub fn is_overflow(&self, name: &str) -> bool {
        self.overflow.iter().any(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.primary.iter().any(|entry| entry.name == name) || self.is_overflow(name)
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.overflow.is_empty()
    }
}
