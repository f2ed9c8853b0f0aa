use std::slice;

/// One row of the source table. Column order follows the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (column, value) in pairs {
            record.insert(column, value);
        }
        record
    }

    /// Column names are stored trimmed and lowercased; a repeated column
    /// replaces the earlier value.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, column: K, value: V) {
        let column = normalize_column(&column.into());
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let column = normalize_column(column);
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn normalize_column(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// A post as displayed on the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub url: String,
    pub topics: Vec<String>,
    pub excerpt: String,
}

impl Post {
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|candidate| candidate == topic)
    }

    /// Rebuilds the raw row this post would have been read from.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord::from_pairs([
            ("title", self.title.clone()),
            ("path", self.url.clone()),
            ("topics", self.topics.join("|")),
            ("excerpt", self.excerpt.clone()),
        ])
    }
}

/// Every post loaded for the current page view, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn as_slice(&self) -> &[Post] {
        &self.posts
    }

    pub fn iter(&self) -> slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl FromIterator<Post> for PostCollection {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PostCollection {
    type Item = &'a Post;
    type IntoIter = slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}
