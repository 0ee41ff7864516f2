//! Groups the messages of an import run by category.

use std::collections::HashMap;

use crate::{category::Category, extractor::ExtractedMessage};

/// The messages seen during one import run, grouped by category.
///
/// Every category has a (possibly empty) list, and messages within a list
/// keep the order they were imported in.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBuckets {
    buckets: HashMap<Category, Vec<ExtractedMessage>>,
}

impl CategoryBuckets {
    /// Create a set of empty buckets, one per category.
    pub fn new() -> Self {
        Self {
            buckets: Category::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }

    /// Append `message` to the bucket for `category`.
    pub fn push(&mut self, category: Category, message: ExtractedMessage) {
        self.buckets.entry(category).or_default().push(message);
    }

    /// The messages assigned to `category`, in import order.
    pub fn get(&self, category: Category) -> &[ExtractedMessage] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The number of messages in each category, in the order of [Category::ALL].
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.get(category).len()))
            .collect()
    }
}

impl Default for CategoryBuckets {
    fn default() -> Self {
        Self::new()
    }
}
