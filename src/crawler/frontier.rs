//! Breadth-first frontier with a visited set
//!
//! A URL is marked visited when it is enqueued, not when it is fetched, so
//! a page discovered from several places is queued exactly once per run.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO queue of URLs to fetch plus every URL ever enqueued
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<Url>,

    /// Every URL ever enqueued; only grows
    visited: HashSet<String>,

    /// Enqueue order, kept for inspection in tests and reporting
    history: Vec<String>,
}

impl Frontier {
    /// Creates a frontier seeded with one URL
    pub fn with_seed(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Enqueues the URL unless it was enqueued before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now queued
    /// * `false` - The URL was already visited; nothing changed
    pub fn push(&mut self, url: Url) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }
        self.history.push(url.as_str().to_string());
        self.queue.push_back(url);
        true
    }

    /// Takes the oldest queued URL
    pub fn pop(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    /// Returns true if the URL was ever enqueued
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns the number of URLs waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Every URL in the order it was enqueued
    pub fn history(&self) -> &[String] {
        &self.history
    }
}
