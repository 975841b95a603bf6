//! Replayed page source
//!
//! Serves a fixed sequence of pages instead of calling the API. Used by
//! tests to drive the sync loop deterministically and to count requests.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::collections::VecDeque;

use super::PageSource;
use crate::woo::api::RawOrder;

/// A [`PageSource`] that returns canned pages in order
pub struct ScriptedPages {
    pages: RefCell<VecDeque<Result<Vec<RawOrder>>>>,
    requested: RefCell<Vec<String>>,
}

impl ScriptedPages {
    /// Serve these pages, one per request
    pub fn new(pages: Vec<Vec<RawOrder>>) -> Self {
        Self::with_results(pages.into_iter().map(Ok).collect())
    }

    /// Serve these results (pages or errors), one per request
    pub fn with_results(results: Vec<Result<Vec<RawOrder>>>) -> Self {
        Self {
            pages: RefCell::new(results.into()),
            requested: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far, in order
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl PageSource for ScriptedPages {
    fn fetch_page(&self, _stream_id: &str, url: &str) -> Result<Vec<RawOrder>> {
        self.requested.borrow_mut().push(url.to_string());
        self.pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("No scripted page left for {}", url)))
    }
}
