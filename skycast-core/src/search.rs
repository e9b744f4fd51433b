//! Debounced autocomplete over a [`Geocoder`].
//!
//! Explicit generation-counter state machine: every keystroke bumps the
//! generation, and a lookup task may only touch the state while its own
//! generation is still the latest. A superseded task therefore either never
//! issues its request (superseded during the debounce window) or silently
//! drops its reply (superseded while in flight). Cancellation is not an
//! error and never reaches the user.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::warn;

use crate::model::{GeoResult, Location};
use crate::provider::Geocoder;

/// Queries shorter than this (after trimming) never hit the network.
pub const MIN_QUERY_CHARS: usize = 2;

/// Keys the suggestion list reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// Read-only view of the search state for rendering.
#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub candidates: Vec<GeoResult>,
    pub open: bool,
    pub highlight: Option<usize>,
    pub error: Option<String>,
    pub searching: bool,
}

#[derive(Debug, Default)]
struct State {
    generation: u64,
    query: String,
    candidates: Vec<GeoResult>,
    open: bool,
    highlight: Option<usize>,
    error: Option<String>,
    searching: bool,
}

pub struct SearchController {
    geocoder: Arc<dyn Geocoder>,
    debounce: Duration,
    max_results: usize,
    state: Arc<Mutex<State>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("debounce", &self.debounce)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl SearchController {
    pub fn new(geocoder: Arc<dyn Geocoder>, debounce: Duration, max_results: usize) -> Self {
        Self {
            geocoder,
            debounce,
            max_results,
            state: Arc::new(Mutex::new(State::default())),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Feed the current text of the search box. Restarts the debounce
    /// window; a previous pending lookup is never issued, a previous
    /// in-flight lookup has its reply discarded.
    pub fn on_input(&self, text: &str) {
        let trimmed = text.trim().to_string();

        let generation = {
            let mut st = self.state.lock().unwrap();
            st.generation += 1;
            st.query = text.to_string();
            st.error = None;
            if trimmed.chars().count() < MIN_QUERY_CHARS {
                st.candidates.clear();
                st.open = false;
                st.highlight = None;
                st.searching = false;
                return;
            }
            st.searching = true;
            st.generation
        };

        let state = Arc::clone(&self.state);
        let geocoder = Arc::clone(&self.geocoder);
        let debounce = self.debounce;
        let max_results = self.max_results;

        let handle = tokio::spawn(async move {
            time::sleep(debounce).await;
            if state.lock().unwrap().generation != generation {
                // Superseded while waiting: the request is never issued.
                return;
            }

            let outcome = geocoder.search(&trimmed).await;

            let mut st = state.lock().unwrap();
            if st.generation != generation {
                // Superseded while in flight: stale reply, not an error.
                return;
            }
            st.searching = false;
            match outcome {
                Ok(mut candidates) => {
                    candidates.truncate(max_results);
                    st.open = !candidates.is_empty();
                    st.highlight = None;
                    st.candidates = candidates;
                }
                Err(e) => {
                    warn!("place search failed: {e}");
                    st.candidates.clear();
                    st.open = false;
                    st.highlight = None;
                    st.error = Some("Failed to search locations".to_string());
                }
            }
        });

        self.tasks.lock().unwrap().push(handle);
    }

    /// Keyboard interaction over the open suggestion list. Returns the
    /// selected location when Enter commits a candidate.
    pub fn handle_key(&self, key: SearchKey) -> Option<Location> {
        let mut st = self.state.lock().unwrap();
        if !st.open || st.candidates.is_empty() {
            return None;
        }
        let last = st.candidates.len() - 1;
        match key {
            SearchKey::Down => {
                st.highlight = Some(st.highlight.map_or(0, |i| (i + 1).min(last)));
                None
            }
            SearchKey::Up => {
                st.highlight = Some(st.highlight.map_or(0, |i| i.saturating_sub(1)));
                None
            }
            SearchKey::Enter => {
                let index = st.highlight.unwrap_or(0);
                Self::commit_selection(&mut st, index)
            }
            SearchKey::Escape => {
                // Close the list but keep whatever the user typed.
                st.open = false;
                None
            }
        }
    }

    /// Commit the candidate at `index` (e.g. clicked in a rendered list).
    pub fn select(&self, index: usize) -> Option<Location> {
        let mut st = self.state.lock().unwrap();
        Self::commit_selection(&mut st, index)
    }

    /// Reset the box entirely (the "clear" control).
    pub fn clear(&self) {
        let mut st = self.state.lock().unwrap();
        st.generation += 1;
        st.query.clear();
        st.candidates.clear();
        st.open = false;
        st.highlight = None;
        st.error = None;
        st.searching = false;
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        let st = self.state.lock().unwrap();
        SearchSnapshot {
            query: st.query.clone(),
            candidates: st.candidates.clone(),
            open: st.open,
            highlight: st.highlight,
            error: st.error.clone(),
            searching: st.searching,
        }
    }

    /// Wait for every spawned lookup task to settle. Superseded tasks exit
    /// without touching state; this only exists so callers (and tests) can
    /// reach a quiescent point.
    pub async fn flush(&self) {
        let handles: Vec<_> = {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
    }

    fn commit_selection(st: &mut State, index: usize) -> Option<Location> {
        let item = st.candidates.get(index)?.clone();
        st.generation += 1; // drop any in-flight lookup
        st.query = item.name.clone();
        st.candidates.clear();
        st.open = false;
        st.highlight = None;
        st.searching = false;
        Some(item.to_location())
    }
}
