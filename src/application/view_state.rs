// src/application/view_state.rs
//
// What the screen shows: the active tab, the catalog result slot and the
// live projection of the user's saved movies.
//
// RULES:
// - Every search/popular request takes a ticket; only the latest ticket may
//   fill the result slot
// - Saved tabs list newest updatedAt first
// - A failed list refresh leaves the last projection in place and raises a
//   notice that is shown once

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::{CatalogEntry, SavedMovie, WatchStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Search,
    ToWatch,
    Watched,
}

impl Tab {
    pub fn status(&self) -> Option<WatchStatus> {
        match self {
            Tab::Search => None,
            Tab::ToWatch => Some(WatchStatus::ToWatch),
            Tab::Watched => Some(WatchStatus::Watched),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Search => write!(f, "Search"),
            Tab::ToWatch => write!(f, "To Watch"),
            Tab::Watched => write!(f, "Watched"),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "search" => Ok(Tab::Search),
            "towatch" => Ok(Tab::ToWatch),
            "watched" => Ok(Tab::Watched),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

/// Claim on the result slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// One line of the active tab
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub poster_path: Option<String>,
    /// Which list the movie is on, if any
    pub status: Option<WatchStatus>,
}

#[derive(Debug, Default)]
pub struct ViewState {
    tab: Tab,
    issued: u64,
    loading: bool,
    results: Vec<CatalogEntry>,
    saved: HashMap<u64, SavedMovie>,
    sync_notice: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Supersedes any request still in flight
    pub fn begin_request(&mut self) -> RequestTicket {
        self.issued += 1;
        self.loading = true;
        RequestTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Returns false (and changes nothing) for a superseded ticket
    pub fn complete_request(&mut self, ticket: RequestTicket, results: Vec<CatalogEntry>) -> bool {
        if !self.is_current(ticket) {
            log::debug!("Dropping results of superseded request {}", ticket.0);
            return false;
        }
        self.results = results;
        self.loading = false;
        true
    }

    /// A failed request keeps the previous results
    pub fn fail_request(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn results(&self) -> &[CatalogEntry] {
        &self.results
    }

    /// Replace the saved projection with a fresh snapshot
    pub fn set_saved(&mut self, movies: Vec<SavedMovie>) {
        self.sync_notice = None;
        self.saved = movies.into_iter().map(|m| (m.id, m)).collect();
    }

    pub fn clear_saved(&mut self) {
        self.sync_notice = None;
        self.saved.clear();
    }

    pub fn set_sync_notice(&mut self, message: impl Into<String>) {
        self.sync_notice = Some(message.into());
    }

    pub fn take_sync_notice(&mut self) -> Option<String> {
        self.sync_notice.take()
    }

    pub fn saved_count(&self, status: WatchStatus) -> usize {
        self.saved.values().filter(|m| m.status == status).count()
    }

    pub fn find_saved(&self, id: u64) -> Option<&SavedMovie> {
        self.saved.get(&id)
    }

    /// Catalog entry for a visible id, from the results or the saved lists
    pub fn find_entry(&self, id: u64) -> Option<CatalogEntry> {
        self.results
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .or_else(|| {
                self.saved.get(&id).map(|m| CatalogEntry {
                    id: m.id,
                    title: m.title.clone(),
                    year: m.year,
                    poster_path: m.poster_path.clone(),
                })
            })
    }

    /// One list, newest updatedAt first
    pub fn saved_by_status(&self, status: WatchStatus) -> Vec<SavedMovie> {
        let mut movies: Vec<SavedMovie> = self
            .saved
            .values()
            .filter(|m| m.status == status)
            .cloned()
            .collect();
        movies.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        movies
    }

    pub fn rows(&self) -> Vec<MovieRow> {
        match self.tab.status() {
            None => self
                .results
                .iter()
                .map(|entry| MovieRow {
                    id: entry.id,
                    title: entry.title.clone(),
                    year: entry.year,
                    poster_path: entry.poster_path.clone(),
                    status: self.saved.get(&entry.id).map(|m| m.status),
                })
                .collect(),
            Some(status) => self
                .saved_by_status(status)
                .into_iter()
                .map(|m| MovieRow {
                    id: m.id,
                    title: m.title,
                    year: m.year,
                    poster_path: m.poster_path,
                    status: Some(m.status),
                })
                .collect(),
        }
    }
}
