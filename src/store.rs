//! Paging state for one record's history and the fetch/append protocol that
//! drives it.
//!
//! The store never talks to the network itself. Each transition that needs
//! data hands back a [`LoadRequest`]; whoever performs the request reports
//! the outcome through [`HistoryStore::apply_loaded`] or
//! [`HistoryStore::apply_failed`] together with the request's ticket. Tickets
//! from a superseded session are ignored, so a slow response for a record the
//! user already navigated away from can never leak into the new one.

use std::collections::HashSet;

use crate::client::HistoryQuery;
use crate::domain::{HistoryEntry, HistoryPage, RecordIdentity};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load history";

/// Identifies one issued load. Opaque outside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    page: u32,
    append: bool,
}

impl LoadTicket {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_append(&self) -> bool {
        self.append
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub query: HistoryQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub page: u32,
    pub total_pages: u32,
    pub entries: Vec<HistoryEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            entries: vec![],
            loading: false,
            error: None,
        }
    }
}

/// What the history view should show for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus<'a> {
    Idle,
    Loading,
    Failed(&'a str),
    Empty,
    Ready,
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    identity: Option<RecordIdentity>,
    generation: u64,
    // Last page that actually arrived; `page` rolls back to it when a
    // load-more fails.
    loaded_page: u32,
    state: PageState,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&RecordIdentity> {
        self.identity.as_ref()
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.state.entries
    }

    /// Starts a new session for `identity` and requests its first page.
    pub fn reset(&mut self, identity: RecordIdentity) -> LoadRequest {
        self.generation += 1;
        self.identity = Some(identity.clone());
        self.loaded_page = 0;
        self.state = PageState::default();
        self.load(identity, 1, false)
    }

    /// Restarts the current session from page one.
    pub fn refresh(&mut self) -> Option<LoadRequest> {
        let identity = self.identity.clone()?;
        Some(self.reset(identity))
    }

    pub fn has_more(&self) -> bool {
        self.state.page < self.state.total_pages
    }

    pub fn can_load_more(&self) -> bool {
        self.identity.is_some() && self.has_more() && !self.state.loading
    }

    pub fn load_more(&mut self) -> Option<LoadRequest> {
        if !self.can_load_more() {
            return None;
        }
        let identity = self.identity.clone()?;
        self.state.page += 1;
        Some(self.load(identity, self.state.page, true))
    }

    fn load(&mut self, identity: RecordIdentity, page: u32, append: bool) -> LoadRequest {
        self.state.loading = true;
        LoadRequest {
            ticket: LoadTicket {
                generation: self.generation,
                page,
                append,
            },
            query: HistoryQuery::new(identity, page),
        }
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                page = ticket.page,
                stale = ticket.generation,
                current = self.generation,
                "dropping history response from a previous record"
            );
            return false;
        }
        true
    }

    /// Applies a successfully fetched page. Returns `false` when the ticket
    /// belongs to a superseded session and nothing changed.
    pub fn apply_loaded(&mut self, ticket: LoadTicket, page: HistoryPage) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        if ticket.append {
            let seen: HashSet<i64> = self.state.entries.iter().map(|e| e.id).collect();
            let before = self.state.entries.len();
            self.state
                .entries
                .extend(page.records.into_iter().filter(|e| !seen.contains(&e.id)));
            tracing::debug!(
                page = ticket.page,
                added = self.state.entries.len() - before,
                "appended history page"
            );
        } else {
            self.state.entries = page.records;
        }

        self.state.total_pages = page.total_pages.unwrap_or(1).max(1);
        self.loaded_page = ticket.page;
        self.state.page = ticket.page.min(self.state.total_pages);
        self.state.error = None;
        self.state.loading = false;
        true
    }

    /// Records a failed load. Entries already shown are kept; a failed
    /// load-more rewinds `page` so the same page is requested next time.
    pub fn apply_failed(&mut self, ticket: LoadTicket, reason: &str) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        tracing::warn!(
            page = ticket.page,
            append = ticket.append,
            "history load failed: {}",
            reason
        );
        if ticket.append {
            self.state.page = self.loaded_page.max(1);
        }
        self.state.error = Some(LOAD_FAILED_MESSAGE.to_string());
        self.state.loading = false;
        true
    }

    pub fn status(&self) -> HistoryStatus<'_> {
        if self.identity.is_none() {
            return HistoryStatus::Idle;
        }
        if !self.state.entries.is_empty() {
            return HistoryStatus::Ready;
        }
        if self.state.loading {
            return HistoryStatus::Loading;
        }
        // Only a first page that never arrived blocks the view; a failed
        // load-more leaves whatever was already shown.
        match self.state.error.as_deref() {
            Some(msg) if self.loaded_page == 0 => HistoryStatus::Failed(msg),
            _ => HistoryStatus::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    fn rec(id: &str) -> RecordIdentity {
        RecordIdentity::new("bse1", "tbl1", id)
    }

    fn page(ids: &[i64], total_pages: Option<u32>) -> HistoryPage {
        HistoryPage {
            records: ids.iter().map(|id| entry(*id)).collect(),
            total_pages,
        }
    }

    fn ids(store: &HistoryStore) -> Vec<i64> {
        store.entries().iter().map(|e| e.id).collect()
    }

    #[test]
    fn reset_requests_first_page_of_fifty() {
        let mut store = HistoryStore::new();
        let request = store.reset(rec("rec-1"));

        assert_eq!(request.query.page, 1);
        assert_eq!(request.query.page_size, 50);
        assert_eq!(request.query.identity, rec("rec-1"));
        assert!(!request.ticket.is_append());
        assert!(store.state().loading);
        assert_eq!(store.status(), HistoryStatus::Loading);
    }

    #[test]
    fn empty_first_page_shows_empty_state_without_load_more() {
        let mut store = HistoryStore::new();
        let request = store.reset(rec("rec-1"));
        assert!(store.apply_loaded(request.ticket, page(&[], Some(1))));

        assert_eq!(store.status(), HistoryStatus::Empty);
        assert!(!store.has_more());
        assert!(store.load_more().is_none());
    }

    #[test]
    fn failed_initial_load_is_blocking() {
        let mut store = HistoryStore::new();
        let request = store.reset(rec("rec-1"));
        assert!(store.apply_failed(request.ticket, "connection refused"));

        assert_eq!(store.status(), HistoryStatus::Failed("Failed to load history"));
        assert!(store.entries().is_empty());
        assert!(!store.state().loading);
    }

    #[test]
    fn load_more_appends_next_page_in_order() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[10, 9], Some(3)));
        assert!(store.has_more());

        let second = store.load_more().expect("second page requested");
        assert_eq!(second.query.page, 2);
        assert!(second.ticket.is_append());
        store.apply_loaded(second.ticket, page(&[8, 7], Some(3)));

        assert_eq!(store.state().page, 2);
        assert_eq!(ids(&store), vec![10, 9, 8, 7]);
        assert_eq!(store.status(), HistoryStatus::Ready);
    }

    #[test]
    fn append_skips_entries_already_shown() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[10, 9], Some(2)));
        let second = store.load_more().expect("second page");
        store.apply_loaded(second.ticket, page(&[9, 8], Some(2)));

        assert_eq!(ids(&store), vec![10, 9, 8]);
    }

    #[test]
    fn load_more_is_ignored_while_loading() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[3], Some(5)));

        assert!(store.load_more().is_some());
        assert!(store.load_more().is_none());
        assert_eq!(store.state().page, 2);
    }

    #[test]
    fn load_more_stops_at_last_page() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[2], Some(2)));
        let second = store.load_more().expect("second page");
        store.apply_loaded(second.ticket, page(&[1], Some(2)));

        assert!(store.load_more().is_none());
        assert!(store.state().page <= store.state().total_pages);
    }

    #[test]
    fn failed_load_more_keeps_entries_and_rewinds_page() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[4, 3], Some(3)));
        let second = store.load_more().expect("second page");
        store.apply_failed(second.ticket, "timeout");

        assert_eq!(ids(&store), vec![4, 3]);
        assert_eq!(store.state().page, 1);
        assert_eq!(store.status(), HistoryStatus::Ready);

        let retry = store.load_more().expect("retry allowed");
        assert_eq!(retry.query.page, 2);
    }

    #[test]
    fn stale_response_from_previous_record_is_dropped() {
        let mut store = HistoryStore::new();
        let old = store.reset(rec("rec-1"));
        let new = store.reset(rec("rec-2"));

        assert!(!store.apply_loaded(old.ticket, page(&[99], Some(4))));
        assert!(store.entries().is_empty());
        assert!(store.state().loading);

        assert!(!store.apply_failed(old.ticket, "late failure"));
        assert!(store.state().error.is_none());

        assert!(store.apply_loaded(new.ticket, page(&[1], None)));
        assert_eq!(ids(&store), vec![1]);
        assert_eq!(store.state().total_pages, 1);
    }

    #[test]
    fn reset_clears_previous_session() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[5, 4], Some(3)));
        let second = store.load_more().expect("second page");
        store.apply_loaded(second.ticket, page(&[3], Some(3)));

        store.reset(rec("rec-2"));
        assert!(store.entries().is_empty());
        assert_eq!(store.state().page, 1);
        assert_eq!(store.identity(), Some(&rec("rec-2")));
    }

    #[test]
    fn refresh_restarts_current_record() {
        let mut store = HistoryStore::new();
        assert!(store.refresh().is_none());

        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[1], Some(1)));
        let request = store.refresh().expect("refresh issued");

        assert_eq!(request.query.identity, rec("rec-1"));
        assert!(store.entries().is_empty());
        assert!(!store.apply_loaded(first.ticket, page(&[1], Some(1))));
    }

    #[test]
    fn failed_load_more_after_empty_first_page_is_not_blocking() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[], Some(2)));

        let second = store.load_more().expect("second page");
        assert!(store.apply_failed(second.ticket, "connection reset"));

        assert_eq!(store.status(), HistoryStatus::Empty);
        assert_eq!(store.state().page, 1);
        assert!(store.can_load_more());
    }

    #[test]
    fn zero_total_pages_is_clamped() {
        let mut store = HistoryStore::new();
        let first = store.reset(rec("rec-1"));
        store.apply_loaded(first.ticket, page(&[], Some(0)));
        assert_eq!(store.state().total_pages, 1);
        assert_eq!(store.state().page, 1);
    }
}
