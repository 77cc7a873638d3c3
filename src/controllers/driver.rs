// src/controllers/driver.rs

//! Event loop for one list view.
//!
//! Runs on a single task: user events, debounced filter input, in-flight
//! page fetches and status toggles are interleaved with `tokio::select!`.
//! Fetches may complete in any order; the controller's version check keeps
//! the view on the latest query.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};

use super::list::{FetchTicket, ListController, ListResource, ViewState};
use crate::error::Result;
use crate::models::Page;
use crate::query::{Debouncer, QueryChange};

/// A user action on a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// Page, size, sort or status change; applied immediately
    Change(QueryChange),
    /// Raw filter keystroke; applied after the debounce window
    FilterInput(String),
    /// Re-run the current query
    Refresh,
    /// Ask to flip the active flag of the row with this id
    RequestToggle(i64),
    ConfirmToggle,
    CancelToggle,
}

type PendingFetch<E> = BoxFuture<'static, (FetchTicket, Result<Page<E>>)>;

/// Owns a [`ListController`] and feeds it events.
pub struct ListDriver<E: ListResource> {
    controller: ListController<E>,
    debouncer: Debouncer<String>,
    fetches: FuturesUnordered<PendingFetch<E>>,
    toggles: FuturesUnordered<BoxFuture<'static, Result<E>>>,
}

impl<E: ListResource> ListDriver<E> {
    pub fn new(controller: ListController<E>, filter_window: Duration) -> Self {
        let debouncer = Debouncer::with_current(filter_window, controller.query().filter.clone());
        Self {
            controller,
            debouncer,
            fetches: FuturesUnordered::new(),
            toggles: FuturesUnordered::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<E>> {
        self.controller.subscribe()
    }

    /// Process events until the sender is dropped, then settle.
    ///
    /// An initial fetch is started immediately. On shutdown a pending
    /// filter value is still released and outstanding requests are awaited
    /// before the controller is handed back.
    pub async fn run(mut self, mut events: mpsc::Receiver<ListEvent>) -> ListController<E> {
        let ticket = self.controller.begin_fetch();
        self.spawn_fetch(ticket);

        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                Some((ticket, result)) = self.fetches.next(), if !self.fetches.is_empty() => {
                    self.controller.complete(ticket, result);
                }
                Some(result) = self.toggles.next(), if !self.toggles.is_empty() => {
                    self.controller.complete_toggle(result);
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.release_filter(Instant::now());
                }
            }
        }

        if let Some(deadline) = self.debouncer.deadline() {
            sleep_until(deadline).await;
            self.release_filter(deadline);
        }
        self.settle().await;
        self.controller
    }

    fn handle(&mut self, event: ListEvent) {
        match event {
            ListEvent::Change(change) => {
                if let Some(ticket) = self.controller.change(change) {
                    self.spawn_fetch(ticket);
                }
                self.debouncer
                    .set_current(self.controller.query().filter.clone());
            }
            ListEvent::FilterInput(text) => self.debouncer.push(text, Instant::now()),
            ListEvent::Refresh => {
                let ticket = self.controller.begin_fetch();
                self.spawn_fetch(ticket);
            }
            ListEvent::RequestToggle(id) => {
                if self.controller.request_toggle(id).is_none() {
                    log::warn!("No row with id {} to toggle", id);
                }
            }
            ListEvent::ConfirmToggle => {
                if let Some(request) = self.controller.begin_toggle() {
                    self.toggles.push(request);
                }
            }
            ListEvent::CancelToggle => self.controller.cancel_toggle(),
        }
    }

    fn release_filter(&mut self, now: Instant) {
        if let Some(filter) = self.debouncer.poll(now) {
            log::debug!("Filter settled on {:?}", filter);
            if let Some(ticket) = self.controller.change(QueryChange::Filter(filter)) {
                self.spawn_fetch(ticket);
            }
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        let request = self.controller.fetch(&ticket);
        self.fetches.push(Box::pin(async move {
            let result = request.await;
            (ticket, result)
        }));
    }

    async fn settle(&mut self) {
        while let Some((ticket, result)) = self.fetches.next().await {
            self.controller.complete(ticket, result);
        }
        while let Some(result) = self.toggles.next().await {
            self.controller.complete_toggle(result);
        }
    }
}
