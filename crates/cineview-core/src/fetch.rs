//! Fetch scopes: background requests bound to whatever mounted them.
//!
//! Each mounted page and overlay owns a [`FetchScope`]. Tasks spawned into
//! the scope report through a shared channel, tagged with the scope's
//! [`MountId`]. Dropping the scope aborts its tasks, and the browser drops
//! any already-queued result whose mount id is no longer live.

use std::future::Future;

use anyhow::Result;
use cineview_api::tmdb::TmdbCredits;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

use crate::content::ContentItem;
use crate::overlay::DetailFull;

/// Identity of one mount of a page or overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl MountId {
    /// Raw value, for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Hands out increasing mount ids.
#[derive(Debug, Default)]
pub struct MountIds {
    next: u64,
}

impl MountIds {
    /// Returns a fresh id.
    pub const fn issue(&mut self) -> MountId {
        self.next = self.next.wrapping_add(1);
        MountId(self.next)
    }
}

/// Result of one background request.
#[derive(Debug)]
pub enum FetchEvent {
    /// A catalog row or search grid.
    Row {
        /// Row index within the page.
        row: usize,
        /// Items in API order.
        result: Result<Vec<ContentItem>>,
    },
    /// Overlay detail.
    Detail(Result<DetailFull>),
    /// Overlay cast and crew.
    Credits(Result<TmdbCredits>),
    /// One person's first profile image.
    PersonImage {
        /// TMDB person ID.
        person_id: u64,
        /// Image id, `None` if the person has no profile image.
        result: Result<Option<String>>,
    },
}

/// A [`FetchEvent`] addressed to the mount that requested it.
#[derive(Debug)]
pub struct Envelope {
    /// Requesting mount.
    pub mount: MountId,
    /// The result.
    pub event: FetchEvent,
}

/// Tasks belonging to one mount.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FetchScope {
    mount: MountId,
    tasks: JoinSet<()>,
    sender: UnboundedSender<Envelope>,
}

impl FetchScope {
    /// Creates an empty scope reporting into `sender`.
    #[must_use]
    pub fn new(mount: MountId, sender: UnboundedSender<Envelope>) -> Self {
        Self {
            mount,
            tasks: JoinSet::new(),
            sender,
        }
    }

    /// Mount this scope reports for.
    #[must_use]
    pub const fn mount_id(&self) -> MountId {
        self.mount
    }

    /// Spawns a request; its event is delivered tagged with this scope's mount id.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&mut self, request: F)
    where
        F: Future<Output = FetchEvent> + Send + 'static,
    {
        let sender = self.sender.clone();
        let mount = self.mount;
        self.reap();
        self.tasks.spawn(async move {
            let event = request.await;
            if sender.send(Envelope { mount, event }).is_err() {
                tracing::debug!(mount = mount.get(), "fetch result dropped: receiver closed");
            }
        });
    }

    /// Number of tasks not yet reaped.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Discards finished task handles.
    fn reap(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }
}
