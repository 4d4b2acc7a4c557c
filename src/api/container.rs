use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::ContainerSize;

/// Registration token of one resize subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResizeObserverId(pub u64);

impl fmt::Display for ResizeObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Host element a chart is mounted in.
///
/// The host reports content-box changes back through
/// [`crate::api::ChartView::on_container_resize`] with the id returned by
/// `observe_resize`.
pub trait Container {
    fn content_size(&self) -> ContainerSize;

    fn observe_resize(&mut self) -> ResizeObserverId;

    /// Ends a subscription. Unknown ids are ignored.
    fn unobserve_resize(&mut self, observer: ResizeObserverId);
}

impl<T: Container + ?Sized> Container for &mut T {
    fn content_size(&self) -> ContainerSize {
        (**self).content_size()
    }

    fn observe_resize(&mut self) -> ResizeObserverId {
        (**self).observe_resize()
    }

    fn unobserve_resize(&mut self, observer: ResizeObserverId) {
        (**self).unobserve_resize(observer);
    }
}

/// In-memory container with a settable size and a list of live observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessContainer {
    size: ContainerSize,
    next_observer: u64,
    observers: Vec<ResizeObserverId>,
}

impl HeadlessContainer {
    #[must_use]
    pub fn new(size: ContainerSize) -> Self {
        Self {
            size,
            next_observer: 0,
            observers: Vec::new(),
        }
    }

    /// Changes the content size and returns the observers to notify.
    pub fn resize(&mut self, size: ContainerSize) -> Vec<ResizeObserverId> {
        if size == self.size {
            return Vec::new();
        }
        self.size = size;
        self.observers.clone()
    }

    #[must_use]
    pub fn observers(&self) -> &[ResizeObserverId] {
        &self.observers
    }
}

impl Container for HeadlessContainer {
    fn content_size(&self) -> ContainerSize {
        self.size
    }

    fn observe_resize(&mut self) -> ResizeObserverId {
        self.next_observer += 1;
        let id = ResizeObserverId(self.next_observer);
        self.observers.push(id);
        id
    }

    fn unobserve_resize(&mut self, observer: ResizeObserverId) {
        self.observers.retain(|entry| *entry != observer);
    }
}

/// Keeps one container subscription and filters the sizes it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeReactor {
    observer: Option<ResizeObserverId>,
    last_size: Option<ContainerSize>,
}

impl ResizeReactor {
    /// Subscribes to `container`; reuses the live subscription if present.
    pub fn attach<C: Container + ?Sized>(&mut self, container: &mut C) -> ResizeObserverId {
        if let Some(observer) = self.observer {
            return observer;
        }
        let observer = container.observe_resize();
        self.observer = Some(observer);
        self.last_size = Some(container.content_size());
        debug!(%observer, "resize observer attached");
        observer
    }

    /// Ends the subscription. Returns `true` when one was live.
    pub fn detach<C: Container + ?Sized>(&mut self, container: &mut C) -> bool {
        let Some(observer) = self.observer.take() else {
            return false;
        };
        container.unobserve_resize(observer);
        debug!(%observer, "resize observer detached");
        true
    }

    #[must_use]
    pub fn observer(&self) -> Option<ResizeObserverId> {
        self.observer
    }

    #[must_use]
    pub fn last_size(&self) -> Option<ContainerSize> {
        self.last_size
    }

    /// Records the size a chart was just built with.
    pub fn sync(&mut self, size: ContainerSize) {
        self.last_size = Some(size);
    }

    /// Filters one notification down to a size worth forwarding.
    ///
    /// Stale observer ids, collapsed (zero-area) sizes and repeats of the
    /// last forwarded size yield `None`.
    pub fn accept(
        &mut self,
        observer: ResizeObserverId,
        size: ContainerSize,
    ) -> Option<ContainerSize> {
        if self.observer != Some(observer) {
            trace!(%observer, "stale resize notification ignored");
            return None;
        }
        if !size.is_valid() {
            trace!(width = size.width, height = size.height, "collapsed container ignored");
            return None;
        }
        if self.last_size == Some(size) {
            return None;
        }
        self.last_size = Some(size);
        Some(size)
    }
}
