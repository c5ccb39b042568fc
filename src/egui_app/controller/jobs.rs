//! Worker threads for catalog calls, with stale-result filtering.
//!
//! Each search or image fetch runs on its own short-lived thread and reports
//! back over an mpsc channel the controller drains every frame. Requests
//! carry a monotonically increasing sequence tag; a result whose tag is not
//! the latest issued is spurious and gets dropped by the controller.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use url::Url;

use crate::catalog::{self, CatalogError, ImageError, Product, ProductImage};

/// Messages produced by worker threads.
pub(crate) enum JobMessage {
    SearchFinished {
        seq: u64,
        /// The query this search was issued for; ranking uses it even if the
        /// search box has been edited since.
        query: String,
        result: Result<Vec<Product>, CatalogError>,
    },
    ImageLoaded {
        seq: u64,
        result: Result<ProductImage, ImageError>,
    },
}

/// Channel endpoints and sequence counters for controller-owned jobs.
pub(crate) struct ControllerJobs {
    tx: Sender<JobMessage>,
    rx: Receiver<JobMessage>,
    search_seq: u64,
    image_seq: u64,
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            search_seq: 0,
            image_seq: 0,
        }
    }

    /// Start a search worker and return its sequence tag.
    ///
    /// Issuing a new search makes any earlier pending search spurious.
    pub(crate) fn spawn_search(&mut self, base_url: Url, query: String) -> u64 {
        self.search_seq += 1;
        let seq = self.search_seq;
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = catalog::search(&base_url, &query);
            // Send failure means the controller is gone; nothing to do.
            let _ = tx.send(JobMessage::SearchFinished { seq, query, result });
        });
        seq
    }

    /// Start an image-fetch worker and return its sequence tag.
    pub(crate) fn spawn_image_fetch(&mut self, image_url: String, max_edge: u32) -> u64 {
        self.image_seq += 1;
        let seq = self.image_seq;
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = catalog::image::fetch(&image_url, max_edge);
            let _ = tx.send(JobMessage::ImageLoaded { seq, result });
        });
        seq
    }

    /// Tag of the most recently issued search.
    pub(crate) fn latest_search(&self) -> u64 {
        self.search_seq
    }

    /// Tag of the most recently issued image fetch.
    pub(crate) fn latest_image(&self) -> u64 {
        self.image_seq
    }

    /// Drop any pending image result by advancing past its tag.
    pub(crate) fn invalidate_image(&mut self) {
        self.image_seq += 1;
    }

    pub(crate) fn try_recv(&self) -> Result<JobMessage, TryRecvError> {
        self.rx.try_recv()
    }

    /// Inject a finished job directly, bypassing the worker threads.
    #[cfg(test)]
    pub(crate) fn push_for_test(&self, message: JobMessage) {
        self.tx.send(message).expect("controller job channel closed");
    }

    /// Reserve a sequence tag without spawning a worker.
    #[cfg(test)]
    pub(crate) fn fake_search(&mut self) -> u64 {
        self.search_seq += 1;
        self.search_seq
    }
}
