//! Append-only, observable list of processed files.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::encode::EncodedImage;

/// A file that made it through the pipeline and was uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub file_name: String,
    pub data: EncodedImage,
    /// The payload was not an image and was forwarded unchanged.
    pub passthrough: bool,
    /// Id returned by the uploader.
    pub record_id: String,
}

/// One entry of the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRecord {
    /// 1-based, strictly increasing per successful file.
    pub sequence_id: u32,
    pub file_name: String,
    pub data: EncodedImage,
    pub passthrough: bool,
    pub record_id: String,
}

type Observer = Box<dyn FnMut(&ProcessedRecord)>;

#[derive(Default)]
struct Inner {
    records: Vec<ProcessedRecord>,
    observers: Vec<Observer>,
}

/// Shared handle to the result list.
///
/// Clones share the same list, so a presentation layer can hold one handle
/// while a batch appends through another. Records are only ever appended.
#[derive(Clone, Default)]
pub struct ResultCollector {
    inner: Rc<RefCell<Inner>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `observer` with every record appended from now on.
    ///
    /// Observers live as long as the list. One that needs to read the list
    /// must capture `downgrade()`, not a clone: a strong handle would keep
    /// the list alive forever.
    pub fn subscribe(&self, observer: impl FnMut(&ProcessedRecord) + 'static) {
        self.inner.borrow_mut().observers.push(Box::new(observer));
    }

    /// Append a processed file and notify observers.
    pub(crate) fn append(&self, file: ProcessedFile) -> ProcessedRecord {
        let record = {
            let mut inner = self.inner.borrow_mut();
            let record = ProcessedRecord {
                sequence_id: inner.records.len() as u32 + 1,
                file_name: file.file_name,
                data: file.data,
                passthrough: file.passthrough,
                record_id: file.record_id,
            };
            inner.records.push(record.clone());
            record
        };

        // Observers run without a borrow held so they may read the list.
        let mut observers = std::mem::take(&mut self.inner.borrow_mut().observers);
        for observer in observers.iter_mut() {
            observer(&record);
        }
        let mut inner = self.inner.borrow_mut();
        observers.append(&mut inner.observers);
        inner.observers = observers;

        record
    }

    /// Handle that does not keep the list alive.
    pub fn downgrade(&self) -> WeakResultCollector {
        WeakResultCollector {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().records.is_empty()
    }

    /// Copy of every record so far, in append order.
    pub fn snapshot(&self) -> Vec<ProcessedRecord> {
        self.inner.borrow().records.clone()
    }

    /// Record with the given 1-based sequence id.
    pub fn get(&self, sequence_id: u32) -> Option<ProcessedRecord> {
        let index = usize::try_from(sequence_id.checked_sub(1)?).ok()?;
        self.inner.borrow().records.get(index).cloned()
    }
}

/// Non-owning handle to a `ResultCollector`, for use inside observers.
#[derive(Clone)]
pub struct WeakResultCollector {
    inner: Weak<RefCell<Inner>>,
}

impl WeakResultCollector {
    /// The collector, if it is still alive.
    pub fn upgrade(&self) -> Option<ResultCollector> {
        self.inner.upgrade().map(|inner| ResultCollector { inner })
    }
}

impl fmt::Debug for ResultCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ResultCollector")
            .field("records", &inner.records.len())
            .field("observers", &inner.observers.len())
            .finish()
    }
}
