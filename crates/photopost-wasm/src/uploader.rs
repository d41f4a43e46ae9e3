//! The `ImageUploader` class: batch entry point for a file input.
//!
//! # Example
//!
//! ```typescript
//! import { ImageUploader } from '@photopost/wasm';
//!
//! const uploader = new ImageUploader({ maxDimension: 2048, quality: 0.75 }, createRecord);
//! uploader.onProcessed((record) => gallery.push(record));
//!
//! input.addEventListener('change', async () => {
//!   const report = await uploader.handleFilesSelected(input.files, recordId);
//!   for (const failure of report.failures) showToast(failure.message);
//! });
//! ```

use std::rc::Rc;

use photopost_core::{BatchProcessor, ResultCollector};
use wasm_bindgen::prelude::*;

use crate::file::BrowserFile;
use crate::timer::JsTimer;
use crate::types::{config_from_js, describe_js_error, to_js, JsBatchReport, JsRecord};
use crate::upload::JsUploader;

/// Downscales, re-encodes and uploads selected files, one at a time.
#[wasm_bindgen]
pub struct ImageUploader {
    processor: Rc<BatchProcessor>,
    results: ResultCollector,
}

#[wasm_bindgen]
impl ImageUploader {
    /// Create an uploader.
    ///
    /// # Arguments
    ///
    /// * `options` - `{ maxDimension?, quality?, outputFormat?, filter?,
    ///   readTimeoutMs?, uploadTimeoutMs? }`, or `undefined` for defaults
    /// * `create_record` - Function creating a backend record for one file
    ///
    /// # Errors
    ///
    /// Returns an error string if the options are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue, create_record: js_sys::Function) -> Result<ImageUploader, JsValue> {
        let config = config_from_js(options)?;
        let processor = BatchProcessor::new(config, JsUploader::new(create_record))
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .with_timer(JsTimer);
        Ok(ImageUploader {
            processor: Rc::new(processor),
            results: ResultCollector::new(),
        })
    }

    /// Process a file selection in order.
    ///
    /// Resolves to `{ processed: number[], failures: { index, fileName, stage,
    /// message }[] }`. Never rejects because of an individual file.
    #[wasm_bindgen(js_name = handleFilesSelected)]
    pub fn handle_files_selected(
        &self,
        files: web_sys::FileList,
        owner_record_id: String,
    ) -> js_sys::Promise {
        let processor = Rc::clone(&self.processor);
        let results = self.results.clone();
        let files = BrowserFile::from_list(&files);

        wasm_bindgen_futures::future_to_promise(async move {
            let report = processor.run(&files, &owner_record_id, &results).await;
            to_js(&JsBatchReport::from(&report))
        })
    }

    /// All records appended so far, oldest first.
    pub fn processed(&self) -> Result<JsValue, JsValue> {
        let records: Vec<JsRecord> = self.results.snapshot().iter().map(JsRecord::from).collect();
        to_js(&records)
    }

    /// Number of records appended so far.
    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Call `callback(record)` for every record appended from now on.
    #[wasm_bindgen(js_name = onProcessed)]
    pub fn on_processed(&self, callback: js_sys::Function) {
        self.results.subscribe(move |record| {
            let notified = to_js(&JsRecord::from(record))
                .and_then(|value| callback.call1(&JsValue::NULL, &value));
            if let Err(e) = notified {
                web_sys::console::error_1(&JsValue::from_str(&format!(
                    "onProcessed callback failed: {}",
                    describe_js_error(&e)
                )));
            }
        });
    }
}
