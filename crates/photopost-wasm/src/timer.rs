//! `Timer` over the global `setTimeout`.
//!
//! Works on both the window and worker global scopes.

use std::time::Duration;

use async_trait::async_trait;
use photopost_core::Timer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setTimeout, catch)]
    fn set_timeout(handler: &js_sys::Function, timeout: i32) -> Result<JsValue, JsValue>;
}

pub struct JsTimer;

#[async_trait(?Send)]
impl Timer for JsTimer {
    async fn sleep(&self, duration: Duration) {
        let delay = clamp_delay(duration);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            // Without a clock the promise never settles and the stage runs unbounded
            if let Err(e) = set_timeout(&resolve, delay) {
                web_sys::console::warn_2(&JsValue::from_str("setTimeout unavailable:"), &e);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}

/// `setTimeout` takes a signed 32-bit millisecond delay.
fn clamp_delay(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delay() {
        assert_eq!(clamp_delay(Duration::from_millis(250)), 250);
        assert_eq!(clamp_delay(Duration::from_secs(u64::MAX / 1000)), i32::MAX);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_sleep_completes() {
        JsTimer.sleep(Duration::from_millis(5)).await;
    }
}
