use wasm_bindgen::{JsCast, prelude::Closure};

use super::{dom::window, error::Result};

/// A pending `setTimeout`. Dropping it clears the timer.
pub struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new<F>(millis: u32, callback: F) -> Result<Self>
    where
        F: FnOnce() + 'static,
    {
        let closure = Closure::once(callback);

        let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            millis as i32,
        )?;

        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

/// Schedules `callback` once; the timer cannot be cancelled.
pub fn set_timeout<F>(millis: u32, callback: F) -> Result<()>
where
    F: FnOnce() + 'static,
{
    let closure = Closure::once(callback);

    window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        millis as i32,
    )?;

    closure.forget();

    Ok(())
}

/// A running `setInterval`. Dropping it clears the interval.
pub struct Interval {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new<F>(millis: u32, callback: F) -> Result<Self>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);

        let handle = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            millis as i32,
        )?;

        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

/// Trailing-edge debounce: each call replaces the pending timer.
pub struct Debounced {
    delay_ms: u32,
    pending: Option<Timeout>,
}

impl Debounced {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Applies from the next `call` on.
    pub fn set_delay(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    pub fn call<F>(&mut self, callback: F) -> Result<()>
    where
        F: FnOnce() + 'static,
    {
        // Dropping the previous timeout clears it.
        self.pending = Some(Timeout::new(self.delay_ms, callback)?);
        Ok(())
    }
}
