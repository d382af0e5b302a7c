//! Renderer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Routes `input` events from matching elements to a data path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputBinding {
    /// CSS selector the event target must match
    pub selector: String,

    /// Data path the control's value is written to
    pub path: String,
}

impl InputBinding {
    pub fn new(selector: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            path: path.into(),
        }
    }
}

/// Options for a [`Renderer`](super::Renderer).
///
/// Every field has a default, so partial JSON works:
///
/// ```
/// use myopie::render::Options;
///
/// let options: Options = serde_json::from_str(r#"{"debounce_ms": 0}"#).unwrap();
/// assert_eq!(options.debounce_ms, 0);
/// assert!(options.render_on_input);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
    /// Delay between a change and the render it schedules. Zero renders
    /// synchronously.
    pub debounce_ms: u64,

    /// Whether writes from input bindings schedule a render
    pub render_on_input: bool,

    /// Input bindings, first match wins
    pub input_to_path: Vec<InputBinding>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            render_on_input: true,
            input_to_path: Vec::new(),
        }
    }
}

impl Options {
    /// Options that render synchronously on every change.
    pub fn immediate() -> Self {
        Self {
            debounce_ms: 0,
            ..Self::default()
        }
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_render_on_input(mut self, render_on_input: bool) -> Self {
        self.render_on_input = render_on_input;
        self
    }

    /// Adds an input binding.
    pub fn bind_input(mut self, selector: impl Into<String>, path: impl Into<String>) -> Self {
        self.input_to_path.push(InputBinding::new(selector, path));
        self
    }

    /// The debounce interval.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
