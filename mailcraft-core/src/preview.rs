//! Live Preview - Debounced Recompute
//!
//! Every edit schedules a render after a quiet window; an edit inside the
//! window pushes the deadline back. Time is passed in by the caller, so the
//! host decides what drives `tick` (a UI timer, an event loop, a test).

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::components::EmailComponent;
use crate::render::render_components;
use crate::settings::DesignSettings;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { debounce_ms: DEFAULT_DEBOUNCE_MS }
    }
}

impl PreviewConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Trailing-edge debouncer. A newer schedule replaces the pending one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per quiet window, when `now` has reached the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Preview state held by an editing session.
pub struct LivePreview {
    debouncer: Debouncer,
    components: Vec<EmailComponent>,
    settings: DesignSettings,
    html: String,
    render_count: u64,
}

impl LivePreview {
    /// Renders once up front so `html` is always a complete document.
    pub fn new(
        config: PreviewConfig,
        components: Vec<EmailComponent>,
        settings: DesignSettings,
    ) -> Self {
        let html = render_components(&components, &settings);
        Self {
            debouncer: Debouncer::new(config.window()),
            components,
            settings,
            html,
            render_count: 1,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn components(&self) -> &[EmailComponent] {
        &self.components
    }

    pub fn set_components(&mut self, components: Vec<EmailComponent>, now: Instant) {
        self.components = components;
        self.debouncer.schedule(now);
    }

    /// Field-level edit. Returns false when no component has `id`.
    pub fn update_attribute(&mut self, id: &str, key: &str, value: &str, now: Instant) -> bool {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        component.set(key, value);
        self.debouncer.schedule(now);
        true
    }

    pub fn set_settings(&mut self, settings: DesignSettings, now: Instant) {
        self.settings = settings;
        self.debouncer.schedule(now);
    }

    /// Render if the quiet window has elapsed. Returns whether it rendered.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.debouncer.poll(now) {
            return false;
        }
        self.rerender();
        true
    }

    /// Render now if anything is pending.
    pub fn flush(&mut self) -> bool {
        if !self.debouncer.is_pending() {
            return false;
        }
        self.debouncer.cancel();
        self.rerender();
        true
    }

    fn rerender(&mut self) {
        self.html = render_components(&self.components, &self.settings);
        self.render_count += 1;
        debug!(
            renders = self.render_count,
            components = self.components.len(),
            "preview refreshed"
        );
    }
}
