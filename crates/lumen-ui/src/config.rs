//! Runtime configuration for a [`Ui`](crate::Ui).

use crate::widgets::button::InkTimes;
use embedded_graphics::prelude::Size;

/// Configuration for a UI instance.
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Display resolution. Screens are created at this size.
    pub screen_size: Size,
    /// Maximum number of live objects. Creation beyond it fails with
    /// [`UiError::AllocationExhausted`](crate::UiError::AllocationExhausted).
    pub max_objects: usize,
    /// Notice popup timings.
    pub notice: NoticeConfig,
    /// Ink effect given to newly created buttons.
    pub ink: InkTimes,
    /// Time a press must be held before a long-press signal.
    pub long_press_ms: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen_size: Size::new(320, 240),
            max_objects: 256,
            notice: NoticeConfig::default(),
            ink: InkTimes::DISABLED,
            long_press_ms: 400,
        }
    }
}

impl UiConfig {
    pub fn screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_size = Size::new(width, height);
        self
    }

    pub fn max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    pub fn notice(mut self, notice: NoticeConfig) -> Self {
        self.notice = notice;
        self
    }

    pub fn ink(mut self, ink: InkTimes) -> Self {
        self.ink = ink;
        self
    }

    pub fn long_press_ms(mut self, ms: u32) -> Self {
        self.long_press_ms = ms;
        self
    }
}

/// How long a notice stays, fades and collapses, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeConfig {
    /// Fully visible time.
    pub hold_ms: u32,
    /// Opacity fade duration. Unused without the `notice-fade` feature.
    pub fade_ms: u32,
    /// Height collapse duration.
    pub collapse_ms: u32,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            hold_ms: 1500,
            fade_ms: 200,
            collapse_ms: 200,
        }
    }
}
