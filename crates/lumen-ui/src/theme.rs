//! Built-in style table.
//!
//! Objects pick their default styles from a [`Theme`] when they are created,
//! so every object of a kind shares the same `Arc<Style>` until it is given
//! its own.
//!
//! # Example
//!
//! ```
//! use lumen_ui::theme::Theme;
//! use std::sync::Arc;
//!
//! let theme = Theme::default();
//! let a = theme.plain.clone();
//! let b = theme.plain.clone();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use crate::style::{Font, OPA_COVER, Style};
use crate::widgets::button::ButtonState;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor, WebColors};
use std::sync::Arc;

/// Shared styles for every object kind.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Screen background.
    pub screen: Arc<Style>,
    /// Plain container.
    pub plain: Arc<Style>,
    /// Bordered, rounded container.
    pub pretty: Arc<Style>,
    /// Draws nothing; used for grouping objects.
    pub transparent: Arc<Style>,
    /// Label text.
    pub label: Arc<Style>,
    /// Button styles indexed by [`ButtonState::index`].
    pub button: [Arc<Style>; 5],
    /// Notice popup body.
    pub notice: Arc<Style>,
    /// Notice popup text.
    pub notice_label: Arc<Style>,
}

impl Default for Theme {
    fn default() -> Self {
        let btn_rel = Style::new()
            .fill(Rgb565::CSS_STEEL_BLUE)
            .border(Rgb565::CSS_MIDNIGHT_BLUE, 2)
            .radius(6)
            .text_color(Rgb565::WHITE);
        let btn_pr = btn_rel
            .fill(Rgb565::CSS_MIDNIGHT_BLUE)
            .border(Rgb565::CSS_NAVY, 2);
        let btn_tgl_rel = btn_rel
            .fill(Rgb565::CSS_DARK_SLATE_BLUE)
            .border(Rgb565::CSS_NAVY, 2);
        let btn_tgl_pr = btn_tgl_rel.fill(Rgb565::CSS_INDIGO);
        let btn_ina = btn_rel
            .fill(Rgb565::CSS_LIGHT_GRAY)
            .border(Rgb565::CSS_GRAY, 2)
            .text_color(Rgb565::CSS_DIM_GRAY);

        Self {
            screen: Arc::new(Style::new().fill(Rgb565::WHITE).padding(0, 0)),
            plain: Arc::new(Style::new()),
            pretty: Arc::new(
                Style::new()
                    .fill(Rgb565::CSS_GAINSBORO)
                    .border(Rgb565::CSS_DARK_GRAY, 1)
                    .radius(4),
            ),
            transparent: Arc::new(Style::transparent()),
            label: Arc::new(Style::transparent().text_color(Rgb565::BLACK)),
            button: [
                Arc::new(btn_rel),
                Arc::new(btn_pr),
                Arc::new(btn_tgl_rel),
                Arc::new(btn_tgl_pr),
                Arc::new(btn_ina),
            ],
            notice: Arc::new(
                Style::new()
                    .fill(Rgb565::CSS_DARK_SLATE_GRAY)
                    .radius(4)
                    .padding(8, 6)
                    .opa(OPA_COVER),
            ),
            notice_label: Arc::new(
                Style::transparent()
                    .text_color(Rgb565::WHITE)
                    .font(Font::Small),
            ),
        }
    }
}

impl Theme {
    /// Style the theme assigns to a button in `state`.
    pub fn button_style(&self, state: ButtonState) -> Arc<Style> {
        self.button[state.index()].clone()
    }
}
