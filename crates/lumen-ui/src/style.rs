//! Immutable style records shared between objects.
//!
//! A [`Style`] is a plain value compared structurally. Objects hold it behind
//! an `Arc`, so many objects can point at one theme entry. Nothing mutates a
//! shared style in place: the builder methods consume and return a new value,
//! and callers wrap the result in a fresh `Arc`.

use embedded_graphics::mono_font::{MonoFont, ascii};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Size;

/// Opacity, 0 (transparent) to 255 (opaque).
pub type Opa = u8;

pub const OPA_TRANSP: Opa = 0;
pub const OPA_50: Opa = 127;
pub const OPA_COVER: Opa = 255;

/// Multiply two opacities.
#[inline]
pub fn opa_scale(a: Opa, b: Opa) -> Opa {
    ((a as u16 * b as u16) / 255) as Opa
}

/// Blend `fg` over `bg` with the given opacity.
pub fn mix(fg: Rgb565, bg: Rgb565, opa: Opa) -> Rgb565 {
    match opa {
        OPA_COVER => fg,
        OPA_TRANSP => bg,
        _ => {
            let o = opa as u16;
            let ch = |f: u8, b: u8| ((f as u16 * o + b as u16 * (255 - o)) / 255) as u8;
            Rgb565::new(ch(fg.r(), bg.r()), ch(fg.g(), bg.g()), ch(fg.b(), bg.b()))
        }
    }
}

/// Built-in bitmap fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Font {
    /// 6x10, captions.
    Small,
    /// 7x13, body text.
    #[default]
    Body,
    /// 10x20, titles.
    Title,
}

impl Font {
    pub fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Font::Small => &ascii::FONT_6X10,
            Font::Body => &ascii::FONT_7X13,
            Font::Title => &ascii::FONT_10X20,
        }
    }

    /// Pixel size of `text` laid out with this font. Lines split on `\n`.
    pub fn text_size(self, text: &str) -> Size {
        let font = self.mono();
        let glyph = font.character_size;
        let spacing = font.character_spacing;
        let mut lines = 0u32;
        let mut widest = 0u32;
        for line in text.split('\n') {
            lines += 1;
            let chars = line.chars().count() as u32;
            let width = if chars == 0 {
                0
            } else {
                chars * glyph.width + (chars - 1) * spacing
            };
            widest = widest.max(width);
        }
        Size::new(widest, lines * glyph.height)
    }
}

/// Visual properties of an object.
///
/// `fill` and `border_color` are optional: an absent fill draws no body, an
/// absent border color draws no border regardless of width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Body fill color.
    pub fill: Option<Rgb565>,
    /// Border color.
    pub border_color: Option<Rgb565>,
    /// Border width in pixels, drawn inside the object area.
    pub border_width: u16,
    /// Border opacity, applied on top of `opa`.
    pub border_opa: Opa,
    /// Corner radius.
    pub radius: u16,
    /// Horizontal padding used by layouts.
    pub pad_hor: u16,
    /// Vertical padding used by layouts.
    pub pad_ver: u16,
    /// Gap between children used by layouts.
    pub pad_inner: u16,
    /// Text color.
    pub text_color: Rgb565,
    /// Text font.
    pub font: Font,
    /// Content opacity.
    pub opa: Opa,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Rgb565::WHITE),
            border_color: None,
            border_width: 0,
            border_opa: OPA_COVER,
            radius: 0,
            pad_hor: 10,
            pad_ver: 8,
            pad_inner: 6,
            text_color: Rgb565::BLACK,
            font: Font::Body,
            opa: OPA_COVER,
        }
    }
}

impl Style {
    /// Create a new default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Style that draws nothing itself.
    pub fn transparent() -> Self {
        Self {
            fill: None,
            pad_hor: 0,
            pad_ver: 0,
            ..Self::default()
        }
    }

    pub fn fill(mut self, color: Rgb565) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn border(mut self, color: Rgb565, width: u16) -> Self {
        self.border_color = Some(color);
        self.border_width = width;
        self
    }

    pub fn no_border(mut self) -> Self {
        self.border_color = None;
        self.border_width = 0;
        self
    }

    pub fn border_opa(mut self, opa: Opa) -> Self {
        self.border_opa = opa;
        self
    }

    pub fn radius(mut self, radius: u16) -> Self {
        self.radius = radius;
        self
    }

    pub fn padding(mut self, hor: u16, ver: u16) -> Self {
        self.pad_hor = hor;
        self.pad_ver = ver;
        self
    }

    pub fn pad_inner(mut self, inner: u16) -> Self {
        self.pad_inner = inner;
        self
    }

    pub fn text_color(mut self, color: Rgb565) -> Self {
        self.text_color = color;
        self
    }

    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn opa(mut self, opa: Opa) -> Self {
        self.opa = opa;
        self
    }

    /// Border color and width to draw, if any.
    pub fn visible_border(&self) -> Option<(Rgb565, u16)> {
        match self.border_color {
            Some(color) if self.border_width > 0 && self.border_opa > OPA_TRANSP => {
                Some((color, self.border_width))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(mix(Rgb565::RED, Rgb565::BLUE, OPA_COVER), Rgb565::RED);
        assert_eq!(mix(Rgb565::RED, Rgb565::BLUE, OPA_TRANSP), Rgb565::BLUE);
    }

    #[test]
    fn test_mix_half() {
        let c = mix(Rgb565::WHITE, Rgb565::BLACK, OPA_50);
        assert!(c.r() > 0 && c.r() < Rgb565::MAX_R);
        assert!(c.g() > 0 && c.g() < Rgb565::MAX_G);
    }

    #[test]
    fn test_opa_scale() {
        assert_eq!(opa_scale(OPA_COVER, OPA_COVER), OPA_COVER);
        assert_eq!(opa_scale(OPA_COVER, OPA_TRANSP), OPA_TRANSP);
        assert_eq!(opa_scale(OPA_COVER, 100), 100);
    }

    #[test]
    fn test_structural_equality() {
        let a = Style::new().fill(Rgb565::RED).radius(4);
        let b = Style::new().radius(4).fill(Rgb565::RED);
        assert_eq!(a, b);
        assert_ne!(a, a.radius(5));
    }

    #[test]
    fn test_text_size() {
        // FONT_7X13: 7 px glyphs, no extra spacing.
        assert_eq!(Font::Body.text_size("abc"), Size::new(21, 13));
        assert_eq!(Font::Body.text_size("ab\nabcd"), Size::new(28, 26));
        assert_eq!(Font::Body.text_size(""), Size::new(0, 13));
    }

    #[test]
    fn test_border_hidden_without_color() {
        let s = Style::new().no_border();
        assert_eq!(s.visible_border(), None);
        let s = Style::new().border(Rgb565::BLACK, 2);
        assert_eq!(s.visible_border(), Some((Rgb565::BLACK, 2)));
    }
}
