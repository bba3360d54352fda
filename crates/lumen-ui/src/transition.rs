//! Animated change from one style to another.

use crate::anim::{ANIM_RES, Anim, AnimSetter};
use crate::obj::ObjId;
use crate::style::Style;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use std::sync::Arc;

/// Two style snapshots and the rule for blending between them.
///
/// Numeric fields move linearly. The font snaps to `to` halfway through.
/// An optional field set on only one side keeps its `from` value until the
/// transition completes, then takes the `to` value.
#[derive(Debug, Clone)]
pub struct StyleTransition {
    pub from: Arc<Style>,
    pub to: Arc<Style>,
}

impl StyleTransition {
    pub fn new(from: Arc<Style>, to: Arc<Style>) -> Self {
        Self { from, to }
    }

    /// Build the task that drives this transition on `target`.
    pub fn anim(self, target: ObjId, time_ms: u32) -> Anim {
        Anim::new(target, AnimSetter::Style(Arc::new(self)))
            .values(0, ANIM_RES)
            .time(time_ms)
    }

    /// Style to hold at `progress` (0 to [`ANIM_RES`]). The end returns the
    /// `to` reference itself, the start returns `from`.
    pub fn at(&self, progress: i32) -> Arc<Style> {
        if progress >= ANIM_RES {
            self.to.clone()
        } else if progress <= 0 {
            self.from.clone()
        } else {
            Arc::new(self.mix(progress))
        }
    }

    /// Blend of the two styles at `progress`.
    pub fn mix(&self, progress: i32) -> Style {
        let p = progress.clamp(0, ANIM_RES);
        let (a, b) = (&*self.from, &*self.to);
        let done = p >= ANIM_RES;

        let optional = |x: Option<Rgb565>, y: Option<Rgb565>| match (x, y) {
            (Some(x), Some(y)) => Some(lerp_color(x, y, p)),
            _ if done => y,
            _ => x,
        };
        // Width alone cannot be blended without a color on both sides.
        let border_width = if a.border_color.is_some() && b.border_color.is_some() {
            lerp(a.border_width as i32, b.border_width as i32, p) as u16
        } else if done {
            b.border_width
        } else {
            a.border_width
        };

        Style {
            fill: optional(a.fill, b.fill),
            border_color: optional(a.border_color, b.border_color),
            border_width,
            border_opa: lerp(a.border_opa as i32, b.border_opa as i32, p) as u8,
            radius: lerp(a.radius as i32, b.radius as i32, p) as u16,
            pad_hor: lerp(a.pad_hor as i32, b.pad_hor as i32, p) as u16,
            pad_ver: lerp(a.pad_ver as i32, b.pad_ver as i32, p) as u16,
            pad_inner: lerp(a.pad_inner as i32, b.pad_inner as i32, p) as u16,
            text_color: lerp_color(a.text_color, b.text_color, p),
            font: if p >= ANIM_RES / 2 { b.font } else { a.font },
            opa: lerp(a.opa as i32, b.opa as i32, p) as u8,
        }
    }
}

fn lerp(a: i32, b: i32, p: i32) -> i32 {
    a + (b - a) * p / ANIM_RES
}

fn lerp_color(a: Rgb565, b: Rgb565, p: i32) -> Rgb565 {
    let ch = |x: u8, y: u8| lerp(x as i32, y as i32, p) as u8;
    Rgb565::new(ch(a.r(), b.r()), ch(a.g(), b.g()), ch(a.b(), b.b()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Font;

    fn pair(from: Style, to: Style) -> StyleTransition {
        StyleTransition::new(Arc::new(from), Arc::new(to))
    }

    #[test]
    fn test_numeric_midpoint() {
        let t = pair(Style::new().radius(0).opa(0), Style::new().radius(10).opa(200));
        let mid = t.mix(ANIM_RES / 2);
        assert_eq!(mid.radius, 5);
        assert_eq!(mid.opa, 100);
    }

    #[test]
    fn test_color_channels() {
        let t = pair(
            Style::new().fill(Rgb565::BLACK),
            Style::new().fill(Rgb565::new(30, 60, 30)),
        );
        assert_eq!(t.mix(ANIM_RES / 2).fill, Some(Rgb565::new(15, 30, 15)));
    }

    #[test]
    fn test_font_snaps_at_half() {
        let t = pair(Style::new().font(Font::Small), Style::new().font(Font::Title));
        assert_eq!(t.mix(ANIM_RES / 2 - 1).font, Font::Small);
        assert_eq!(t.mix(ANIM_RES / 2).font, Font::Title);
    }

    #[test]
    fn test_one_sided_field_held() {
        let t = pair(
            Style::new().no_border(),
            Style::new().border(Rgb565::RED, 3),
        );
        for p in [0, 64, 128, 255] {
            let s = t.mix(p);
            assert_eq!(s.border_color, None);
            assert_eq!(s.border_width, 0);
        }
        let end = t.mix(ANIM_RES);
        assert_eq!(end.border_color, Some(Rgb565::RED));
        assert_eq!(end.border_width, 3);
    }

    #[test]
    fn test_end_is_exact_reference() {
        let t = pair(Style::new(), Style::new().radius(9));
        assert!(Arc::ptr_eq(&t.at(ANIM_RES), &t.to));
        assert!(Arc::ptr_eq(&t.at(0), &t.from));
    }
}
