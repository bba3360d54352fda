//! Retained draw list.
//!
//! Rendering walks the object tree once and records [`DrawCommand`]s with
//! colors already blended and clip rectangles already intersected. Painting
//! replays them onto any `embedded-graphics` draw target, so the tree walk
//! never touches the display directly.

use crate::style::{Font, Opa, mix};
use crate::widgets::image::ImageDsc;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle, StrokeAlignment,
};
use embedded_graphics::text::{Baseline, Text};
use lumen_core::profiling::profile_function;

/// A single paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled and/or bordered rectangle. The border is drawn inside `area`.
    Rect {
        area: Rectangle,
        clip: Rectangle,
        fill: Option<Rgb565>,
        border: Option<(Rgb565, u16)>,
        radius: u16,
    },
    /// Filled circle, used by the button ink effect.
    Circle {
        center: Point,
        radius: u32,
        color: Rgb565,
        clip: Rectangle,
    },
    /// Single-color text with its top-left corner at `pos`.
    Text {
        pos: Point,
        text: String,
        font: Font,
        color: Rgb565,
        clip: Rectangle,
    },
    /// Pixel table blitted at `pos`.
    Image {
        pos: Point,
        dsc: ImageDsc,
        opa: Opa,
        bg: Rgb565,
        clip: Rectangle,
    },
}

impl DrawCommand {
    pub fn clip(&self) -> Rectangle {
        match self {
            DrawCommand::Rect { clip, .. }
            | DrawCommand::Circle { clip, .. }
            | DrawCommand::Text { clip, .. }
            | DrawCommand::Image { clip, .. } => *clip,
        }
    }
}

/// Ordered list of draw commands, back to front.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn push(&mut self, command: DrawCommand) {
        if command.clip().is_zero_sized() {
            return;
        }
        self.commands.push(command);
    }

    pub fn rect(
        &mut self,
        area: Rectangle,
        clip: Rectangle,
        fill: Option<Rgb565>,
        border: Option<(Rgb565, u16)>,
        radius: u16,
    ) {
        self.push(DrawCommand::Rect {
            area,
            clip,
            fill,
            border,
            radius,
        });
    }

    pub fn circle(&mut self, center: Point, radius: u32, color: Rgb565, clip: Rectangle) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
            clip,
        });
    }

    pub fn text(&mut self, pos: Point, text: &str, font: Font, color: Rgb565, clip: Rectangle) {
        self.push(DrawCommand::Text {
            pos,
            text: text.to_owned(),
            font,
            color,
            clip,
        });
    }

    pub fn image(&mut self, pos: Point, dsc: ImageDsc, opa: Opa, bg: Rgb565, clip: Rectangle) {
        self.push(DrawCommand::Image {
            pos,
            dsc,
            opa,
            bg,
            clip,
        });
    }

    /// Replay every command onto `target`.
    pub fn paint<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        profile_function!();
        for command in &self.commands {
            paint_command(command, target)?;
        }
        Ok(())
    }
}

fn paint_command<D>(command: &DrawCommand, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut clipped = target.clipped(&command.clip());
    match command {
        DrawCommand::Rect {
            area,
            fill,
            border,
            radius,
            ..
        } => {
            let mut builder = PrimitiveStyleBuilder::new();
            if let Some(color) = fill {
                builder = builder.fill_color(*color);
            }
            if let Some((color, width)) = border {
                builder = builder
                    .stroke_color(*color)
                    .stroke_width(*width as u32)
                    .stroke_alignment(StrokeAlignment::Inside);
            }
            let corner = Size::new(*radius as u32, *radius as u32);
            RoundedRectangle::with_equal_corners(*area, corner)
                .into_styled(builder.build())
                .draw(&mut clipped)
        }
        DrawCommand::Circle {
            center,
            radius,
            color,
            ..
        } => Circle::with_center(*center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(*color))
            .draw(&mut clipped),
        DrawCommand::Text {
            pos,
            text,
            font,
            color,
            ..
        } => {
            let style = MonoTextStyle::new(font.mono(), *color);
            Text::with_baseline(text, *pos, style, Baseline::Top)
                .draw(&mut clipped)
                .map(|_| ())
        }
        DrawCommand::Image {
            pos, dsc, opa, bg, ..
        } => {
            let pixels = dsc
                .pixels()
                .filter(|(_, color)| !dsc.is_transparent(*color))
                .map(|(p, color)| Pixel(*pos + p, mix(color, *bg, *opa)));
            clipped.draw_iter(pixels)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_clip_is_dropped() {
        let mut list = DrawList::new();
        let area = Rectangle::new(Point::zero(), Size::new(10, 10));
        list.rect(area, Rectangle::zero(), Some(Rgb565::RED), None, 0);
        assert!(list.is_empty());
        list.rect(area, area, Some(Rgb565::RED), None, 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_commands_keep_order() {
        let mut list = DrawList::new();
        let area = Rectangle::new(Point::zero(), Size::new(10, 10));
        list.rect(area, area, Some(Rgb565::RED), None, 0);
        list.text(Point::zero(), "a", Font::Body, Rgb565::BLACK, area);
        assert!(matches!(list.commands()[0], DrawCommand::Rect { .. }));
        assert!(matches!(list.commands()[1], DrawCommand::Text { .. }));
    }
}
