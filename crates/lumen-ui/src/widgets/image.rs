//! Image objects and the raw pixel-table format they draw.
//!
//! A pixel table is a `&'static [u32]`: four header words (width, height,
//! bit depth, flags) followed by `width * height` samples in row-major
//! order. Only 16-bit RGB565 samples are supported. Flag bit 0 turns on
//! chroma keying: samples equal to [`CHROMA_KEY`] are not drawn.

use crate::dirty::DirtyFlags;
use crate::draw_list::DrawList;
use crate::error::{UiError, UiResult};
use crate::layout::{Fit, FitPolicy};
use crate::obj::{
    Obj, ObjClass, ObjExt, ObjId, RenderCtx, base_hit_test, ignore_signal, noop_destruct,
};
use crate::tree::ObjTree;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;

/// Sample color treated as transparent when chroma keying is on.
pub const CHROMA_KEY: Rgb565 = Rgb565::new(0, 0x3F, 0);

const HEADER_WORDS: usize = 4;
const FLAG_CHROMA_KEY: u32 = 1 << 0;

/// Validated view of a static pixel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDsc {
    width: u32,
    height: u32,
    chroma_key: bool,
    data: &'static [u32],
}

impl ImageDsc {
    /// Parse and validate a pixel table.
    pub fn from_words(words: &'static [u32]) -> UiResult<Self> {
        let invalid = |reason: String| UiError::InvalidImage { reason };

        let [width, height, depth, flags] = match words.get(..HEADER_WORDS) {
            Some(&[w, h, d, f]) => [w, h, d, f],
            _ => return Err(invalid(format!("{} header words, need 4", words.len()))),
        };
        if depth != 16 {
            return Err(invalid(format!("unsupported bit depth {}", depth)));
        }
        let samples = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| invalid(format!("{}x{} overflows", width, height)))?;
        let data = &words[HEADER_WORDS..];
        if data.len() != samples {
            return Err(invalid(format!(
                "{}x{} needs {} samples, table has {}",
                width,
                height,
                samples,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            chroma_key: flags & FLAG_CHROMA_KEY != 0,
            data,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn has_chroma_key(&self) -> bool {
        self.chroma_key
    }

    /// Sample at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let word = self.data[(y * self.width + x) as usize];
        Some(Rgb565::from(RawU16::new(word as u16)))
    }

    /// Every sample with its offset from the top-left corner.
    pub fn pixels(&self) -> impl Iterator<Item = (Point, Rgb565)> + '_ {
        let width = self.width.max(1);
        self.data.iter().enumerate().map(move |(i, &word)| {
            let i = i as u32;
            let p = Point::new((i % width) as i32, (i / width) as i32);
            (p, Rgb565::from(RawU16::new(word as u16)))
        })
    }

    pub fn is_transparent(&self, color: Rgb565) -> bool {
        self.chroma_key && color == CHROMA_KEY
    }
}

/// Image fields.
#[derive(Debug, Clone, Default)]
pub struct ImageExt {
    pub(crate) src: Option<ImageDsc>,
}

impl ImageExt {
    pub fn src(&self) -> Option<&ImageDsc> {
        self.src.as_ref()
    }
}

fn construct(obj: &mut Obj, tree: &ObjTree) {
    obj.style = tree.theme().transparent.clone();
    obj.click = false;
    obj.fit = FitPolicy::SHRINK;
    obj.ext = ObjExt::Image(ImageExt::default());
}

fn render(obj: &Obj, ctx: &RenderCtx, list: &mut DrawList) {
    ctx.draw_body(&obj.style, list);
    if let Some(dsc) = obj.image().and_then(|img| img.src) {
        list.image(ctx.area.top_left, dsc, ctx.opa, ctx.bg, ctx.clip);
    }
}

fn content_size(obj: &Obj) -> Option<Size> {
    obj.image().map(|img| img.src.map_or(Size::zero(), |dsc| dsc.size()))
}

pub(crate) static IMAGE_CLASS: ObjClass = ObjClass {
    name: "image",
    construct,
    destruct: noop_destruct,
    render,
    hit_test: base_hit_test,
    signal: ignore_signal,
    content_size,
};

impl ObjTree {
    /// Set the pixel table an image draws. The image resizes to it on the
    /// next layout pass when its fit is shrink.
    pub fn set_src(&mut self, id: ObjId, dsc: ImageDsc) -> UiResult<()> {
        let obj = self.obj_mut(id)?;
        let ObjExt::Image(img) = &mut obj.ext else {
            return Err(UiError::WrongKind {
                id,
                expected: IMAGE_CLASS.name,
            });
        };
        img.src = Some(dsc);
        if obj.fit.hor() != Fit::Grow {
            obj.size.width = dsc.size().width;
        }
        if obj.fit.ver() != Fit::Grow {
            obj.size.height = dsc.size().height;
        }
        obj.area.size = obj.size;
        self.mark(id, DirtyFlags::CONTENT);
        Ok(())
    }
}
