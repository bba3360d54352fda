//! Object kinds beyond the plain base object.

pub mod button;
pub mod image;
pub mod label;

pub use button::{ActionFn, ButtonAction, ButtonExt, ButtonState, ButtonStyle, Ink, InkTimes};
pub use image::{CHROMA_KEY, ImageDsc, ImageExt};
pub use label::LabelExt;
