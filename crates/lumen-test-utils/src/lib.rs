//! Test utilities for lumen.
//!
//! [`TestDisplay`] is an in-memory `Rgb565` framebuffer that implements
//! `DrawTarget`. Unlike `MockDisplay` from embedded-graphics it allows
//! overdraw, ignores out-of-bounds pixels and records how many pixel writes
//! it received, so tests can assert both on the final image and on how much
//! was painted.
//!
//! ```rust
//! use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::*};
//! use lumen_test_utils::TestDisplay;
//!
//! let mut display = TestDisplay::new(8, 8);
//! Rectangle::new(Point::new(2, 2), Size::new(2, 2))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut display)
//!     .unwrap();
//! assert_eq!(display.pixel(2, 2), Some(Rgb565::RED));
//! assert_eq!(display.count(Rgb565::RED), 4);
//! ```

pub mod display;

pub use display::TestDisplay;
