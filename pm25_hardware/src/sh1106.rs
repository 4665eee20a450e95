use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use pm25_traits::{BoxError, StatusDisplay};
use rppal::i2c::I2c;
use sh1106::prelude::*;
use sh1106::Builder;

use crate::error::{HwError, Result};

/// 128x64 SH1106 OLED on I2C.
pub struct Sh1106Display {
    display: GraphicsMode<I2cInterface<I2c>>,
}

impl Sh1106Display {
    pub fn new(bus: u8, address: u8) -> Result<Self> {
        let i2c = I2c::with_bus(bus).map_err(|e| HwError::I2c(format!("open i2c bus {bus}: {e}")))?;
        let mut display: GraphicsMode<_> = Builder::new()
            .with_i2c_addr(address)
            .connect_i2c(i2c)
            .into();
        display
            .init()
            .map_err(|e| HwError::Display(format!("sh1106 init: {e:?}")))?;
        display.clear();
        display
            .flush()
            .map_err(|e| HwError::Display(format!("sh1106 flush: {e:?}")))?;
        tracing::info!(bus, address, "sh1106 display acquired");
        Ok(Self { display })
    }

    fn draw_frame(&mut self, density: f32, level_name: &str, glyph: &str) -> Result<()> {
        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let inverted = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);
        let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let d = &mut self.display;
        d.clear();
        // Drawing into the RAM buffer cannot fail; only flush touches the bus.
        let _ = Rectangle::new(Point::new(0, 0), Size::new(128, 12))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(d);
        let _ = Text::with_baseline("PM2.5 MONITOR", Point::new(10, 1), inverted, Baseline::Top).draw(d);
        let value = format!("{density:.1}");
        let _ = Text::with_baseline(&value, Point::new(5, 16), large, Baseline::Top).draw(d);
        let _ = Text::with_baseline("ug/m3", Point::new(70, 22), small, Baseline::Top).draw(d);
        let _ = Text::with_baseline(level_name, Point::new(5, 38), small, Baseline::Top).draw(d);
        let stars = ascii_glyph(glyph);
        let _ = Text::with_baseline(&stars, Point::new(5, 50), small, Baseline::Top).draw(d);
        d.flush()
            .map_err(|e| HwError::Display(format!("sh1106 flush: {e:?}")))
    }
}

/// The built-in fonts are ASCII only.
fn ascii_glyph(glyph: &str) -> String {
    glyph
        .chars()
        .map(|c| match c {
            '★' => '*',
            '☆' => '-',
            '☠' => 'X',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

impl StatusDisplay for Sh1106Display {
    fn render(&mut self, density: f32, level_name: &str, glyph: &str) -> std::result::Result<(), BoxError> {
        self.draw_frame(density, level_name, glyph)?;
        Ok(())
    }
}

impl Drop for Sh1106Display {
    fn drop(&mut self) {
        self.display.clear();
        let _ = self.display.flush();
    }
}
