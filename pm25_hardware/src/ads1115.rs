use std::time::Duration;

use rppal::i2c::I2c;
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::wait_until_with_timeout;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const OS_START: u16 = 0x8000; // write: begin single conversion; read: idle
const PGA_4_096V: u16 = 0b001 << 9; // gain 1
const MODE_SINGLE: u16 = 0x0100;
const DR_860SPS: u16 = 0b111 << 5;
const COMP_DISABLE: u16 = 0b11;

const FULL_SCALE_V: f32 = 4.096;

/// ADS1115 16-bit ADC, single-ended single-shot reads.
pub struct Ads1115 {
    i2c: I2c,
    channel: u8,
    conversion_timeout: Duration,
}

impl Ads1115 {
    pub fn new(bus: u8, address: u16, channel: u8) -> Result<Self> {
        if channel > 3 {
            return Err(HwError::I2c(format!("ads1115 channel {channel} out of range 0..=3")));
        }
        let mut i2c = I2c::with_bus(bus).map_err(|e| HwError::I2c(format!("open i2c bus {bus}: {e}")))?;
        i2c.set_slave_address(address)
            .map_err(|e| HwError::I2c(format!("set ads1115 address {address:#04x}: {e}")))?;
        Ok(Self {
            i2c,
            channel,
            conversion_timeout: Duration::from_millis(10),
        })
    }

    fn config_word(&self) -> u16 {
        // AINx vs GND
        let mux = (0b100 | u16::from(self.channel)) << 12;
        OS_START | mux | PGA_4_096V | MODE_SINGLE | DR_860SPS | COMP_DISABLE
    }

    fn read_register(&mut self, reg: u8) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(&[reg], &mut buf)
            .map_err(|e| HwError::I2c(format!("ads1115 read reg {reg:#04x}: {e}")))?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Trigger one conversion and return the input voltage.
    pub fn read_voltage(&mut self) -> Result<f32> {
        let [hi, lo] = self.config_word().to_be_bytes();
        self.i2c
            .write(&[REG_CONFIG, hi, lo])
            .map_err(|e| HwError::I2c(format!("ads1115 start conversion: {e}")))?;

        let timeout = self.conversion_timeout;
        wait_until_with_timeout(
            || Ok(self.read_register(REG_CONFIG)? & OS_START != 0),
            timeout,
            Duration::from_micros(200),
        )?;

        let raw = self.read_register(REG_CONVERSION)? as i16;
        let volts = f32::from(raw) * FULL_SCALE_V / 32_768.0;
        trace!(raw, volts, "ads1115 conversion");
        Ok(volts)
    }
}
