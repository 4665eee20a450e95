use pm25_traits::{BoxError, DustSensor, MonotonicClock};
use rppal::gpio::{Gpio, OutputPin};

use crate::ads1115::Ads1115;
use crate::error::{HwError, Result};
use crate::util::{PulseTiming, excitation_pulse};

/// Wiring of the optical dust sensor: ADC input plus LED drive pin.
#[derive(Debug, Clone, Copy)]
pub struct SensorWiring {
    pub i2c_bus: u8,
    pub adc_address: u16,
    pub adc_channel: u8,
    pub led_pin: u8,
    /// LED is lit when the pin is driven low.
    pub led_active_low: bool,
}

/// GP2Y1010-style sensor read through an ADS1115.
pub struct HardwareDustSensor {
    adc: Ads1115,
    led: OutputPin,
    led_active_low: bool,
    timing: PulseTiming,
    clock: MonotonicClock,
}

impl HardwareDustSensor {
    pub fn new(wiring: SensorWiring, timing: PulseTiming) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut led = gpio
            .get(wiring.led_pin)
            .map_err(|e| HwError::Gpio(format!("open led pin {}: {e}", wiring.led_pin)))?
            .into_output();
        // Idle with the LED off.
        set_led(&mut led, wiring.led_active_low, false);
        let adc = Ads1115::new(wiring.i2c_bus, wiring.adc_address, wiring.adc_channel)?;
        tracing::info!(
            led_pin = wiring.led_pin,
            i2c_bus = wiring.i2c_bus,
            adc_channel = wiring.adc_channel,
            "dust sensor acquired"
        );
        Ok(Self {
            adc,
            led,
            led_active_low: wiring.led_active_low,
            timing,
            clock: MonotonicClock::new(),
        })
    }
}

fn set_led(pin: &mut OutputPin, active_low: bool, on: bool) {
    if on != active_low {
        pin.set_high();
    } else {
        pin.set_low();
    }
}

impl DustSensor for HardwareDustSensor {
    fn read_voltage(&mut self) -> std::result::Result<f32, BoxError> {
        let Self {
            adc,
            led,
            led_active_low,
            timing,
            clock,
        } = self;
        let active_low = *led_active_low;
        let v = excitation_pulse(
            &*clock,
            *timing,
            |on| {
                set_led(led, active_low, on);
                Ok(())
            },
            || adc.read_voltage(),
        )?;
        tracing::trace!(volts = v, "dust sensor sample");
        Ok(v)
    }
}

impl Drop for HardwareDustSensor {
    fn drop(&mut self) {
        set_led(&mut self.led, self.led_active_low, false);
        tracing::debug!("dust sensor released");
    }
}
