use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("i2c error: {0}")]
    I2c(String),
    #[error("adc conversion timeout")]
    ConversionTimeout,
    #[error("sensor unavailable: {0}")]
    Unavailable(String),
    #[error("display error: {0}")]
    Display(String),
}

pub type Result<T> = std::result::Result<T, HwError>;
