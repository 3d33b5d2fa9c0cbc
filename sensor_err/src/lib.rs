use std::fmt;
use std::io;
use std::num::{ParseIntError, ParseFloatError};
use i2cdev::linux::LinuxI2CError;

//----------------------------------------------------------------------------------------------------------------------------------
pub enum SensorError {
    /// The Linux I2C transport failed, the error is kept as reported
    I2c(LinuxI2CError),

    /// Any other register transport failed
    Bus(String),

    /// No BME280 chip id found at any of the probed addresses
    NotFound { addresses : Vec<u16> },

    /// Polling for the end of a conversion ran out of attempts
    Timeout,

    /// Bad configuration file or value
    Config(String),

    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, SensorError>;


//----------------------------------------------------------------------------------------------------------------------------------
impl SensorError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::I2c(_) | Self::Bus(_))
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl From<LinuxI2CError> for SensorError {
    fn from(error: LinuxI2CError) -> Self {
        Self::I2c(error)
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl From<io::Error> for SensorError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl From<&str> for SensorError {
    fn from(error : &str) -> Self {
        Self::Bus(String::from(error))
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl From<toml::de::Error> for SensorError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config(format!("TOML Error {}", error))
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl From<ParseIntError> for SensorError {
    fn from(error: ParseIntError) -> Self {
        Self::Config(format!("Parse to Int Error {}", error))
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl From<ParseFloatError> for SensorError {
    fn from(error: ParseFloatError) -> Self {
        Self::Config(format!("Parse to Float Error {}", error))
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::I2c(error) => write!(f, "I2C Error {}", error),
            Self::Bus(error) => write!(f, "Bus Error {}", error),
            Self::NotFound { addresses } => {
                write!(f, "No BME280 found at")?;
                for addr in addresses {
                    write!(f, " {:#04x}", addr)?;
                }
                Ok(())
            },
            Self::Timeout => write!(f, "Timed out waiting for conversion"),
            Self::Config(error) => write!(f, "Config Error {}", error),
            Self::Io(error) => write!(f, "IO Error {}", error),
        }
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl fmt::Debug for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl std::error::Error for SensorError {}


//----------------------------------------------------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_address() {
        let error = SensorError::NotFound { addresses : vec![0x76, 0x77] };
        assert_eq!(format!("{}", error), "No BME280 found at 0x76 0x77");
        assert!(!error.is_transport());
    }

    #[test]
    fn str_becomes_bus_error() {
        let error = SensorError::from("nak");
        assert!(error.is_transport());
        assert_eq!(format!("{:?}", error), "Bus Error nak");
    }

    #[test]
    fn parse_errors_become_config_errors() {
        let error = SensorError::from("x".parse::<u8>().unwrap_err());
        assert!(matches!(error, SensorError::Config(_)));
    }
}
