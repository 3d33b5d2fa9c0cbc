use std::path::Path;
use std::str::FromStr;
use toml::{Table, Value};

use sensor_err::{Result, SensorError};

pub const CONFIG_FILE : &str = "weather.toml";

//----------------------------------------------------------------------------------------------------------------------------------
pub struct Config {
    config : Table
}


//----------------------------------------------------------------------------------------------------------------------------------
impl Config {

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn new() -> Result<Self> {
        Self::from_path(Path::new(CONFIG_FILE))
    }


    //------------------------------------------------------------------------------------------------------------------------------
    pub fn from_path(path : &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        config_str.parse()
    }


    //------------------------------------------------------------------------------------------------------------------------------
    fn get(&self, name : &str, key : &str) -> Option<&Value> {
        self.config.get(name)?.as_table()?.get(key)
    }


    //------------------------------------------------------------------------------------------------------------------------------
    pub fn get_sample_period(&self) -> Option<u32> {
        let period = self.get("common", "sample_period_in_mins")?.as_integer()?;
        u32::try_from(period).ok().filter(|period| *period > 0)
    }


    //------------------------------------------------------------------------------------------------------------------------------
    pub fn get_dev_name(&self, name : &str) -> Option<&str> {
        let dev = self.get(name, "dev").and_then(Value::as_str);
        if dev.is_none() {
            println!("No dev specified for {} in config file", name)
        }
        dev
    }


    //------------------------------------------------------------------------------------------------------------------------------
    /// 7-bit I2C address, written as 0x76 or 118
    pub fn get_address(&self, name : &str) -> Option<u16> {
        let address = self.get(name, "address")?.as_integer()?;
        u16::try_from(address).ok().filter(|address| *address < 0x80)
    }


    //------------------------------------------------------------------------------------------------------------------------------
    /// Sample count for "temp_oversampling", "pres_oversampling" or "humd_oversampling"
    pub fn get_oversampling(&self, name : &str, key : &str) -> Option<u8> {
        let factor = self.get(name, key)?.as_integer()?;
        u8::try_from(factor).ok()
    }


    //------------------------------------------------------------------------------------------------------------------------------
    pub fn get_filter(&self, name : &str) -> Option<u8> {
        let coefficient = self.get(name, "filter")?.as_integer()?;
        u8::try_from(coefficient).ok()
    }


    //------------------------------------------------------------------------------------------------------------------------------
    pub fn get_standby_ms(&self, name : &str) -> Option<f64> {
        self.get_float(name, "standby_ms")
    }


    //------------------------------------------------------------------------------------------------------------------------------
    pub fn get_sea_level_hpa(&self, name : &str) -> Option<f64> {
        self.get_float(name, "sea_level_hpa")
    }


    //------------------------------------------------------------------------------------------------------------------------------
    // TOML keeps 1000 and 1000.0 apart, accept either
    fn get_float(&self, name : &str, key : &str) -> Option<f64> {
        match self.get(name, key)? {
            Value::Float(value) => Some(*value),
            Value::Integer(value) => Some(*value as f64),
            _ => None
        }
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl FromStr for Config {
    type Err = SensorError;

    fn from_str(config_str : &str) -> Result<Self> {
        let config : Table = config_str.parse()?;
        Ok(Self { config })
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE : &str = r#"
[common]
sample_period_in_mins = 5

[indoor]
dev = "/dev/i2c-1"
address = 0x76
temp_oversampling = 2
pres_oversampling = 16
humd_oversampling = 1
filter = 16
standby_ms = 0.5
sea_level_hpa = 1013.25
"#;

    #[test]
    fn read_all_values() {
        let config : Config = SAMPLE.parse().unwrap();

        assert_eq!(config.get_sample_period(), Some(5));
        assert_eq!(config.get_dev_name("indoor"), Some("/dev/i2c-1"));
        assert_eq!(config.get_address("indoor"), Some(0x76));
        assert_eq!(config.get_oversampling("indoor", "temp_oversampling"), Some(2));
        assert_eq!(config.get_oversampling("indoor", "pres_oversampling"), Some(16));
        assert_eq!(config.get_oversampling("indoor", "humd_oversampling"), Some(1));
        assert_eq!(config.get_filter("indoor"), Some(16));
        assert_relative_eq!(config.get_standby_ms("indoor").unwrap(), 0.5);
        assert_relative_eq!(config.get_sea_level_hpa("indoor").unwrap(), 1013.25);
    }

    #[test]
    fn missing_values_are_none() {
        let config : Config = "[indoor]\ndev = 3\n".parse().unwrap();

        assert_eq!(config.get_sample_period(), None);
        assert_eq!(config.get_dev_name("indoor"), None);
        assert_eq!(config.get_dev_name("outdoor"), None);
        assert_eq!(config.get_address("indoor"), None);
        assert_eq!(config.get_standby_ms("indoor"), None);
    }

    #[test]
    fn out_of_range_values_are_none() {
        let config : Config = "[common]\nsample_period_in_mins = 0\n[indoor]\naddress = 0x1FF\nfilter = -2\n"
            .parse().unwrap();

        assert_eq!(config.get_sample_period(), None);
        assert_eq!(config.get_address("indoor"), None);
        assert_eq!(config.get_filter("indoor"), None);
    }

    #[test]
    fn integer_standby_accepted() {
        let config : Config = "[indoor]\nstandby_ms = 1000\n".parse().unwrap();
        assert_relative_eq!(config.get_standby_ms("indoor").unwrap(), 1000.0);
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!("[indoor\n".parse::<Config>(), Err(SensorError::Config(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(Config::from_path(Path::new("/nonexistent/weather.toml")), Err(SensorError::Io(_))));
    }
}
