use std::path::PathBuf;

use clap::Args;

/// Sensor device selection, shared by every subcommand that touches hardware
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    #[arg(
        long,
        env = "SENSOR_EXPORTER_I2C_BUS",
        value_hint = clap::ValueHint::FilePath,
        default_value = "/dev/i2c-1",
        help = "I2C bus device the sensor is attached to"
    )]
    pub i2c_bus: PathBuf,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_I2C_ADDRESS",
        default_value = "0x76",
        value_parser = parse_i2c_address,
        help = "7-bit I2C address of the sensor, hex (0x76) or decimal (118)"
    )]
    pub i2c_address: u8,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_FAKE_SENSOR",
        default_value_t = false,
        help = "Use an in-memory sensor with constant readings instead of hardware"
    )]
    pub fake_sensor: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
}

fn parse_i2c_address(value: &str) -> Result<u8, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    }
    .map_err(|e| format!("invalid I2C address `{value}`: {e}"))?;

    if parsed > 0x7f {
        return Err(format!("I2C address `{value}` does not fit in 7 bits"));
    }
    Ok(parsed)
}
