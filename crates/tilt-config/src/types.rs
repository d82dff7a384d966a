use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Where orientation events come from.
    pub sensor: SensorConfig,
    /// How readings are presented.
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "tilt_app=info,tilt_orientation=info".into(),
            sensor: SensorConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// JSON events read line by line from stdin.
    Stdin,
    /// Simulated device sweeping through angles.
    Sweep,
    /// Host without orientation sensing.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub kind: SensorKind,
    /// Time between simulated events, in milliseconds.
    pub sweep_interval_ms: u64,
    /// Peak beta/gamma of the simulated sweep, in degrees.
    pub sweep_amplitude_deg: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            kind: SensorKind::Sweep,
            sweep_interval_ms: 100,
            sweep_amplitude_deg: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places shown for angles.
    pub precision: i32,
    /// Relative tilt (degrees either side of the baseline) that maps to the
    /// ends of the 0..100 parallax scale. Larger tilts are clamped.
    pub tilt_range_deg: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: 1,
            tilt_range_deg: 45.0,
        }
    }
}
