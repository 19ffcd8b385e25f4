//! Configuration models and loaders for the cannon range.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Projectile type parsed from catalog files.
#[derive(Debug, Deserialize, Clone)]
pub struct ProjectileConfig {
    pub name: String,
    pub mass_kg: f64,
    pub diameter_m: f64,
    pub drag_coefficient: f64,
    #[serde(default)]
    pub mass_range: Option<[f64; 2]>,
    #[serde(default)]
    pub diameter_range: Option<[f64; 2]>,
}

/// Target zone placement on the ground.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TargetConfig {
    pub center_x_m: f64,
    pub half_width_m: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            center_x_m: 15.0,
            half_width_m: 1.5,
        }
    }
}

/// Constants the simulation core consumes. Every field has a default so a
/// settings file only needs to list what it overrides.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub gravity_m_s2: f64,
    pub gravity_range: [f64; 2],
    pub sampling_interval_s: f64,
    pub micro_step_s: f64,
    pub max_trajectories: usize,
    pub max_flying_trajectories: usize,
    pub cannon_height_range: [f64; 2],
    pub cannon_angle_range: [f64; 2],
    pub launch_speed_range: [f64; 2],
    pub altitude_range: [f64; 2],
    pub normal_speed_scale: f64,
    pub slow_speed_scale: f64,
    pub step_frame_delta_s: f64,
    pub start_playing: bool,
    pub target: TargetConfig,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            gravity_m_s2: 9.81,
            gravity_range: [5.0, 20.0],
            sampling_interval_s: 0.025,
            micro_step_s: 0.001,
            max_trajectories: 5,
            max_flying_trajectories: 3,
            cannon_height_range: [0.0, 15.0],
            cannon_angle_range: [-90.0, 90.0],
            launch_speed_range: [0.0, 30.0],
            altitude_range: [0.0, 5_000.0],
            normal_speed_scale: 1.0,
            slow_speed_scale: 0.33,
            step_frame_delta_s: 0.016,
            start_playing: true,
            target: TargetConfig::default(),
        }
    }
}

impl SimulationSettings {
    /// Number of integrator micro-steps between recorded samples.
    pub fn steps_per_sample(&self) -> u32 {
        (self.sampling_interval_s / self.micro_step_s).round() as u32
    }

    /// Check internal consistency of the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.micro_step_s > 0.0) || !self.micro_step_s.is_finite() {
            return Err(ConfigError::Invalid(
                "micro_step_s must be positive".to_string(),
            ));
        }
        if !(self.sampling_interval_s >= self.micro_step_s) || !self.sampling_interval_s.is_finite()
        {
            return Err(ConfigError::Invalid(
                "sampling_interval_s must be at least one micro-step".to_string(),
            ));
        }
        let ratio = self.sampling_interval_s / self.micro_step_s;
        if ratio > f64::from(u32::MAX) {
            return Err(ConfigError::Invalid(format!(
                "sampling_interval_s spans {ratio:.0} micro-steps (at most {})",
                u32::MAX
            )));
        }
        if (ratio - ratio.round()).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "sampling_interval_s ({}) must be a whole multiple of micro_step_s ({})",
                self.sampling_interval_s, self.micro_step_s
            )));
        }
        if self.max_trajectories == 0 {
            return Err(ConfigError::Invalid(
                "max_trajectories must be at least 1".to_string(),
            ));
        }
        if self.max_flying_trajectories == 0 || self.max_flying_trajectories > self.max_trajectories
        {
            return Err(ConfigError::Invalid(format!(
                "max_flying_trajectories must be within 1..={}",
                self.max_trajectories
            )));
        }
        for (name, range) in [
            ("gravity_range", self.gravity_range),
            ("cannon_height_range", self.cannon_height_range),
            ("cannon_angle_range", self.cannon_angle_range),
            ("launch_speed_range", self.launch_speed_range),
            ("altitude_range", self.altitude_range),
        ] {
            if !(range[0].is_finite() && range[1].is_finite() && range[0] <= range[1]) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be an ordered pair of finite numbers"
                )));
            }
        }
        if !(self.gravity_m_s2 >= self.gravity_range[0] && self.gravity_m_s2 <= self.gravity_range[1])
        {
            return Err(ConfigError::Invalid(format!(
                "gravity_m_s2 ({}) lies outside gravity_range",
                self.gravity_m_s2
            )));
        }
        for (name, scale) in [
            ("normal_speed_scale", self.normal_speed_scale),
            ("slow_speed_scale", self.slow_speed_scale),
            ("step_frame_delta_s", self.step_frame_delta_s),
        ] {
            if !(scale > 0.0) || !scale.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if !(self.target.half_width_m >= 0.0) {
            return Err(ConfigError::Invalid(
                "target.half_width_m must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Load projectile catalog entries from a YAML list, a single TOML record, or
/// a directory of TOML records.
pub fn load_projectiles<P: AsRef<Path>>(path: P) -> Result<Vec<ProjectileConfig>, ConfigError> {
    load_records(path)
}

/// Load simulation settings from a TOML or YAML file and validate them.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<SimulationSettings, ConfigError> {
    let path = path.as_ref();
    let settings: SimulationSettings = if is_toml(path) {
        toml::from_str(&std::fs::read_to_string(path)?)?
    } else {
        serde_yaml::from_reader(File::open(path)?)?
    };
    settings.validate()?;
    Ok(settings)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}
