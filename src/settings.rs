use crate::warn;
use std::{env, str::FromStr};

/// Lower bound of the pitch estimate range.
pub const PITCH_FLOOR: f32 = 0.0;
/// Upper bound of the pitch estimate range.
pub const PITCH_CEILING: f32 = 150.0;

/// Restricts a pitch value to the playable range.
pub fn clamp_pitch(pitch: f32) -> f32 { pitch.clamp(PITCH_FLOOR, PITCH_CEILING) }

/// The linear, clamped mapping from a pitch estimate to a target altitude.
///
/// The same instance is used for the intro end anchor (start note) and for
/// in-flight altitude, so both always agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightMapping {
    height_offset: f32,
    base_pitch: f32,
    sensitivity: f32,
    ground_level: f32,
    ceiling_level: f32,
}

impl HeightMapping {
    pub const fn new(
        height_offset: f32,
        base_pitch: f32,
        sensitivity: f32,
        ground_level: f32,
        ceiling_level: f32,
    ) -> Self {
        Self { height_offset, base_pitch, sensitivity, ground_level, ceiling_level }
    }

    /// Maps a pitch estimate to a target altitude.
    ///
    /// # Arguments
    /// * `pitch` - The clamped pitch estimate.
    ///
    /// # Returns
    /// `clamp((pitch + heightOffset - basePitch) * sensitivity, ground, ceiling)`.
    pub fn key_to_height(&self, pitch: f32) -> f32 {
        ((pitch + self.height_offset - self.base_pitch) * self.sensitivity)
            .clamp(self.ground_level, self.ceiling_level)
    }

    pub fn height_offset(&self) -> f32 { self.height_offset }
    pub fn ground_level(&self) -> f32 { self.ground_level }
    pub fn ceiling_level(&self) -> f32 { self.ceiling_level }
}

/// Tunables of the game. Defaults are the values the levels were authored against.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub height_offset: f32,
    pub base_pitch: f32,
    pub pitch_sensitivity: f32,
    /// Seconds per beat.
    pub time_ratio: f64,
    pub ground_level: f32,
    pub ceiling_level: f32,
    pub gravity: f32,
    pub max_spin_speed: f32,
    /// Seconds of the intro approach animation.
    pub intro_duration: f32,
    /// Allowed distance between the sung pitch and the start note.
    pub pitch_tolerance: f32,
    /// Held pitch before the first estimate arrives.
    pub initial_pitch: f32,
    pub sample_rate: u32,
    pub buffer_size: usize,
    pub trill_port: u16,
    pub level_file: String,
    pub frame_rate: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            height_offset: 12.0,
            base_pitch: 69.0,
            pitch_sensitivity: 3.0,
            time_ratio: 0.5,
            ground_level: 0.0,
            ceiling_level: 500.0,
            gravity: 9.8,
            max_spin_speed: 10_000.0,
            intro_duration: 5.0,
            pitch_tolerance: 3.0,
            initial_pitch: 100.0,
            sample_rate: 44_100,
            buffer_size: 2048,
            trill_port: 5007,
            level_file: "Levels/game.json".to_string(),
            frame_rate: 60,
        }
    }
}

#[derive(Debug, strum_macros::Display)]
pub enum SettingsError {
    /// A numeric setting is NaN or infinite, names the setting.
    NonFinite(&'static str),
    GroundAboveCeiling,
    NonPositiveTimeRatio,
    ZeroFrameRate,
}

impl GameSettings {
    /// Builds the settings from `GLIDER_*` environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let def = Self::default();
        Self {
            height_offset: env_or("GLIDER_HEIGHT_OFFSET", def.height_offset),
            base_pitch: env_or("GLIDER_BASE_PITCH", def.base_pitch),
            pitch_sensitivity: env_or("GLIDER_PITCH_SENSITIVITY", def.pitch_sensitivity),
            time_ratio: env_or("GLIDER_TIME_RATIO", def.time_ratio),
            ground_level: env_or("GLIDER_GROUND_LEVEL", def.ground_level),
            ceiling_level: env_or("GLIDER_CEILING_LEVEL", def.ceiling_level),
            gravity: env_or("GLIDER_GRAVITY", def.gravity),
            max_spin_speed: def.max_spin_speed,
            intro_duration: env_or("GLIDER_INTRO_DURATION", def.intro_duration),
            pitch_tolerance: env_or("GLIDER_PITCH_TOLERANCE", def.pitch_tolerance),
            initial_pitch: def.initial_pitch,
            sample_rate: env_or("GLIDER_SAMPLE_RATE", def.sample_rate),
            buffer_size: env_or("GLIDER_BUFFER_SIZE", def.buffer_size),
            trill_port: env_or("GLIDER_TRILL_PORT", def.trill_port),
            level_file: env::var("GLIDER_LEVEL_FILE").unwrap_or(def.level_file),
            frame_rate: env_or("GLIDER_FRAME_RATE", def.frame_rate),
        }
    }

    /// Checks the settings the game cannot run with.
    ///
    /// # Returns
    /// The first problem found: a non-finite number, an inverted height range,
    /// a non-positive time ratio or a zero frame rate.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let numbers = [
            ("height_offset", self.height_offset),
            ("base_pitch", self.base_pitch),
            ("pitch_sensitivity", self.pitch_sensitivity),
            ("ground_level", self.ground_level),
            ("ceiling_level", self.ceiling_level),
            ("gravity", self.gravity),
            ("intro_duration", self.intro_duration),
            ("pitch_tolerance", self.pitch_tolerance),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SettingsError::NonFinite(*name));
        }
        if !self.time_ratio.is_finite() {
            return Err(SettingsError::NonFinite("time_ratio"));
        }
        if self.ground_level > self.ceiling_level {
            return Err(SettingsError::GroundAboveCeiling);
        }
        if self.time_ratio <= 0.0 {
            return Err(SettingsError::NonPositiveTimeRatio);
        }
        if self.frame_rate == 0 {
            return Err(SettingsError::ZeroFrameRate);
        }
        Ok(())
    }

    pub fn height_mapping(&self) -> HeightMapping {
        HeightMapping::new(
            self.height_offset,
            self.base_pitch,
            self.pitch_sensitivity,
            self.ground_level,
            self.ceiling_level,
        )
    }

    /// Hop size handed to the pitch detector.
    pub fn hop_size(&self) -> usize { self.buffer_size / 2 }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable value '{raw}' for {key}");
            default
        }),
        Err(_) => default,
    }
}
