//! Demo configuration.
//!
//! Defaults can be overridden from the environment:
//!
//! | Variable         | Example      | Field            |
//! |------------------|--------------|------------------|
//! | `TESSERA_DEMO`   | `parallax`   | [`DemoConfig::demo`] |
//! | `TESSERA_INPUT`  | `x11`        | [`DemoConfig::input`] |
//! | `TESSERA_FRAMES` | `600`        | [`DemoConfig::frames`] |
//! | `TESSERA_SIZE`   | `1280x720`   | [`DemoConfig::width`], [`DemoConfig::height`] |
//! | `TESSERA_LOG`    | `tessera=debug` | [`DemoConfig::log_filter`] |
//! | `TESSERA_WINDOW` | `1`          | [`DemoConfig::windowed`] |

use std::fmt;
use std::str::FromStr;

use cgmath::Vector4;

use crate::error::ConfigError;
use crate::input::InputBackendKind;

/// Demo scenes shipped with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoKind {
    #[default]
    EnvSphere,
    NormalMap,
    Parallax,
    Fractal,
}

impl DemoKind {
    pub const ALL: [DemoKind; 4] = [
        DemoKind::EnvSphere,
        DemoKind::NormalMap,
        DemoKind::Parallax,
        DemoKind::Fractal,
    ];
}

impl FromStr for DemoKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "env-sphere" | "envmap" => Ok(Self::EnvSphere),
            "normal-map" | "bump" => Ok(Self::NormalMap),
            "parallax" => Ok(Self::Parallax),
            "fractal" => Ok(Self::Fractal),
            _ => Err(ConfigError::UnknownDemo(s.to_string())),
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnvSphere => "env-sphere",
            Self::NormalMap => "normal-map",
            Self::Parallax => "parallax",
            Self::Fractal => "fractal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub demo: DemoKind,
    pub input: InputBackendKind,
    pub background: Vector4<f32>,
    /// Frames to run headless. Ignored when windowed.
    pub frames: u32,
    pub width: u32,
    pub height: u32,
    pub sphere_stacks: u32,
    pub sphere_slices: u32,
    /// Resource name the environment cube map is registered under.
    pub environment: String,
    pub log_filter: Option<String>,
    /// Open a window for input and the caption instead of running headless.
    pub windowed: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            input: InputBackendKind::default(),
            background: Vector4::new(0.1, 0.1, 0.15, 1.0),
            frames: 120,
            width: 640,
            height: 480,
            sphere_stacks: 16,
            sphere_slices: 16,
            environment: "environment".to_string(),
            log_filter: None,
            windowed: false,
        }
    }
}

impl DemoConfig {
    /// Defaults overlaid with `TESSERA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(demo) = lookup("TESSERA_DEMO") {
            config.demo = demo.parse()?;
        }
        if let Some(input) = lookup("TESSERA_INPUT") {
            config.input = input.parse()?;
        }
        if let Some(frames) = lookup("TESSERA_FRAMES") {
            config.frames = frames
                .trim()
                .parse()
                .map_err(|_| invalid("TESSERA_FRAMES", &frames))?;
        }
        if let Some(size) = lookup("TESSERA_SIZE") {
            let (width, height) = parse_size(&size).ok_or_else(|| invalid("TESSERA_SIZE", &size))?;
            config.width = width;
            config.height = height;
        }
        if let Some(filter) = lookup("TESSERA_LOG") {
            config.log_filter = Some(filter);
        }
        if let Some(window) = lookup("TESSERA_WINDOW") {
            config.windowed = match window.trim() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(invalid("TESSERA_WINDOW", &window)),
            };
        }

        Ok(config)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once(['x', 'X'])?;
    let width = w.trim().parse().ok().filter(|&w: &u32| w > 0)?;
    let height = h.trim().parse().ok().filter(|&h: &u32| h > 0)?;
    Some((width, height))
}
