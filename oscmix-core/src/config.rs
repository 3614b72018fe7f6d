use std::path::{Path, PathBuf};

use serde::Deserialize;

use oscmix_types::{ActionDefaults, AudioAttrs, ChannelKey, Rgba, WaveKind};

use crate::selector::SelectorTopics;
use crate::state::ChannelSpec;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    mixer: MixerConfig,
    #[serde(default)]
    selection: SelectionConfig,
    channels: Option<Vec<ChannelConfig>>,
}

#[derive(Deserialize, Default)]
struct MixerConfig {
    topic: Option<String>,
    default_channel: Option<String>,
    default_frequency: Option<f64>,
    mount_frequency: Option<f64>,
    initial_volume: Option<f32>,
    start_muted: Option<bool>,
}

#[derive(Deserialize, Default)]
struct SelectionConfig {
    topic: Option<String>,
    events_topic: Option<String>,
}

#[derive(Deserialize, Clone)]
struct ChannelConfig {
    key: String,
    wave: String,
    name: Option<String>,
    color: Option<[u8; 3]>,
}

pub struct Config {
    mixer: MixerConfig,
    selection: SelectionConfig,
    channels: Vec<ChannelConfig>,
}

impl Config {
    /// Embedded defaults, overridden by the user's config file if present.
    pub fn load() -> Self {
        let mut config = Self::embedded();
        if let Some(path) = user_config_path() {
            if path.exists() {
                config.merge_file(&path);
            }
        }
        config
    }

    /// Embedded defaults only.
    pub fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            mixer: base.mixer,
            selection: base.selection,
            channels: base.channels.unwrap_or_default(),
        }
    }

    /// Embedded defaults overridden by `contents`.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let user: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::embedded();
        config.merge(user);
        Ok(config)
    }

    /// Merge a config file over the current values. An unreadable or
    /// malformed file is logged and leaves the config unchanged.
    pub fn merge_file(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => self.merge(user),
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_mixer(&mut self.mixer, user.mixer);
        merge_selection(&mut self.selection, user.selection);
        if let Some(channels) = user.channels {
            self.channels = channels;
        }
    }

    /// Topic the dispatcher listens on.
    pub fn mixer_topic(&self) -> &str {
        self.mixer.topic.as_deref().unwrap_or("widget-events")
    }

    pub fn action_defaults(&self) -> ActionDefaults {
        let fallback = ActionDefaults::default();
        ActionDefaults {
            channel: self
                .mixer
                .default_channel
                .as_deref()
                .map(ChannelKey::from)
                .unwrap_or(fallback.channel),
            frequency: self
                .mixer
                .default_frequency
                .filter(|f| f.is_finite() && *f > 0.0)
                .unwrap_or(fallback.frequency),
        }
    }

    /// Frequency of the nodes created while the mixer mounts.
    pub fn mount_frequency(&self) -> f64 {
        self.mixer
            .mount_frequency
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(200.0)
    }

    /// Audio attributes every channel starts with.
    pub fn initial_attrs(&self) -> AudioAttrs {
        let fallback = AudioAttrs::default();
        AudioAttrs {
            volume: self
                .mixer
                .initial_volume
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(fallback.volume),
            muted: self.mixer.start_muted.unwrap_or(fallback.muted),
        }
    }

    pub fn selector_topics(&self) -> SelectorTopics {
        let fallback = SelectorTopics::default();
        SelectorTopics {
            selection: self.selection.topic.clone().unwrap_or(fallback.selection),
            events: self.selection.events_topic.clone().unwrap_or(fallback.events),
        }
    }

    /// Channel list in configured order. Entries with an unknown wave are skipped.
    pub fn channel_specs(&self) -> Vec<ChannelSpec> {
        self.channels
            .iter()
            .filter_map(|c| {
                let Some(wave) = WaveKind::parse(&c.wave) else {
                    log::warn!(target: "config", "channel {}: unknown wave {:?}", c.key, c.wave);
                    return None;
                };
                Some(ChannelSpec {
                    key: ChannelKey::from(c.key.as_str()),
                    wave,
                    name: c.name.clone(),
                    color: c
                        .color
                        .map(|[r, g, b]| Rgba::opaque(r, g, b))
                        .unwrap_or_default(),
                })
            })
            .collect()
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("oscmix").join("config.toml"))
}

fn merge_mixer(base: &mut MixerConfig, user: MixerConfig) {
    if user.topic.is_some() {
        base.topic = user.topic;
    }
    if user.default_channel.is_some() {
        base.default_channel = user.default_channel;
    }
    if user.default_frequency.is_some() {
        base.default_frequency = user.default_frequency;
    }
    if user.mount_frequency.is_some() {
        base.mount_frequency = user.mount_frequency;
    }
    if user.initial_volume.is_some() {
        base.initial_volume = user.initial_volume;
    }
    if user.start_muted.is_some() {
        base.start_muted = user.start_muted;
    }
}

fn merge_selection(base: &mut SelectionConfig, user: SelectionConfig) {
    if user.topic.is_some() {
        base.topic = user.topic;
    }
    if user.events_topic.is_some() {
        base.events_topic = user.events_topic;
    }
}
