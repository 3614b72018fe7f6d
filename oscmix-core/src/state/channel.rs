use serde::Serialize;

use oscmix_types::{AudioAttrs, ChannelKey, NodeLifecycle, Rgba, WaveKind};

use crate::audio::AudioNode;

/// Static description of a channel, as read from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub key: ChannelKey,
    pub wave: WaveKind,
    pub name: Option<String>,
    pub color: Rgba,
}

impl ChannelSpec {
    pub fn new(key: impl Into<ChannelKey>, wave: WaveKind) -> Self {
        Self {
            key: key.into(),
            wave,
            name: None,
            color: Rgba::default(),
        }
    }

    /// One channel per wave kind, keyed by the wave name.
    pub fn one_per_wave() -> Vec<ChannelSpec> {
        WaveKind::ALL
            .iter()
            .map(|wave| ChannelSpec::new(wave.as_str(), *wave))
            .collect()
    }
}

/// One audio voice and its node.
pub struct Channel {
    id: ChannelKey,
    display_name: String,
    wave: WaveKind,
    color: Rgba,
    pub(crate) audio_attrs: AudioAttrs,
    pub(crate) node: Option<Box<dyn AudioNode>>,
}

impl Channel {
    pub(crate) fn new(spec: ChannelSpec, audio_attrs: AudioAttrs) -> Self {
        let display_name = spec.name.unwrap_or_else(|| spec.wave.as_str().to_string());
        Self {
            id: spec.key,
            display_name,
            wave: spec.wave,
            color: spec.color,
            audio_attrs,
            node: None,
        }
    }

    pub fn id(&self) -> &ChannelKey {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn wave(&self) -> WaveKind {
        self.wave
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn audio_attrs(&self) -> AudioAttrs {
        self.audio_attrs
    }

    pub fn lifecycle(&self) -> NodeLifecycle {
        match &self.node {
            None => NodeLifecycle::Uninitialized,
            Some(node) if node.started() => NodeLifecycle::Started,
            Some(_) => NodeLifecycle::Ready,
        }
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            id: self.id.clone(),
            name: self.display_name().to_string(),
            wave: self.wave,
            color: self.color(),
            volume: self.audio_attrs.volume,
            muted: self.audio_attrs.muted,
            lifecycle: self.lifecycle(),
        }
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("wave", &self.wave)
            .field("audio_attrs", &self.audio_attrs)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

/// Plain copy of a channel's observable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSnapshot {
    pub id: ChannelKey,
    pub name: String,
    pub wave: WaveKind,
    pub color: Rgba,
    pub volume: f32,
    pub muted: bool,
    pub lifecycle: NodeLifecycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uses_configured_name_and_color() {
        let spec = ChannelSpec {
            name: Some("Lead".to_string()),
            color: Rgba::opaque(0, 160, 210),
            ..ChannelSpec::new("lead", WaveKind::Sawtooth)
        };
        let channel = Channel::new(spec, AudioAttrs::default());
        let snapshot = channel.snapshot();
        assert_eq!(snapshot.name, "Lead");
        assert_eq!(snapshot.color, Rgba::opaque(0, 160, 210));
        assert_eq!(snapshot.lifecycle, NodeLifecycle::Uninitialized);
    }

    #[test]
    fn display_name_falls_back_to_wave() {
        let channel = Channel::new(ChannelSpec::new("tri", WaveKind::Triangle), AudioAttrs::default());
        assert_eq!(channel.display_name(), "triangle");
        assert_eq!(channel.color(), Rgba::default());
    }
}
