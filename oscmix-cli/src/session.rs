//! A mounted mixer plus selectors, driven by script commands.

use std::io::{self, Write};

use serde::Serialize;

use oscmix_core::audio::{AudioContext, ManualContext, RecordingLog, RecordingNodeFactory};
use oscmix_core::bus::MessageBus;
use oscmix_core::config::Config;
use oscmix_core::mixer::{Mixer, MixerSettings};
use oscmix_core::selector::{mount_group, SelectorWidget};
use oscmix_types::{ChannelKey, ContextState};

use crate::script::Command;

#[derive(Serialize)]
struct WidgetStatus<'a> {
    widget: &'a ChannelKey,
    active: bool,
}

#[derive(Serialize)]
struct ContextStatus {
    context: ContextState,
    time: f64,
    nodes: usize,
}

pub struct Session {
    bus: MessageBus,
    mixer: Mixer,
    widgets: Vec<SelectorWidget>,
    context: ManualContext,
    log: RecordingLog,
}

impl Session {
    pub fn mount(config: &Config) -> Self {
        let bus = MessageBus::new();
        let context = ManualContext::new();
        let factory = RecordingNodeFactory::new();
        let log = factory.log();
        let mixer = Mixer::mount(
            &bus,
            MixerSettings::from_config(config),
            Box::new(context.clone()),
            Box::new(factory),
        );
        let widgets = mount_group(&bus, &config.selector_topics(), &config.channel_specs());
        Self {
            bus,
            mixer,
            widgets,
            context,
            log,
        }
    }

    pub fn run(&mut self, command: Command, out: &mut impl Write) -> io::Result<()> {
        match command {
            Command::Publish { topic, message } => {
                let delivery = self.bus.publish(&topic, &message);
                log::debug!(target: "bus", "{} -> {}: {:?}", message.kind, topic, delivery);
            }
            Command::Send(message) => {
                let topic = self.mixer.topic().to_string();
                self.bus.publish(&topic, &message);
            }
            Command::Click(key) => match self.widgets.iter().find(|w| *w.key() == key) {
                Some(widget) => {
                    widget.click();
                }
                None => writeln!(out, "no widget {}", key)?,
            },
            Command::Mute(key) => self.report(self.mixer.mute(&key), &key, out)?,
            Command::Unmute(key) => self.report(self.mixer.unmute(&key), &key, out)?,
            Command::Volume { key, volume } => {
                self.report(self.mixer.set_volume(&key, volume), &key, out)?
            }
            Command::Advance(seconds) => self.context.advance(seconds),
            Command::Status => self.status(out)?,
        }
        Ok(())
    }

    /// Unknown channel, missing node, rejected value or node failure.
    fn report(&self, applied: bool, key: &ChannelKey, out: &mut impl Write) -> io::Result<()> {
        if !applied {
            writeln!(out, "{}: not applied", key)?;
        }
        Ok(())
    }

    fn status(&self, out: &mut impl Write) -> io::Result<()> {
        let context = ContextStatus {
            context: self.context.state(),
            time: self.context.current_time(),
            nodes: self.log.nodes_created(),
        };
        writeln!(out, "{}", serde_json::to_string(&context)?)?;
        for snapshot in self.mixer.snapshots() {
            writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
        }
        for widget in &self.widgets {
            let status = WidgetStatus {
                widget: widget.key(),
                active: widget.is_active(),
            };
            writeln!(out, "{}", serde_json::to_string(&status)?)?;
        }
        Ok(())
    }
}
