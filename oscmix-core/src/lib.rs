//! # oscmix-core
//!
//! Channel control for the oscmix oscillator mixer: an in-process message
//! bus, the channel registry and its node lifecycle, the action dispatcher,
//! and the selector widgets' radio-group protocol. Independent of any UI
//! framework and of any concrete synthesis backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oscmix_core::audio::{ManualContext, RecordingNodeFactory};
//! use oscmix_core::bus::MessageBus;
//! use oscmix_core::config::Config;
//! use oscmix_core::mixer::{Mixer, MixerSettings};
//! use oscmix_core::selector::mount_group;
//!
//! let config = Config::load();
//! let bus = MessageBus::new();
//!
//! // 1. Mount the mixer: one node per channel, then subscribe to the mixer topic
//! let mixer = Mixer::mount(
//!     &bus,
//!     MixerSettings::from_config(&config),
//!     Box::new(ManualContext::new()),
//!     Box::new(RecordingNodeFactory::new()),
//! );
//!
//! // 2. Mount the selectors; they only talk to each other over the bus
//! let widgets = mount_group(&bus, &config.selector_topics(), &config.channel_specs());
//!
//! // 3. Drive everything with messages
//! bus.publish(mixer.topic(), &oscmix_types::Message::new("INIT"));
//! widgets[0].click();
//! ```
//!
//! ## Module Overview
//!
//! - [`bus`]: synchronous, ordered pub/sub with failure isolation
//! - [`audio`]: `AudioNode`/`NodeFactory`/`AudioContext` collaborator traits
//!   and the recording implementations used by tests and dry runs
//! - [`state`]: `Channel` records and the `ChannelRegistry`
//! - [`dispatch`]: `dispatch_action()` and the bus-facing `MixerDispatcher`
//! - [`selector`]: `SelectorWidget`, the radio-group protocol
//! - [`mixer`]: `Mixer` mount/teardown
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod audio;
pub mod bus;
pub mod config;
pub mod dispatch;
pub mod mixer;
pub mod selector;
pub mod state;
