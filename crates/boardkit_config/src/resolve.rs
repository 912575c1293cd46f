//! Lowering of parsed configuration tables into platform declarations.

use crate::error::ConfigError;
use crate::types::{
    BindingsConfig, BoardConfig, ConnRef, ConnectorConfig, PresetConfig, PresetKind,
    SignalConfig, SubsignalConfig,
};
use boardkit_common::Frequency;
use boardkit_constraints::{BindingRequest, ResourceRef};
use boardkit_platform::presets::{self, PresetOptions};
use boardkit_platform::{
    Attrs, Clock, Connector, ConnectorKey, Device, Direction, IoBinding, Platform,
    PlatformBuilder, Resource, Subsignal,
};
use std::collections::BTreeMap;

/// Builds and validates the platform a board file describes.
///
/// Resources are added first in file order, then presets, then connectors.
pub fn resolve_board(config: &BoardConfig) -> Result<Platform, ConfigError> {
    let device = &config.device;
    for (field, value) in [
        ("device.part", &device.part),
        ("device.package", &device.package),
        ("device.speed", &device.speed),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }

    let mut builder = PlatformBuilder::new(Device::new(&device.part, &device.package, &device.speed))
        .default_attrs(attrs(&config.defaults.attrs))
        .pin_conflicts(config.defaults.pin_conflicts);
    if let Some(clock) = &config.defaults.clock {
        builder = builder.default_clock(clock.as_str());
    }
    if let Some(reset) = &config.defaults.reset {
        builder = builder.default_reset(reset.as_str());
    }

    let mut resources = Vec::new();
    for cfg in &config.resources {
        resources.push(resolve_resource(&cfg.name, cfg.number, &cfg.signal)?);
    }
    for cfg in &config.presets {
        let first = match cfg.number {
            Some(number) => number,
            None => next_number(&resources, cfg.kind.resource_name())?,
        };
        resources.extend(resolve_preset(cfg, first)?);
    }
    builder = builder.resources(resources);

    for cfg in &config.connectors {
        builder = builder.connector(resolve_connector(cfg)?);
    }

    Ok(builder.build()?)
}

/// Presets without a number continue after the family's highest one.
fn next_number(resources: &[Resource], name: &str) -> Result<u32, ConfigError> {
    let highest = resources
        .iter()
        .filter(|r| r.name() == name)
        .filter_map(Resource::number)
        .max();
    match highest {
        None => Ok(0),
        Some(n) => n.checked_add(1).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "cannot number '{name}' preset after {name}#{n}; give it an explicit number"
            ))
        }),
    }
}

/// Converts a bindings file into an ordered binding request.
pub fn resolve_bindings(config: &BindingsConfig) -> Result<BindingRequest, ConfigError> {
    let mut request = BindingRequest::new();
    for bind in &config.binds {
        if bind.signal.trim().is_empty() {
            return Err(ConfigError::MissingField("bind.signal".to_string()));
        }
        if bind.resource.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "bind.resource (signal '{}')",
                bind.signal
            )));
        }
        let mut target = ResourceRef::new(bind.resource.as_str(), bind.number);
        if let Some(path) = &bind.subsignal {
            if path.split('.').any(str::is_empty) {
                return Err(ConfigError::ValidationError(format!(
                    "signal '{}': malformed subsignal path '{path}'",
                    bind.signal
                )));
            }
            target = target.subsignal(path.as_str());
        }
        request.push(bind.signal.as_str(), target);
    }
    Ok(request)
}

fn attrs(map: &BTreeMap<String, String>) -> Attrs {
    map.iter().map(|(k, v)| (k.as_str(), v.clone())).collect()
}

fn conn_key(conn: &ConnRef) -> ConnectorKey {
    ConnectorKey::new(conn.name.as_str(), conn.number)
}

enum Lowered {
    Leaf(IoBinding),
    Bundle(Vec<Subsignal>),
}

fn resolve_resource(
    name: &str,
    number: Option<u32>,
    cfg: &SignalConfig,
) -> Result<Resource, ConfigError> {
    let ctx = match number {
        Some(n) => format!("resource '{name}#{n}'"),
        None => format!("resource '{name}'"),
    };
    let res = match lower_signal(&ctx, cfg)? {
        Lowered::Leaf(io) => Resource::new(name, number, io)?,
        Lowered::Bundle(children) => Resource::bundle(name, number, children)?,
    };
    Ok(res.with_attrs(attrs(&cfg.attrs)))
}

fn resolve_subsignal(parent: &str, cfg: &SubsignalConfig) -> Result<Subsignal, ConfigError> {
    let ctx = format!("{parent} / subsignal '{}'", cfg.name);
    let sub = match lower_signal(&ctx, &cfg.signal)? {
        Lowered::Leaf(io) => Subsignal::new(cfg.name.as_str(), io)?,
        Lowered::Bundle(children) => Subsignal::bundle(cfg.name.as_str(), children)?,
    };
    Ok(sub.with_attrs(attrs(&cfg.signal.attrs)))
}

fn lower_signal(ctx: &str, cfg: &SignalConfig) -> Result<Lowered, ConfigError> {
    let dir = cfg.dir.unwrap_or(Direction::InOut);
    let io = match (&cfg.pins, &cfg.diff, cfg.subsignals.is_empty()) {
        (Some(pins), None, true) => IoBinding::pins(pins, dir)?,
        (None, Some(diff), true) => IoBinding::diff_pairs(&diff.p, &diff.n, dir)?,
        (None, None, false) => {
            let leaf_only = [
                ("dir", cfg.dir.is_some()),
                ("invert", cfg.invert),
                ("conn", cfg.conn.is_some()),
                ("clock", cfg.clock.is_some()),
            ];
            if let Some((field, _)) = leaf_only.iter().find(|(_, set)| *set) {
                return Err(ConfigError::ValidationError(format!(
                    "{ctx}: '{field}' is only allowed on signals with pins"
                )));
            }
            let children = cfg
                .subsignals
                .iter()
                .map(|sub| resolve_subsignal(ctx, sub))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Lowered::Bundle(children));
        }
        (None, None, true) => {
            return Err(ConfigError::MissingField(format!(
                "{ctx}: one of pins, diff or subsignal"
            )));
        }
        _ => {
            return Err(ConfigError::ValidationError(format!(
                "{ctx}: declare exactly one of pins, diff or subsignal"
            )));
        }
    };

    let mut io = io.with_invert(cfg.invert);
    if let Some(conn) = &cfg.conn {
        io = io.with_conn(conn_key(conn));
    }
    if let Some(clock) = &cfg.clock {
        let frequency: Frequency = clock
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("{ctx}: {e}")))?;
        io = io.with_clock(Clock::new(frequency));
    }
    Ok(Lowered::Leaf(io))
}

fn resolve_preset(cfg: &PresetConfig, first_number: u32) -> Result<Vec<Resource>, ConfigError> {
    let opts = PresetOptions {
        first_number,
        invert: cfg.invert,
        conn: cfg.conn.as_ref().map(conn_key),
        attrs: attrs(&cfg.attrs),
    };
    let ctx = format!("preset '{}'", cfg.kind.resource_name());
    let required = |field: &'static str, value: &Option<String>| {
        value
            .clone()
            .ok_or_else(|| ConfigError::MissingField(format!("{ctx}.{field}")))
    };

    let resources = match cfg.kind {
        PresetKind::Buttons => presets::button_resources(&required("pins", &cfg.pins)?, &opts)?,
        PresetKind::Leds => presets::led_resources(&required("pins", &cfg.pins)?, &opts)?,
        PresetKind::Switches => presets::switch_resources(&required("pins", &cfg.pins)?, &opts)?,
        PresetKind::RgbLed => vec![presets::rgb_led_resource(
            &required("r", &cfg.r)?,
            &required("g", &cfg.g)?,
            &required("b", &cfg.b)?,
            &opts,
        )?],
    };
    Ok(resources)
}

fn resolve_connector(cfg: &ConnectorConfig) -> Result<Connector, ConfigError> {
    let connector = match (&cfg.pins, cfg.named.is_empty()) {
        (Some(pins), true) => Connector::positional(&cfg.name, cfg.number, pins)?,
        (None, false) => Connector::named(
            &cfg.name,
            cfg.number,
            cfg.named.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )?,
        (None, true) => {
            return Err(ConfigError::MissingField(format!(
                "connector '{}#{}': pins or named",
                cfg.name, cfg.number
            )));
        }
        (Some(_), false) => {
            return Err(ConfigError::ValidationError(format!(
                "connector '{}#{}' declares both pins and named",
                cfg.name, cfg.number
            )));
        }
    };
    Ok(connector)
}
