//! Platform construction and whole-descriptor validation.

use crate::attrs::Attrs;
use crate::connector::{Connector, ConnectorKey};
use crate::error::PlatformError;
use crate::pins::{DiffPairs, PinId};
use crate::platform::{Device, PinConflictScope, Platform};
use crate::resource::{PinSource, Resource, ResourceKey};
use std::collections::HashMap;
use std::fmt;

/// Collects resource and connector declarations and validates them into a
/// [`Platform`].
///
/// ```ignore
/// let platform = PlatformBuilder::new(Device::new("xc7a35t", "csg324", "1"))
///     .resource(Resource::new("led", Some(0), IoBinding::pins("H5", Direction::Out)?)?)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct PlatformBuilder {
    device: Device,
    default_clk: Option<String>,
    default_rst: Option<String>,
    default_attrs: Attrs,
    conflict_scope: PinConflictScope,
    resources: Vec<Resource>,
    connectors: Vec<Connector>,
}

impl PlatformBuilder {
    /// Starts a description of a board carrying `device`.
    pub fn new(device: Device) -> Self {
        Self {
            device,
            default_clk: None,
            default_rst: None,
            default_attrs: Attrs::new(),
            conflict_scope: PinConflictScope::default(),
            resources: Vec::new(),
            connectors: Vec::new(),
        }
    }

    /// Names the default clock resource.
    pub fn default_clock(mut self, name: impl Into<String>) -> Self {
        self.default_clk = Some(name.into());
        self
    }

    /// Names the default reset resource.
    pub fn default_reset(mut self, name: impl Into<String>) -> Self {
        self.default_rst = Some(name.into());
        self
    }

    /// Sets platform-wide attributes.
    pub fn default_attrs(mut self, attrs: Attrs) -> Self {
        self.default_attrs = attrs;
        self
    }

    /// Chooses which declarations take part in pin-conflict checking.
    pub fn pin_conflicts(mut self, scope: PinConflictScope) -> Self {
        self.conflict_scope = scope;
        self
    }

    /// Adds a resource.
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Adds several resources in order.
    pub fn resources(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Adds a connector.
    pub fn connector(mut self, connector: Connector) -> Self {
        self.connectors.push(connector);
        self
    }

    /// Validates the declarations and builds the descriptor.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    ///
    /// 1. resource keys are unique ([`PlatformError::DuplicateResource`])
    /// 2. connector keys are unique ([`PlatformError::DuplicateConnector`])
    /// 3. no board pin is claimed twice ([`PlatformError::PinConflict`])
    /// 4. differential halves match ([`PlatformError::MalformedDiffPair`])
    /// 5. connector references resolve ([`PlatformError::UnknownConnectorPin`])
    /// 6. default clock/reset exist ([`PlatformError::UnknownDefaultResource`])
    pub fn build(self) -> Result<Platform, PlatformError> {
        let resource_index = index_resources(&self.resources)?;
        let connector_index = index_connectors(&self.connectors)?;
        check_pin_conflicts(
            &self.resources,
            &self.connectors,
            &connector_index,
            self.conflict_scope,
        )?;
        check_diff_pairs(&self.resources)?;
        check_connector_refs(&self.resources, &self.connectors, &connector_index)?;

        let platform = Platform {
            device: self.device,
            default_clk: self.default_clk,
            default_rst: self.default_rst,
            default_attrs: self.default_attrs,
            conflict_scope: self.conflict_scope,
            resources: self.resources,
            resource_index,
            connectors: self.connectors,
            connector_index,
        };

        for (role, name) in [("clock", platform.default_clk()), ("reset", platform.default_rst())] {
            if let Some(name) = name {
                if platform.lookup(name, None).is_none() {
                    return Err(PlatformError::UnknownDefaultResource {
                        role,
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(platform)
    }
}

fn index_resources(resources: &[Resource]) -> Result<HashMap<ResourceKey, usize>, PlatformError> {
    let mut index = HashMap::with_capacity(resources.len());
    for (i, res) in resources.iter().enumerate() {
        if index.insert(res.key().clone(), i).is_some() {
            return Err(PlatformError::DuplicateResource {
                key: res.key().to_string(),
            });
        }
    }
    Ok(index)
}

fn index_connectors(
    connectors: &[Connector],
) -> Result<HashMap<ConnectorKey, usize>, PlatformError> {
    let mut index = HashMap::with_capacity(connectors.len());
    for (i, conn) in connectors.iter().enumerate() {
        if index.insert(conn.key().clone(), i).is_some() {
            return Err(PlatformError::DuplicateConnector {
                key: conn.key().to_string(),
            });
        }
    }
    Ok(index)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Owner<'a> {
    Resource(&'a ResourceKey),
    Connector(&'a ConnectorKey),
}

impl fmt::Display for Owner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Resource(key) => write!(f, "resource '{key}'"),
            Owner::Connector(key) => write!(f, "connector '{key}'"),
        }
    }
}

fn conflict(pin: &PinId, first: Owner<'_>, second: Owner<'_>) -> PlatformError {
    PlatformError::PinConflict {
        pin: pin.to_string(),
        first: first.to_string(),
        second: second.to_string(),
    }
}

fn check_pin_conflicts(
    resources: &[Resource],
    connectors: &[Connector],
    connector_index: &HashMap<ConnectorKey, usize>,
    scope: PinConflictScope,
) -> Result<(), PlatformError> {
    let mut claims: HashMap<&PinId, Owner<'_>> = HashMap::new();

    if scope == PinConflictScope::ResourcesAndConnectors {
        for conn in connectors {
            let owner = Owner::Connector(conn.key());
            for (_, pin) in conn.connected() {
                if let Some(&first) = claims.get(pin) {
                    return Err(conflict(pin, first, owner));
                }
                claims.insert(pin, owner);
            }
        }
    }

    for res in resources {
        let owner = Owner::Resource(res.key());
        for leaf in res.leaves() {
            let conn = leaf
                .io
                .conn()
                .and_then(|key| connector_index.get(key).map(|&i| &connectors[i]));

            for expr in leaf.io.expressions() {
                for token in expr.pins() {
                    let (pin, via) = match (leaf.io.conn(), conn) {
                        (None, _) => (token, None),
                        (Some(key), Some(conn)) => match conn.lookup(token.as_str()) {
                            Some(Some(pin)) => (pin, Some(key)),
                            // unconnected or unknown slots are reported later
                            _ => continue,
                        },
                        (Some(_), None) => continue,
                    };

                    match claims.get(pin).copied() {
                        None => {}
                        Some(Owner::Connector(key)) if Some(key) == via => {}
                        Some(first) => return Err(conflict(pin, first, owner)),
                    }
                    claims.insert(pin, owner);
                }
            }
        }
    }

    Ok(())
}

fn check_diff_pairs(resources: &[Resource]) -> Result<(), PlatformError> {
    for res in resources {
        for leaf in res.leaves() {
            if let PinSource::DiffPairs(dp) = leaf.io.source() {
                DiffPairs::validate(dp.p(), dp.n())?;
            }
        }
    }
    Ok(())
}

fn check_connector_refs(
    resources: &[Resource],
    connectors: &[Connector],
    connector_index: &HashMap<ConnectorKey, usize>,
) -> Result<(), PlatformError> {
    for res in resources {
        for leaf in res.leaves() {
            let Some(key) = leaf.io.conn() else {
                continue;
            };
            let unknown = |pin: &str| PlatformError::UnknownConnectorPin {
                resource: res.key().to_string(),
                connector: key.to_string(),
                pin: pin.to_string(),
            };
            let conn = connector_index.get(key).map(|&i| &connectors[i]);
            for expr in leaf.io.expressions() {
                for token in expr.pins() {
                    if conn.and_then(|c| c.lookup(token.as_str())).is_none() {
                        return Err(unknown(token.as_str()));
                    }
                }
            }
        }
    }
    Ok(())
}
