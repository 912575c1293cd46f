//! The validated, immutable platform descriptor.

use crate::attrs::Attrs;
use crate::connector::{Connector, ConnectorKey};
use crate::resource::{Resource, ResourceKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Device identity: part, package and speed grade.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Device {
    /// Part number, e.g. `xc7z007s`.
    pub part: String,
    /// Package, e.g. `clg400`.
    pub package: String,
    /// Speed grade, e.g. `1`.
    pub speed: String,
}

impl Device {
    /// Creates a device triple.
    pub fn new(part: &str, package: &str, speed: &str) -> Self {
        Self {
            part: part.to_string(),
            package: package.to_string(),
            speed: speed.to_string(),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", self.part, self.package, self.speed)
    }
}

/// Which declarations take part in pin-conflict checking.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinConflictScope {
    /// Only pins reachable from resources (directly or through a connector).
    Resources,
    /// Resource pins plus every pin a connector exposes. A resource reaching
    /// a pin through its own connector does not conflict with that connector.
    #[default]
    ResourcesAndConnectors,
}

/// A fully validated board description.
///
/// Built once by [`PlatformBuilder`](crate::PlatformBuilder) and read-only
/// afterwards; it is `Send + Sync` and can be shared between concurrent
/// constraint compilations.
#[derive(Debug)]
pub struct Platform {
    pub(crate) device: Device,
    pub(crate) default_clk: Option<String>,
    pub(crate) default_rst: Option<String>,
    pub(crate) default_attrs: Attrs,
    pub(crate) conflict_scope: PinConflictScope,
    pub(crate) resources: Vec<Resource>,
    pub(crate) resource_index: HashMap<ResourceKey, usize>,
    pub(crate) connectors: Vec<Connector>,
    pub(crate) connector_index: HashMap<ConnectorKey, usize>,
}

impl Platform {
    /// The device triple.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Name of the default clock resource.
    pub fn default_clk(&self) -> Option<&str> {
        self.default_clk.as_deref()
    }

    /// Name of the default reset resource.
    pub fn default_rst(&self) -> Option<&str> {
        self.default_rst.as_deref()
    }

    /// Platform-wide attributes, the outermost link of every attribute chain.
    pub fn default_attrs(&self) -> &Attrs {
        &self.default_attrs
    }

    /// The pin-conflict scope the descriptor was validated with.
    pub fn conflict_scope(&self) -> PinConflictScope {
        self.conflict_scope
    }

    /// All resources in declaration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// All connectors in declaration order.
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Looks up a resource by exact key.
    pub fn resource(&self, key: &ResourceKey) -> Option<&Resource> {
        self.resource_index.get(key).map(|&i| &self.resources[i])
    }

    /// Looks up a resource by name and optional number.
    ///
    /// With no number, a singleton resource of that name is preferred and
    /// number 0 is the fallback.
    pub fn lookup(&self, name: &str, number: Option<u32>) -> Option<&Resource> {
        let exact = self.resource(&ResourceKey::new(name, number));
        match (exact, number) {
            (Some(res), _) => Some(res),
            (None, None) => self.resource(&ResourceKey::new(name, Some(0))),
            (None, Some(_)) => None,
        }
    }

    /// Looks up a connector.
    pub fn connector(&self, key: &ConnectorKey) -> Option<&Connector> {
        self.connector_index.get(key).map(|&i| &self.connectors[i])
    }

    /// The default clock resource, if one is named.
    pub fn default_clock_resource(&self) -> Option<&Resource> {
        self.default_clk().and_then(|name| self.lookup(name, None))
    }

    /// The default reset resource, if one is named.
    pub fn default_reset_resource(&self) -> Option<&Resource> {
        self.default_rst().and_then(|name| self.lookup(name, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_display() {
        assert_eq!(
            Device::new("xc7z007s", "clg400", "1").to_string(),
            "xc7z007sclg400-1"
        );
    }

    #[test]
    fn scope_default_is_union() {
        assert_eq!(
            PinConflictScope::default(),
            PinConflictScope::ResourcesAndConnectors
        );
    }

    #[test]
    fn platform_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Platform>();
    }
}
