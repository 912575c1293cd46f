//! The constraint compiler.
//!
//! For each binding, in order:
//!
//! 1. resolve `(name, number, subsignal)` to a resource and the leaves below
//!    the requested path;
//! 2. resolve each leaf's pins to absolute board pins, following one level of
//!    connector indirection;
//! 3. merge attributes from the platform defaults down to the leaf;
//! 4. emit one record per pin, positive leg before negative for
//!    differential pairs.
//!
//! Non-fatal findings are collected while compiling and reported to the
//! [`DiagnosticSink`] only once the whole request has compiled.

use crate::error::CompileError;
use crate::record::{ConstraintRecord, ConstraintSet, DiffLeg};
use crate::request::{Binding, BindingRequest};
use boardkit_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use boardkit_platform::{
    AttrValue, Attrs, Direction, IoBinding, Leaf, PinId, PinSource, Platform, ResourceKey,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::iter;

/// A compiled pin has no `IOSTANDARD` after attribute merging.
pub const MISSING_IOSTANDARD: DiagnosticCode = DiagnosticCode::new(Category::Warning, 1);
/// A differential standard on a single-ended pin, or the reverse.
pub const STANDARD_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Warning, 2);
/// A clock annotation on a signal compiled as an output.
pub const CLOCK_ON_OUTPUT: DiagnosticCode = DiagnosticCode::new(Category::Timing, 1);

/// Compiles `request` against `platform`.
///
/// Returns every constraint record in binding order, or the first error
/// encountered. Warnings go to `sink`, and only on success.
pub fn compile(
    platform: &Platform,
    request: &BindingRequest,
    sink: &DiagnosticSink,
) -> Result<ConstraintSet, CompileError> {
    let mut compiler = Compiler::new(platform);
    for binding in request.bindings() {
        compiler.bind(binding)?;
    }
    sink.extend(compiler.warnings);
    Ok(ConstraintSet::new(compiler.records))
}

struct Claim<'a> {
    key: &'a ResourceKey,
    path: Vec<&'a str>,
    signal: &'a str,
}

struct Compiler<'a> {
    platform: &'a Platform,
    claims: Vec<Claim<'a>>,
    directions: HashMap<String, Direction>,
    ports: HashMap<String, PinId>,
    records: Vec<ConstraintRecord>,
    warnings: Vec<Diagnostic>,
}

impl<'a> Compiler<'a> {
    fn new(platform: &'a Platform) -> Self {
        Self {
            platform,
            claims: Vec::new(),
            directions: HashMap::new(),
            ports: HashMap::new(),
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn bind(&mut self, binding: &'a Binding) -> Result<(), CompileError> {
        let target = &binding.target;
        let platform = self.platform;
        let resource = platform
            .lookup(&target.name, target.number)
            .ok_or_else(|| CompileError::UnknownResource {
                resource: ResourceKey::new(target.name.as_str(), target.number).to_string(),
                signal: binding.signal.clone(),
            })?;

        let path = target.path();
        let leaves = resource
            .leaves_at(&path)
            .ok_or_else(|| CompileError::UnknownSubsignal {
                resource: resource.key().to_string(),
                subsignal: target.subsignal.clone().unwrap_or_default(),
            })?;

        // Two requests overlap when one path is a prefix of the other.
        if let Some(prev) = self.claims.iter().find(|c| {
            let n = c.path.len().min(path.len());
            c.key == resource.key() && c.path[..n] == path[..n]
        }) {
            return Err(CompileError::ResourceAlreadyRequested {
                resource: target.to_string(),
                previous: prev.signal.to_string(),
            });
        }
        self.claims.push(Claim {
            key: resource.key(),
            path: path.clone(),
            signal: &binding.signal,
        });

        for leaf in &leaves {
            let mut signal = binding.signal.clone();
            for segment in &leaf.path[path.len()..] {
                signal.push_str("__");
                signal.push_str(segment);
            }
            self.compile_leaf(signal, resource.key(), leaf)?;
        }
        Ok(())
    }

    fn compile_leaf(
        &mut self,
        signal: String,
        key: &ResourceKey,
        leaf: &Leaf<'_>,
    ) -> Result<(), CompileError> {
        let io = leaf.io;
        let dir = io.dir();
        match self.directions.get(&signal) {
            Some(&first) if !first.can_share_with(dir) => {
                return Err(CompileError::DirectionConflict {
                    signal,
                    first,
                    second: dir,
                });
            }
            Some(_) => {}
            None => {
                self.directions.insert(signal.clone(), dir);
            }
        }

        let attrs = Attrs::merge_chain(
            iter::once(self.platform.default_attrs()).chain(leaf.attrs.iter().copied()),
        );
        let location = if leaf.path.is_empty() {
            format!("resource '{key}'")
        } else {
            format!("resource '{key}' / subsignal '{}'", leaf.path.join("."))
        };
        self.check_leaf(&signal, &location, io, &attrs);

        let clock = io.clock().map(|c| c.frequency);
        let width = io.width();
        let bit = |i: usize| (width > 1).then_some(i as u32);
        let record = |pin: PinId, i: usize, diff: Option<DiffLeg>| ConstraintRecord {
            pin,
            signal: signal.clone(),
            bit: bit(i),
            direction: dir,
            attrs: attrs.clone(),
            clock,
            inverted: io.is_inverted(),
            diff,
        };

        let mut out = Vec::with_capacity(width * 2);
        match io.source() {
            PinSource::Pins(expr) => {
                for (i, slot) in expr.slots().iter().enumerate() {
                    let pin = self.resolve(&signal, io, i, slot.as_ref())?;
                    out.push(record(pin, i, None));
                }
            }
            PinSource::DiffPairs(pairs) => {
                for (i, (p, n)) in pairs.p().slots().iter().zip(pairs.n().slots()).enumerate() {
                    let p = self.resolve(&signal, io, i, p.as_ref())?;
                    let n = self.resolve(&signal, io, i, n.as_ref())?;
                    out.push(record(p, i, Some(DiffLeg::Positive)));
                    out.push(record(n, i, Some(DiffLeg::Negative)));
                }
            }
        }
        self.claim_ports(&out)?;
        self.records.extend(out);
        Ok(())
    }

    // Each toolchain port gets exactly one LOC.
    fn claim_ports(&mut self, records: &[ConstraintRecord]) -> Result<(), CompileError> {
        for record in records {
            match self.ports.entry(record.port_name()) {
                Entry::Occupied(entry) => {
                    return Err(CompileError::PortConflict {
                        port: entry.key().clone(),
                        first: entry.get().to_string(),
                        second: record.pin.to_string(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(record.pin.clone());
                }
            }
        }
        Ok(())
    }

    fn resolve(
        &self,
        signal: &str,
        io: &IoBinding,
        bit: usize,
        slot: Option<&PinId>,
    ) -> Result<PinId, CompileError> {
        let Some(token) = slot else {
            return Err(CompileError::UnconnectedPin {
                signal: signal.to_string(),
                bit: bit as u32,
            });
        };
        let Some(key) = io.conn() else {
            return Ok(token.clone());
        };
        match self.platform.connector(key).and_then(|c| c.lookup(token.as_str())) {
            Some(Some(pin)) => Ok(pin.clone()),
            _ => Err(CompileError::UnresolvedConnectorRef {
                signal: signal.to_string(),
                connector: key.to_string(),
                pin: token.to_string(),
            }),
        }
    }

    fn check_leaf(&mut self, signal: &str, location: &str, io: &IoBinding, attrs: &Attrs) {
        match attrs.io_standard().and_then(AttrValue::as_standard) {
            Some(std) if std.is_differential() != io.is_differential() => {
                let kind = if io.is_differential() {
                    "differential"
                } else {
                    "single-ended"
                };
                self.warnings.push(
                    Diagnostic::warning(
                        STANDARD_MISMATCH,
                        format!("signal '{signal}' is {kind} but uses IOSTANDARD {std}"),
                    )
                    .at(location),
                );
            }
            _ => {}
        }
        if attrs.io_standard().is_none() {
            self.warnings.push(
                Diagnostic::warning(
                    MISSING_IOSTANDARD,
                    format!("signal '{signal}' has no IOSTANDARD"),
                )
                .at(location)
                .with_help("set IOSTANDARD on the resource or in the board's default attributes"),
            );
        }
        if io.clock().is_some() && io.dir() == Direction::Out {
            self.warnings.push(
                Diagnostic::warning(
                    CLOCK_ON_OUTPUT,
                    format!("clock annotation on output signal '{signal}' is ignored by timing"),
                )
                .at(location),
            );
        }
    }
}
