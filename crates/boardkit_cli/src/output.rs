//! Renderers turning a compiled [`ConstraintSet`] into toolchain input.
//!
//! The constraint compiler is toolchain-neutral; this module owns the Xilinx
//! design constraints (XDC) syntax, the JSON form and a plain pin table.

use boardkit_constraints::ConstraintSet;
use boardkit_platform::Device;

use crate::OutputFormat;

/// Renders `set` in the requested format.
///
/// `source` names the bindings file the set was compiled from.
pub fn render(
    format: OutputFormat,
    set: &ConstraintSet,
    device: &Device,
    source: &str,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Xdc => Ok(render_xdc(set, device, source)),
        OutputFormat::Json => serde_json::to_string_pretty(set).map(|json| json + "\n"),
        OutputFormat::Table => Ok(render_table(set)),
    }
}

/// Renders XDC: pin locations, then attributes, then clocks.
///
/// Each leg of a differential pair is its own port with its own location.
pub fn render_xdc(set: &ConstraintSet, device: &Device, source: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("## Generated by boardkit from {source}\n"));
    out.push_str(&format!("## Device: {device}\n"));

    for record in set {
        let port = record.port_name();
        out.push('\n');
        out.push_str(&format!("set_property LOC {} [get_ports {{{port}}}]\n", record.pin));
        for (key, value) in record.attrs.iter() {
            out.push_str(&format!("set_property {key} {value} [get_ports {{{port}}}]\n"));
        }
    }

    let clocks = set.clocks();
    if !clocks.is_empty() {
        out.push('\n');
    }
    for (port, frequency) in clocks {
        out.push_str(&format!(
            "create_clock -name {} -period {:.3} [get_ports {{{port}}}]\n",
            clock_name(&port),
            frequency.period_ns()
        ));
    }
    out
}

/// Renders an aligned `port pin dir iostandard clock` table.
pub fn render_table(set: &ConstraintSet) -> String {
    let rows: Vec<[String; 5]> = set
        .records()
        .iter()
        .map(|r| {
            [
                r.port_name(),
                r.pin.to_string(),
                r.direction.to_string(),
                r.attrs
                    .io_standard()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "-".to_string()),
                r.clock.map(|f| f.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    let header = ["PORT", "PIN", "DIR", "IOSTANDARD", "CLOCK"].map(str::to_string);
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Clock object names cannot carry bus brackets.
fn clock_name(port: &str) -> String {
    port.replace('[', "_").replace(']', "")
}
