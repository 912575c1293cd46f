//! `boardkit resources`: lists what a board declares.

use boardkit_platform::{Connector, ConnectorPins, IoBinding, PinSource, Platform, Resource, SignalShape};

use crate::pipeline::{report, resolve_board_path, summary};
use crate::{GlobalArgs, ReportFormat, ResourcesArgs};

/// Runs the `boardkit resources` command.
pub fn run(args: &ResourcesArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = resolve_board_path(args.board.as_deref(), global);
    let platform = match boardkit_config::load_board(&path) {
        Ok(platform) => platform,
        Err(err) => {
            let diagnostics = [err.to_diagnostic().at(path.display().to_string())];
            report(&diagnostics, global);
            summary(&diagnostics, global);
            return Ok(1);
        }
    };

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&platform, global.verbose)),
        ReportFormat::Json => println!("{}", render_json(&platform)?),
    }
    Ok(0)
}

fn render_json(platform: &Platform) -> Result<String, serde_json::Error> {
    let listing = serde_json::json!({
        "device": platform.device(),
        "default_clock": platform.default_clk(),
        "default_reset": platform.default_rst(),
        "default_attrs": platform.default_attrs(),
        "resources": platform.resources(),
        "connectors": platform.connectors(),
    });
    serde_json::to_string_pretty(&listing)
}

fn render_text(platform: &Platform, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("Board {}\n", platform.device()));
    if let Some(clk) = platform.default_clk() {
        out.push_str(&format!("  default clock: {clk}\n"));
    }
    if let Some(rst) = platform.default_rst() {
        out.push_str(&format!("  default reset: {rst}\n"));
    }

    let keys: Vec<String> = platform.resources().iter().map(|r| r.key().to_string()).collect();
    let width = keys.iter().map(String::len).max().unwrap_or(0);
    out.push_str(&format!("\nResources ({}):\n", keys.len()));
    for (resource, key) in platform.resources().iter().zip(&keys) {
        out.push_str(&format!("  {key:<width$}  {}\n", describe_resource(resource)));
        if verbose {
            for leaf in resource.leaves() {
                if leaf.path.is_empty() {
                    continue;
                }
                let path = leaf.path.join(".");
                out.push_str(&format!("    {path:<20}  {}\n", describe_io(leaf.io)));
            }
        }
    }

    let keys: Vec<String> = platform.connectors().iter().map(|c| c.key().to_string()).collect();
    let width = keys.iter().map(String::len).max().unwrap_or(0);
    out.push_str(&format!("\nConnectors ({}):\n", keys.len()));
    for (connector, key) in platform.connectors().iter().zip(&keys) {
        out.push_str(&format!("  {key:<width$}  {}\n", describe_connector(connector)));
        if verbose {
            for (name, pin) in connector.connected() {
                out.push_str(&format!("    {name:<8} {pin}\n"));
            }
        }
    }
    out
}

fn describe_resource(resource: &Resource) -> String {
    match resource.shape() {
        SignalShape::Leaf(io) => describe_io(io),
        SignalShape::Bundle(children) => {
            let names: Vec<&str> = children.iter().map(|c| c.name()).collect();
            format!("{{ {} }}", names.join(", "))
        }
    }
}

fn describe_io(io: &IoBinding) -> String {
    let mut text = match io.source() {
        PinSource::Pins(expr) => format!("{:<5} {expr}", io.dir().to_string()),
        PinSource::DiffPairs(pairs) => {
            format!("{:<5} p: {} n: {}", io.dir().to_string(), pairs.p(), pairs.n())
        }
    };
    if io.is_inverted() {
        text.push_str(" (inverted)");
    }
    if let Some(conn) = io.conn() {
        text.push_str(&format!(" via {conn}"));
    }
    if let Some(clock) = io.clock() {
        text.push_str(&format!(" @ {}", clock.frequency));
    }
    text
}

fn describe_connector(connector: &Connector) -> String {
    let (kind, total) = match connector.pins() {
        ConnectorPins::Positional(expr) => ("positional", expr.width()),
        ConnectorPins::Named(map) => ("named", map.len()),
    };
    format!("{kind}, {}/{total} pin(s) connected", connector.connected().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardkit_config::load_board_from_str;

    const BOARD: &str = r#"
[device]
part = "xc7z007s"
package = "clg400"
speed = "1"

[defaults]
clock = "clk"

[[resource]]
name = "clk"
pins = "H16"
dir = "i"
clock = "125MHz"

[[resource]]
name = "ddr3"
number = 0

[[resource.subsignal]]
name = "clk"
diff = { p = "L2", n = "M2" }
dir = "o"

[[resource.subsignal]]
name = "we"
pins = "L16"
dir = "o"
invert = true

[[connector]]
name = "pmod"
number = 0
pins = "Y18 Y19 - -"
"#;

    fn platform() -> Platform {
        load_board_from_str(BOARD).unwrap()
    }

    #[test]
    fn text_lists_resources_and_connectors() {
        let text = render_text(&platform(), false);
        assert!(text.starts_with("Board xc7z007sclg400-1\n  default clock: clk\n"));
        assert!(text.contains("Resources (2):\n  clk     in    H16 @ 125MHz\n"));
        assert!(text.contains("  ddr3#0  { clk, we }\n"));
        assert!(text.contains("Connectors (1):\n  pmod#0  positional, 2/4 pin(s) connected\n"));
        assert!(!text.contains("Y18"));
    }

    #[test]
    fn verbose_text_shows_leaves_and_connector_pins() {
        let text = render_text(&platform(), true);
        assert!(text.contains("    clk                   out   p: L2 n: M2\n"));
        assert!(text.contains("    we                    out   L16 (inverted)\n"));
        assert!(text.contains("    2        Y19\n"));
    }

    #[test]
    fn describe_io_suffixes() {
        let platform = platform();
        let clk = platform.resources()[0].leaves();
        assert_eq!(describe_io(clk[0].io), "in    H16 @ 125MHz");
        let ddr = platform.resources()[1].leaves();
        assert_eq!(describe_io(ddr[1].io), "out   L16 (inverted)");
    }

    #[test]
    fn json_listing() {
        let json = render_json(&platform()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["default_clock"], "clk");
        assert_eq!(value["default_reset"], serde_json::Value::Null);
        assert_eq!(value["resources"].as_array().unwrap().len(), 2);
        assert_eq!(value["connectors"][0]["key"]["name"], "pmod");
    }
}
