//! Board and bindings file loading.

use crate::error::ConfigError;
use crate::resolve::{resolve_bindings, resolve_board};
use crate::types::{BindingsConfig, BoardConfig};
use boardkit_constraints::BindingRequest;
use boardkit_platform::Platform;
use std::path::Path;

/// Loads and validates a board definition file.
pub fn load_board(path: &Path) -> Result<Platform, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_board_from_str(&content)
}

/// Parses and validates a board definition from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_board_from_str(content: &str) -> Result<Platform, ConfigError> {
    let config: BoardConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve_board(&config)
}

/// Loads a bindings file.
pub fn load_bindings(path: &Path) -> Result<BindingRequest, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_bindings_from_str(&content)
}

/// Parses a bindings file from a string.
pub fn load_bindings_from_str(content: &str) -> Result<BindingRequest, ConfigError> {
    let config: BindingsConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve_bindings(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardkit_platform::{
        ConnectorKey, Direction, PinConflictScope, PlatformError, ResourceKey, SignalShape,
    };

    const DEVICE: &str = r#"
[device]
part = "xc7z007s"
package = "clg400"
speed = "1"
"#;

    fn board(body: &str) -> Result<Platform, ConfigError> {
        load_board_from_str(&format!("{DEVICE}{body}"))
    }

    #[test]
    fn parse_minimal_board() {
        let platform = board("").unwrap();
        assert_eq!(platform.device().to_string(), "xc7z007sclg400-1");
        assert!(platform.resources().is_empty());
        assert_eq!(
            platform.conflict_scope(),
            PinConflictScope::ResourcesAndConnectors
        );
    }

    #[test]
    fn parse_leaf_resources() {
        let platform = board(
            r#"
[defaults]
clock = "clk"
reset = "rst"

[[resource]]
name = "clk"
pins = "H16"
dir = "in"
clock = "125MHz"
attrs = { IOSTANDARD = "LVCMOS33" }

[[resource]]
name = "rst"
pins = "D9"
dir = "in"
invert = true
"#,
        )
        .unwrap();

        let clk = platform.default_clock_resource().unwrap();
        let leaf = &clk.leaves()[0];
        assert_eq!(leaf.io.dir(), Direction::In);
        assert_eq!(leaf.io.clock().unwrap().frequency.mhz(), 125.0);
        assert_eq!(clk.attrs().io_standard().unwrap().to_string(), "LVCMOS33");
        assert!(platform.default_reset_resource().unwrap().leaves()[0].io.is_inverted());
    }

    #[test]
    fn parse_nested_subsignals() {
        let platform = board(
            r#"
[[resource]]
name = "ddr3"
number = 0
attrs = { IOSTANDARD = "SSTL15" }

[[resource.subsignal]]
name = "clk"
diff = { p = "L2", n = "M2" }
dir = "o"
attrs = { IOSTANDARD = "DIFF_SSTL15" }

[[resource.subsignal]]
name = "ctl"

[[resource.subsignal.subsignal]]
name = "we"
pins = "L16"
dir = "o"
"#,
        )
        .unwrap();
        let ddr = platform.lookup("ddr3", Some(0)).unwrap();
        let paths: Vec<_> = ddr.leaves().iter().map(|l| l.path.join(".")).collect();
        assert_eq!(paths, vec!["clk", "ctl.we"]);
        assert!(ddr.leaves()[0].io.is_differential());
        assert!(matches!(ddr.shape(), SignalShape::Bundle(_)));
    }

    #[test]
    fn dir_defaults_to_inout() {
        let platform = board("[[resource]]\nname = \"gpio\"\nnumber = 0\npins = \"A1 A2\"\n").unwrap();
        let gpio = platform.lookup("gpio", Some(0)).unwrap();
        assert_eq!(gpio.leaves()[0].io.dir(), Direction::InOut);
    }

    #[test]
    fn presets_continue_numbering() {
        let platform = board(
            r#"
[[resource]]
name = "led"
number = 0
pins = "R14"
dir = "o"

[[preset]]
kind = "leds"
pins = "P14 N16"

[[preset]]
kind = "rgb_led"
r = "N15"
g = "G17"
b = "L15"

[[preset]]
kind = "rgb_led"
r = "M15"
g = "L14"
b = "G14"

[[preset]]
kind = "buttons"
pins = "D20 D19"
number = 4
"#,
        )
        .unwrap();
        let keys: Vec<_> = platform.resources().iter().map(|r| r.key().to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "led#0", "led#1", "led#2", "rgb_led#0", "rgb_led#1", "button#4", "button#5"
            ]
        );
    }

    #[test]
    fn preset_after_last_number_is_rejected() {
        let err = board(
            r#"
[[resource]]
name = "led"
number = 4294967295
pins = "R14"
dir = "o"

[[preset]]
kind = "leds"
pins = "P14"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("led#4294967295")));
        assert_eq!(err.code().to_string(), "C304");
    }

    #[test]
    fn explicit_preset_number_overflow_is_rejected() {
        let err = board(
            r#"
[[preset]]
kind = "buttons"
pins = "D20 D19"
number = 4294967295
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Platform(PlatformError::NumberOverflow { ref family, first: u32::MAX })
                if family == "button"
        ));
    }

    #[test]
    fn connectors_positional_and_named() {
        let platform = board(
            r#"
[[connector]]
name = "pmod"
number = 0
pins = "Y18 Y19 Y16 Y17 - -"

[[connector]]
name = "ck_a"
number = 0
named = { a0_p = "E17", a0_n = "D18" }

[[resource]]
name = "spi"
number = 0
pins = "1 2 3"
dir = "o"
conn = { name = "pmod", number = 0 }
"#,
        )
        .unwrap();
        let pmod = platform.connector(&ConnectorKey::new("pmod", 0)).unwrap();
        assert_eq!(pmod.lookup("2").unwrap().unwrap().as_str(), "Y19");
        let ck_a = platform.connector(&ConnectorKey::new("ck_a", 0)).unwrap();
        assert_eq!(ck_a.lookup("a0_n").unwrap().unwrap().as_str(), "D18");
        assert!(platform.resource(&ResourceKey::new("spi", Some(0))).is_some());
    }

    #[test]
    fn pin_conflict_scope_from_defaults() {
        let body = r#"
[[connector]]
name = "ck_io"
number = 0
pins = "T14 T15 - T15"
"#;
        let err = board(body).unwrap_err();
        assert!(matches!(err, ConfigError::Platform(PlatformError::PinConflict { .. })));

        let platform = board(&format!("[defaults]\npin_conflicts = \"resources\"\n{body}")).unwrap();
        assert_eq!(platform.conflict_scope(), PinConflictScope::Resources);
    }

    #[test]
    fn platform_errors_surface() {
        let err = board(
            r#"
[[resource]]
name = "led"
number = 0
pins = "B2"

[[resource]]
name = "button"
number = 0
pins = "B2"
"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "pin 'B2' is claimed by both resource 'led#0' and resource 'button#0'"
        );
    }

    #[test]
    fn missing_device_field() {
        let err = load_board_from_str("[device]\npart = \"\"\npackage = \"clg400\"\nspeed = \"1\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "device.part"));
    }

    #[test]
    fn resource_without_pins() {
        let err = board("[[resource]]\nname = \"led\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn resource_with_pins_and_diff() {
        let err = board(
            "[[resource]]\nname = \"clk\"\npins = \"A1\"\ndiff = { p = \"B1\", n = \"C1\" }\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn clock_on_bundle_rejected() {
        let err = board(
            r#"
[[resource]]
name = "ps"
clock = "50MHz"

[[resource.subsignal]]
name = "clk"
pins = "E7"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains("'clock'")));
    }

    #[test]
    fn bad_clock_frequency() {
        let err = board("[[resource]]\nname = \"clk\"\npins = \"H16\"\nclock = \"fast\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_board_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn parse_bindings() {
        let request = load_bindings_from_str(
            r#"
[[bind]]
signal = "blink"
resource = "led"
number = 0

[[bind]]
signal = "mem_dqs"
resource = "ddr3"
number = 0
subsignal = "dqs"

[[bind]]
signal = "clk"
resource = "clk"
"#,
        )
        .unwrap();
        let shown: Vec<_> = request
            .bindings()
            .iter()
            .map(|b| format!("{}={}", b.signal, b.target))
            .collect();
        assert_eq!(shown, vec!["blink=led#0", "mem_dqs=ddr3#0.dqs", "clk=clk"]);
    }

    #[test]
    fn bindings_reject_empty_fields() {
        let err = load_bindings_from_str("[[bind]]\nsignal = \"\"\nresource = \"led\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
        let err = load_bindings_from_str(
            "[[bind]]\nsignal = \"x\"\nresource = \"ps\"\nsubsignal = \"uart..tx\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(&path, format!("{DEVICE}[[resource]]\nname = \"led\"\nnumber = 0\npins = \"A1\"\n"))
            .unwrap();
        let platform = load_board(&path).unwrap();
        assert_eq!(platform.resources().len(), 1);

        let missing = load_board(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::IoError(_)));
    }
}
