//! Build script for fillerup-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates face.toml and generates the face configuration constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use fillerup_core::config::{
    ConfigError, FaceConfig, DEFAULT_BLUETOOTH_MESSAGE_MS, DEFAULT_SETTINGS_MESSAGE_MS,
    MAX_MESSAGE_MS, MIN_MESSAGE_MS,
};
use fillerup_core::time::TickUnit;

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parsed and validated face.toml
struct FaceToml {
    config: FaceConfig,
    start_seconds: i64,
    style_24h: bool,
}

/// Validate face.toml and write `face_config.rs` to OUT_DIR
fn generate_config() {
    println!("cargo:rerun-if-changed=face.toml");

    let config_path = Path::new("face.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a face.toml configuration file.           ║\n\
            ║  Please create one in the fillerup-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read face.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in face.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    let face = parse_face(&value, &mut errors);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml validation failed                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&errors.join("\n"))
        );
    }

    write_config(&face);
    println!("cargo:warning=face.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn integer(value: &toml::Value, section: &str, key: &str, default: i64, errors: &mut Vec<String>) -> i64 {
    match value.get(section).and_then(|s| s.get(key)) {
        None => default,
        Some(toml::Value::Integer(n)) => *n,
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

/// Read a duration; range checks are left to `FaceConfig::validate`
fn duration(value: &toml::Value, key: &str, default: u32, errors: &mut Vec<String>) -> u32 {
    let ms = integer(value, "messages", key, default as i64, errors);
    match u32::try_from(ms) {
        Ok(ms) => ms,
        Err(_) => {
            errors.push(format!("[messages] {} = {} is not a duration", key, ms));
            default
        }
    }
}

fn parse_face(value: &toml::Value, errors: &mut Vec<String>) -> FaceToml {
    let settings_ms = duration(value, "settings_ms", DEFAULT_SETTINGS_MESSAGE_MS, errors);
    let bluetooth_ms = duration(value, "bluetooth_ms", DEFAULT_BLUETOOTH_MESSAGE_MS, errors);

    let simulated = env::var_os("CARGO_FEATURE_SIMULATED_TIME").is_some();
    let tick_unit = match value.get("tick").and_then(|t| t.get("unit")) {
        _ if simulated => TickUnit::Second,
        None => TickUnit::Minute,
        Some(toml::Value::String(s)) if s == "minute" => TickUnit::Minute,
        Some(toml::Value::String(s)) if s == "second" => TickUnit::Second,
        Some(other) => {
            errors.push(format!(
                "[tick] unit must be \"minute\" or \"second\", got {}",
                other
            ));
            TickUnit::Minute
        }
    };

    let config = FaceConfig {
        settings_message_ms: settings_ms,
        bluetooth_message_ms: bluetooth_ms,
        tick_unit,
    };
    if let Err(e) = config.validate() {
        let (key, ms) = match e {
            ConfigError::SettingsDuration => ("settings_ms", settings_ms),
            ConfigError::BluetoothDuration => ("bluetooth_ms", bluetooth_ms),
        };
        errors.push(format!(
            "[messages] {} = {} outside {}..={}",
            key, ms, MIN_MESSAGE_MS, MAX_MESSAGE_MS
        ));
    }

    let start_seconds = integer(value, "clock", "start_seconds", 0, errors);
    if !(0..86_400).contains(&start_seconds) {
        errors.push(format!(
            "[clock] start_seconds = {} outside 0..86400",
            start_seconds
        ));
    }

    let style_24h = match value.get("clock").and_then(|c| c.get("style_24h")) {
        None => true,
        Some(toml::Value::Boolean(b)) => *b,
        Some(_) => {
            errors.push("[clock] style_24h must be a boolean".to_string());
            true
        }
    };

    FaceToml {
        config,
        start_seconds,
        style_24h,
    }
}

fn write_config(face: &FaceToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("face_config.rs")).unwrap();
    writeln!(f, "// Generated from face.toml by build.rs").unwrap();
    writeln!(
        f,
        "pub const FACE_CONFIG: FaceConfig = FaceConfig {{\n    \
         settings_message_ms: {},\n    \
         bluetooth_message_ms: {},\n    \
         tick_unit: TickUnit::{:?},\n}};",
        face.config.settings_message_ms, face.config.bluetooth_message_ms, face.config.tick_unit
    )
    .unwrap();
    writeln!(f, "pub const CLOCK_START_SECONDS: u32 = {};", face.start_seconds).unwrap();
    writeln!(f, "pub const CLOCK_STYLE_24H: bool = {};", face.style_24h).unwrap();
}
