//! Parse a typed configuration, print it back out, and export its schema.
//!
//! Run with: `cargo run --example server_config`

use std::collections::BTreeMap;

#[derive(Debug, Default, PartialEq, Clone, Copy)]
enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

jsonbind::bind_enum!(LogLevel as "log level" {
    Error => "error",
    Warn => "warn",
    Info => "info",
    Debug => "debug",
});

#[derive(Debug, Default, PartialEq, Clone)]
struct Listener {
    host: String,
    port: u16,
}

jsonbind::bind_object!(Listener {
    "host" => host,
    "port" => port,
});

#[derive(Debug, Default, PartialEq, Clone)]
struct ServerConfig {
    name: String,
    listeners: Vec<Listener>,
    log_level: LogLevel,
    limits: BTreeMap<String, u64>,
    motd: Option<String>,
}

jsonbind::bind_object!(ServerConfig [DISALLOW_UNKNOWN_KEY] {
    "name" => name,
    "listeners" => listeners,
    "log_level" => log_level: OPTIONAL,
    "limits" => limits: OPTIONAL,
    "motd" => motd: OPTIONAL,
});

const INPUT: &str = r#"{
    "name": "edge",
    "listeners": [
        {"host": "0.0.0.0", "port": 8080},
        {"host": "::1", "port": 8443}
    ],
    "log_level": "debug",
    "limits": {"max_connections": 4096, "max_body_bytes": 1048576},
    "motd": null
}"#;

fn main() {
    let mut config = ServerConfig::default();
    if let Err(status) = jsonbind::from_str(INPUT, &mut config) {
        eprintln!("{status}");
        std::process::exit(1);
    }

    println!("parsed: {config:#?}");
    println!();
    println!("compact: {}", jsonbind::to_string(&config).unwrap());
    println!();
    println!("pretty:\n{}", jsonbind::to_string_pretty(&config).unwrap());
    println!();
    println!("schema:\n{}", jsonbind::export_schema(&config));
}
