//! Build script for hotwheels-app
//!
//! Validates hotwheels.toml at compile time so a broken embedded default
//! never reaches the rig.

use std::fs;
use std::path::Path;

fn main() {
    validate_config();
}

/// Validate hotwheels.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=hotwheels.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("hotwheels.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read hotwheels.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in hotwheels.toml                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_limits(&config, &mut errors);
    validate_sequencer(&config, &mut errors);
    validate_sensors(&config, &mut errors);
    validate_sim(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in hotwheels.toml                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
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

/// Numeric value of a key, accepting integers and floats
fn number(table: &toml::Value, key: &str) -> Option<f64> {
    match table.get(key)? {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };
    for key in root.keys() {
        if !["sequencer", "sensors", "sim"].contains(&key.as_str()) {
            errors.push(format!("unknown section [{}]", key));
        }
    }
}

fn validate_limits(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(limits) = config.get("sequencer").and_then(|s| s.get("limits")) else {
        return;
    };

    let min = number(limits, "catcher_min_m").unwrap_or(0.0);
    let max = number(limits, "catcher_max_m").unwrap_or(0.84);
    if min >= max {
        errors.push("[sequencer.limits] catcher_min_m must be below catcher_max_m".to_string());
    }
    if let Some(d) = number(limits, "sensor_distance_m") {
        if d <= 0.0 {
            errors.push("[sequencer.limits] sensor_distance_m must be positive".to_string());
        }
    }
    for key in ["sensor_timeout_ms", "poll_interval_ms"] {
        match limits.get(key) {
            Some(toml::Value::Integer(ms)) if *ms <= 0 => {
                errors.push(format!("[sequencer.limits] {} must be positive", key));
            }
            Some(toml::Value::Integer(_)) | None => {}
            Some(_) => errors.push(format!("[sequencer.limits] {} must be an integer", key)),
        }
    }
}

fn validate_sequencer(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sequencer) = config.get("sequencer") else {
        return;
    };

    if let Some(g) = sequencer
        .get("ballistics")
        .and_then(|b| number(b, "gravity_m_s2"))
    {
        if g <= 0.0 {
            errors.push("[sequencer.ballistics] gravity_m_s2 must be positive".to_string());
        }
    }

    if let Some(profiles) = sequencer.get("profiles").and_then(|p| p.as_table()) {
        for (name, profile) in profiles {
            if !["ramp", "door", "catcher"].contains(&name.as_str()) {
                errors.push(format!("[sequencer.profiles.{}] unknown actuator", name));
                continue;
            }
            for key in ["velocity", "acceleration", "deceleration"] {
                match number(profile, key) {
                    Some(v) if v > 0.0 => {}
                    Some(_) => errors.push(format!(
                        "[sequencer.profiles.{}] {} must be positive",
                        name, key
                    )),
                    None => errors.push(format!("[sequencer.profiles.{}] missing '{}'", name, key)),
                }
            }
            if let Some(jerk) = number(profile, "jerk_percent") {
                if !(0.0..=100.0).contains(&jerk) {
                    errors.push(format!(
                        "[sequencer.profiles.{}] jerk_percent must be 0-100",
                        name
                    ));
                }
            }
        }
    }

    match sequencer.get("fault_policy") {
        None => {}
        Some(toml::Value::String(s)) if s == "retry_forever" => {}
        Some(toml::Value::Table(t)) if t.contains_key("abandon") => {
            let budget = t
                .get("abandon")
                .and_then(|a| a.get("max_consecutive_faults"))
                .and_then(|m| m.as_integer());
            if !matches!(budget, Some(n) if n > 0) {
                errors.push(
                    "[sequencer] abandon needs max_consecutive_faults above 0".to_string(),
                );
            }
        }
        Some(_) => errors.push(
            "[sequencer] fault_policy must be 'retry_forever' or { abandon = ... }".to_string(),
        ),
    }
}

fn validate_sensors(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sensors) = config.get("sensors") else {
        return;
    };

    if let Some(toml::Value::String(level)) = sensors.get("active") {
        if !["high", "low"].contains(&level.as_str()) {
            errors.push("[sensors] active must be 'high' or 'low'".to_string());
        }
    }
    if let Some(toml::Value::Integer(n)) = sensors.get("debounce_samples") {
        if *n < 1 || *n > 255 {
            errors.push("[sensors] debounce_samples must be 1-255".to_string());
        }
    }
}

fn validate_sim(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sim) = config.get("sim") else {
        return;
    };

    for key in ["ramp_length_m", "car_length_m", "ramp_max_deg", "door_max_deg"] {
        if let Some(v) = number(sim, key) {
            if v <= 0.0 {
                errors.push(format!("[sim] {} must be positive", key));
            }
        }
    }
}
