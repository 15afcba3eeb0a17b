use std::io::{IsTerminal, Write};
use std::time::Duration;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use megalink_link::{CatalogEntry, Exchange, Message, MessageKind, Reply, Value};
use megalink_transport::PortInfo;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput<'a> {
    message: &'a str,
    key: Option<u8>,
    value: serde_json::Value,
    value_type: &'static str,
    round_trip_ms: Option<f64>,
}

#[derive(Serialize)]
struct ReplyOutput {
    key: u8,
    value: serde_json::Value,
    value_type: &'static str,
}

#[derive(Serialize)]
struct SentOutput<'a> {
    message: &'a str,
    kind: &'static str,
    key: Option<u8>,
    value: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct CatalogOutput<'a> {
    name: &'a str,
    kind: &'static str,
    usage: &'a str,
    summary: &'a str,
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
}

/// Print the reply to a read request.
pub fn print_reading(message: &Message, exchange: &Exchange, value: &Value, format: OutputFormat) {
    let label = message.to_string();
    let round_trip_ms = exchange.round_trip().map(millis);
    match format {
        OutputFormat::Json => print_json(&ReadingOutput {
            message: &label,
            key: exchange.key(),
            value: json_value(value),
            value_type: type_name(value),
            round_trip_ms,
        }),
        OutputFormat::Table => {
            let mut table = table(vec!["MESSAGE", "KEY", "VALUE", "TYPE", "RTT"]);
            table.add_row(vec![
                label,
                key_cell(exchange.key()),
                value.to_string(),
                type_name(value).to_string(),
                round_trip_ms.map_or_else(|| "-".to_string(), |ms| format!("{ms:.2}ms")),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{label} key={} value={value} type={}",
                key_cell(exchange.key()),
                type_name(value)
            );
        }
        OutputFormat::Raw => print_raw_value(value),
    }
}

/// Print one reply seen while monitoring.
pub fn print_reply(reply: &Reply, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ReplyOutput {
            key: reply.key,
            value: json_value(&reply.value),
            value_type: type_name(&reply.value),
        }),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "key={:<3} type={:<5} value={}",
                reply.key,
                type_name(&reply.value),
                reply.value
            );
        }
        OutputFormat::Raw => print_raw_value(&reply.value),
    }
}

/// Print a summary of a sent message, with its reply if one was awaited.
pub fn print_sent(message: &Message, exchange: &Exchange, reply: Option<&Value>, format: OutputFormat) {
    let label = message.to_string();
    match format {
        OutputFormat::Json => print_json(&SentOutput {
            message: &label,
            kind: kind_name(message.kind()),
            key: exchange.key(),
            value: reply.map(json_value),
        }),
        OutputFormat::Table | OutputFormat::Pretty => match reply {
            Some(value) => println!("sent {label} reply={value}"),
            None => println!("sent {label}"),
        },
        OutputFormat::Raw => {
            if let Some(value) = reply {
                print_raw_value(value);
            }
        }
    }
}

pub fn print_catalog(entries: &[CatalogEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<_> = entries
                .iter()
                .map(|entry| CatalogOutput {
                    name: entry.name,
                    kind: kind_name(entry.kind),
                    usage: entry.usage,
                    summary: entry.summary,
                })
                .collect();
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = table(vec!["NAME", "KIND", "USAGE", "SUMMARY"]);
            for entry in entries {
                table.add_row(vec![
                    entry.name,
                    kind_name(entry.kind),
                    entry.usage,
                    entry.summary,
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in entries {
                println!("{:<22} {:<8} {}", entry.name, kind_name(entry.kind), entry.usage);
            }
        }
        OutputFormat::Raw => {
            for entry in entries {
                println!("{}", entry.name);
            }
        }
    }
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<_> = ports
                .iter()
                .map(|port| PortOutput {
                    name: &port.name,
                    kind: &port.kind,
                })
                .collect();
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = table(vec!["PORT", "TYPE"]);
            for port in ports {
                table.add_row(vec![port.name.as_str(), port.kind.as_str()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for port in ports {
                println!("{}\t{}", port.name, port.kind);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_raw_value(value: &Value) {
    match value {
        Value::Bytes(bytes) => print_raw(bytes),
        other => println!("{other}"),
    }
}

fn print_json<T: Serialize + ?Sized>(out: &T) {
    println!(
        "{}",
        serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
    );
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Byte(v) => (*v).into(),
        Value::Short(v) => (*v).into(),
        Value::Long(v) => (*v).into(),
        Value::Float(v) => serde_json::Number::from_f64(f64::from(*v))
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Bytes(v) => String::from_utf8_lossy(v).into_owned().into(),
    }
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Byte(_) => "byte",
        Value::Float(_) => "float",
        Value::Short(_) => "short",
        Value::Bytes(_) => "string",
        Value::Long(_) => "long",
    }
}

fn kind_name(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::ReadRequest => "read",
        MessageKind::FireAndForget => "command",
    }
}

fn key_cell(key: Option<u8>) -> String {
    key.map_or_else(|| "-".to_string(), |key| key.to_string())
}

fn millis(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn json_values_keep_their_numeric_type() {
        assert_eq!(json_value(&Value::Short(44)), serde_json::json!(44));
        assert_eq!(json_value(&Value::Byte(-3)), serde_json::json!(-3));
        assert_eq!(json_value(&Value::Float(12.5)), serde_json::json!(12.5));
        assert_eq!(
            json_value(&Value::Bytes(Bytes::from_static(b"ok"))),
            serde_json::json!("ok")
        );
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(json_value(&Value::Float(f32::NAN)), serde_json::Value::Null);
    }

    #[test]
    fn millis_rounds_to_hundredths() {
        assert_eq!(millis(Duration::from_micros(1_234_567)), 1234.57);
    }
}
