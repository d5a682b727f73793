//! Exports: serialize a dictionary as a Cypher script, as JSON, or as a
//! configured JSON tree.
//!
//! ```text
//! Dictionary → cypher_script() → MERGE statements
//!   → pipe into cypher-shell, or paste into a graph browser
//! ```

pub mod tree;

use std::io::Write;

use chrono::Utc;

use crate::graph::ID_PROPERTY;
use crate::model::*;
use crate::Result;

/// Write the dictionary as a Cypher script.
///
/// One `MERGE ... SET ...;` per record, then one `MATCH ... MERGE ...;` per
/// edge. References whose target does not exist are left out, and so are
/// records filed under the empty class, which has no Cypher label.
pub fn cypher_script(dict: &Dictionary, writer: &mut dyn Write) -> Result<()> {
    let records: Vec<_> = dict
        .records()
        .filter(|(class, id, _)| {
            if class.is_empty() {
                tracing::warn!("skipping definition ID [{id}] without a class in Cypher export");
            }
            !class.is_empty()
        })
        .collect();

    let edges: Vec<Relationship> = records
        .iter()
        .flat_map(|&(class, id, record)| {
            let owner = NodeKey::new(class, id);
            record
                .references
                .iter()
                .filter(|r| !r.class.is_empty() && dict.resolves(r))
                .flat_map(move |r| Relationship::from_reference(&owner, r))
                .collect::<Vec<_>>()
        })
        .collect();

    // Header
    writeln!(writer, "// graphdict Cypher export")?;
    writeln!(writer, "// Generated: {}", Utc::now().to_rfc3339())?;
    writeln!(writer, "// Nodes: {}", records.len())?;
    writeln!(writer, "// Relationships: {}", edges.len())?;
    writeln!(writer)?;

    for &(class, id, record) in &records {
        let sets: Vec<String> = record
            .fields
            .iter()
            .filter(|(name, _)| name.as_str() != ID_PROPERTY)
            .map(|(name, value)| format!("n.{} = {}", format_name(name), format_value(value)))
            .collect();

        write!(
            writer,
            "MERGE (n:{} {{{}: {}}})",
            format_name(class),
            ID_PROPERTY,
            format_string(id)
        )?;
        if !sets.is_empty() {
            write!(writer, " SET {}", sets.join(", "))?;
        }
        writeln!(writer, ";")?;
    }

    writeln!(writer)?;
    writeln!(writer, "// Relationships")?;

    for rel in &edges {
        let props = format_properties(&rel.properties);
        let props_part = if props.is_empty() { String::new() } else { format!(" {{{props}}}") };

        writeln!(
            writer,
            "MATCH (a:{} {{{id}: {}}}) MATCH (b:{} {{{id}: {}}}) MERGE (a)-[:{}{}]->(b);",
            format_name(&rel.src.class),
            format_string(&rel.src.id),
            format_name(&rel.dst.class),
            format_string(&rel.dst.id),
            format_name(&rel.rel_type),
            props_part,
            id = ID_PROPERTY,
        )?;
    }

    Ok(())
}

/// The whole dictionary as pretty-printed JSON.
pub fn to_json(dict: &Dictionary) -> Result<String> {
    Ok(serde_json::to_string_pretty(dict)?)
}

/// Format Fields as a Cypher property string (key: value, ...).
fn format_properties(props: &Fields) -> String {
    props
        .iter()
        .map(|(key, value)| format!("{}: {}", format_name(key), format_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a Value as a Cypher literal.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format_string(s),
        Value::Int(i) => i.to_string(),
        // Cypher has no literals for these.
        Value::Float(f) if f.is_nan() => "0.0/0.0".to_string(),
        Value::Float(f) if f.is_infinite() => (if *f > 0.0 { "1.0/0.0" } else { "-1.0/0.0" }).to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}

fn format_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Labels, keys and relationship types: bare when they are plain
/// identifiers, backtick-quoted otherwise.
fn format_name(name: &str) -> String {
    let plain = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}
