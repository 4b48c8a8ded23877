//! Output artifact: a JavaScript data file binding the ETA table to a
//! constant.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::assembler::{EtaResult, EtaTable};
use crate::config::EtaGridConfig;
use crate::error::Result;

/// One table row keyed by destination. Absent durations serialize as `null`.
struct KeyedRow<'a> {
    row: &'a EtaResult,
    keys: &'a [String],
}

impl Serialize for KeyedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.keys.len()))?;
        map.serialize_entry("lat", &self.row.lat)?;
        map.serialize_entry("lon", &self.row.lon)?;
        for (key, duration) in self.keys.iter().zip(&self.row.durations) {
            map.serialize_entry(key, duration)?;
        }
        map.end()
    }
}

/// Compact JSON array of the table rows, without any header.
pub fn table_json(table: &EtaTable, config: &EtaGridConfig) -> Result<String> {
    let keys: Vec<String> = config.destinations.iter().map(|d| d.key.clone()).collect();
    let rows: Vec<KeyedRow<'_>> = table
        .rows
        .iter()
        .map(|row| KeyedRow { row, keys: &keys })
        .collect();
    Ok(serde_json::to_string(&rows)?)
}

/// Full file contents: informational header comments, then the constant.
pub fn render(
    table: &EtaTable,
    config: &EtaGridConfig,
    generated_at: DateTime<Local>,
) -> Result<String> {
    let names = config
        .destinations
        .iter()
        .map(|d| d.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    out.push_str("// Auto-generated by eta-grid\n");
    out.push_str("// Do not edit by hand. Re-run the generator to regenerate.\n");
    out.push_str("// Drive times in seconds from each grid point to each destination.\n");
    out.push_str(&format!("// Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M")));
    out.push_str(&format!(
        "// Grid points: {} ({} mile spacing)\n",
        table.len(),
        config.spacing_miles
    ));
    out.push_str(&format!("// Destinations: {}\n", names));
    out.push('\n');
    out.push_str(&format!("const {} = ", config.const_name));
    out.push_str(&table_json(table, config)?);
    out.push_str(";\n");
    Ok(out)
}

/// Write `contents` to a temporary sibling, then rename it over `path`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    let written = write_file(&tmp_path, contents).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::assembler::TableSummary;

    fn table() -> EtaTable {
        EtaTable {
            rows: vec![
                EtaResult {
                    lat: 37.77,
                    lon: -78.55,
                    durations: vec![Some(1520), None],
                },
                EtaResult {
                    lat: 37.771812,
                    lon: -78.55,
                    durations: vec![Some(1498), Some(1610)],
                },
            ],
            summary: TableSummary {
                reachable: 2,
                ..TableSummary::default()
            },
        }
    }

    #[test]
    fn rows_use_destination_keys() {
        let json = table_json(&table(), &EtaGridConfig::default()).unwrap();
        assert_eq!(
            json,
            r#"[{"lat":37.77,"lon":-78.55,"uva":1520,"mjh":null},{"lat":37.771812,"lon":-78.55,"uva":1498,"mjh":1610}]"#
        );
    }

    #[test]
    fn render_frames_table_with_header() {
        let generated_at = Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let text = render(&table(), &EtaGridConfig::default(), generated_at).unwrap();

        assert!(text.contains("// Generated: 2026-03-01 09:30\n"));
        assert!(text.contains("// Grid points: 2 (0.125 mile spacing)\n"));
        assert!(text.contains("// Destinations: UVA Medical Center, Martha Jefferson\n"));
        assert!(text.contains("\n\nconst ETA_GRID = [{"));
        assert!(text.ends_with("}];\n"));
    }

    #[test]
    fn empty_table_renders_empty_array() {
        let text = render(&EtaTable::default(), &EtaGridConfig::default(), Local::now()).unwrap();
        assert!(text.ends_with("const ETA_GRID = [];\n"));
    }

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("eta-grid.js");

        write_atomic(&path, "const ETA_GRID = [];\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "const ETA_GRID = [];\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in the way makes the final rename fail
        let path = dir.path().join("eta-grid");
        fs::create_dir(&path).unwrap();

        assert!(write_atomic(&path, "const ETA_GRID = [];\n").is_err());
        assert!(!path.with_extension("tmp").exists());
        assert!(path.is_dir());
    }
}
