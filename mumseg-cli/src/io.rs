//! Grid and result files: plain `.json` or gzipped `.json.gz`.
//!
//! Grids are stored as nested rows (`[[f64; cols]; rows]`).

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

use mumseg_core::{from_rows, to_rows, Field};

fn is_gz(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "gz")
}

/// Deserialize a JSON value from `path`, decompressing `.gz` files.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let path = Path::new(path);
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader: Box<dyn Read> = if is_gz(path) {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    serde_json::from_reader(reader).with_context(|| format!("parsing {}", path.display()))
}

/// Serialize `value` to `path`, gzipping when the name ends in `.gz`.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let path = Path::new(path);
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if is_gz(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, value)?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    Ok(())
}

pub fn load_grid(path: &str) -> Result<Field> {
    let rows: Vec<Vec<f64>> = read_json(path)?;
    from_rows(&rows).with_context(|| format!("invalid grid in {}", path))
}

pub fn save_grid(path: &str, field: &Field) -> Result<()> {
    write_json(path, &to_rows(field))
}
