use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, GridError, PixelModifyItem};

// ============================================================================
// GRID SNAPSHOT FILE FORMAT
// ============================================================================
//
// bincode-serialized `SnapshotFile`: the magic string, every row and column
// key, then only the painted cells. Unpainted cells are implied.

/// Magic header for the sparse snapshot format (v1)
const SNAPSHOT_MAGIC_V1: &str = "PXG1";

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    magic: String,
    rows: Vec<i32>,
    columns: Vec<i32>,
    painted: Vec<PixelModifyItem>,
}

/// Error type for snapshot operations
#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Serialize(String),
    InvalidFormat(String),
    InvalidGrid(GridError),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "I/O error: {}", e),
            SnapshotError::Serialize(e) => write!(f, "Serialization error: {}", e),
            SnapshotError::InvalidFormat(e) => write!(f, "Invalid format: {}", e),
            SnapshotError::InvalidGrid(e) => write!(f, "Invalid grid: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SnapshotError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SnapshotError::Serialize(e.to_string())
    }
}

impl From<GridError> for SnapshotError {
    fn from(e: GridError) -> Self {
        SnapshotError::InvalidGrid(e)
    }
}

fn to_file(grid: &Grid) -> SnapshotFile {
    SnapshotFile {
        magic: SNAPSHOT_MAGIC_V1.to_string(),
        rows: grid.row_keys().collect(),
        columns: grid.column_keys().collect(),
        painted: grid
            .cells()
            .filter(|(_, _, cell)| !cell.is_empty())
            .map(|(r, c, cell)| PixelModifyItem::new(r, c, cell.color.as_str()))
            .collect(),
    }
}

fn from_file(file: SnapshotFile) -> Result<Grid, SnapshotError> {
    if file.magic != SNAPSHOT_MAGIC_V1 {
        return Err(SnapshotError::InvalidFormat(format!(
            "unknown magic {:?}",
            file.magic
        )));
    }
    if file.rows.len() < 2 || file.columns.len() < 2 {
        return Err(SnapshotError::InvalidGrid(GridError::TooSmall {
            rows: file.rows.len(),
            columns: file.columns.len(),
        }));
    }

    let mut grid = Grid::with_keys(file.rows, file.columns);
    for item in &file.painted {
        if !grid.set(item.row_index, item.column_index, &item.color) {
            return Err(SnapshotError::InvalidFormat(format!(
                "painted cell ({}, {}) lies outside the grid",
                item.row_index, item.column_index
            )));
        }
    }
    Ok(grid)
}

pub fn encode_snapshot(grid: &Grid) -> Result<Vec<u8>, SnapshotError> {
    Ok(bincode::serialize(&to_file(grid))?)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Grid, SnapshotError> {
    let file: SnapshotFile = bincode::deserialize(bytes)?;
    from_file(file)
}

pub fn save_snapshot(grid: &Grid, path: &Path) -> Result<(), SnapshotError> {
    let writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(writer, &to_file(grid))?;
    crate::log_info!("Saved grid snapshot to {}", path.display());
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<Grid, SnapshotError> {
    let mut raw = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut raw)?;
    let grid = decode_snapshot(&raw)?;
    crate::log_info!("Loaded grid snapshot from {}", path.display());
    Ok(grid)
}
