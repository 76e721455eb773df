/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The `.maze` file format.
//!
//! A small little-endian header followed by the raw cell bytes,
//! row-major, optionally zlib-compressed:
//!
//! ```text
//! magic            : 4 bytes = "MAZE"
//! version          : u16
//! width, height    : u32, u32
//! flags            : u32    (bit 0: zlib-compressed payload)
//! start_x, start_y : u32, u32
//! exit_x,  exit_y  : u32, u32
//! metadata_len     : u32
//! metadata         : UTF-8, "key=value;…"
//! payload_len      : u64    (stored bytes, after compression)
//! payload          : width · height cell bytes
//! ```
//!
//! The writer compresses once the grid reaches 2²⁰ cells; readers
//! accept either form. Metadata is advisory (algorithm, seed,
//! generation time); the grid bytes are the source of truth.

pub mod event_log;

use crate::grid::{Grid, GridReader, MAX_CELLS};
use anyhow::{Context, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Magic number of `.maze` files.
pub const MAZE_MAGIC: [u8; 4] = *b"MAZE";
/// Current `.maze` format version.
pub const MAZE_VERSION: u16 = 1;
/// Header flag: the payload is zlib-compressed.
const FLAG_ZLIB: u32 = 1;
/// Cell count from which the writer compresses the payload.
pub const COMPRESS_THRESHOLD: usize = 1 << 20;

#[derive(Error, Debug)]
/// A structural defect in a `.maze` or `.events` file.
pub enum FormatError {
    #[error("bad magic number (not a {expected} file)")]
    BadMagic { expected: &'static str },
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u16),
    #[error("file is truncated")]
    Truncated,
    #[error("grid dimensions {width}x{height} in the header are invalid")]
    BadDimensions { width: usize, height: usize },
    #[error("payload holds {found} cell bytes, the header promises {expected}")]
    PayloadLength { expected: usize, found: usize },
    #[error("metadata is not valid UTF-8")]
    Metadata(#[from] std::string::FromUtf8Error),
    #[error("invalid event record kind {0:#04x}")]
    BadEventKind(u8),
}

#[inline]
fn read_exact<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut bytes = [0; N];
    reader.read_exact(&mut bytes).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            anyhow::Error::new(FormatError::Truncated)
        } else {
            e.into()
        }
    })?;
    Ok(bytes)
}

#[inline]
fn read_u16<R: Read>(reader: &mut R) -> Result<u16> {
    Ok(u16::from_le_bytes(read_exact(reader)?))
}

#[inline]
fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    Ok(u32::from_le_bytes(read_exact(reader)?))
}

#[inline]
fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    Ok(u64::from_le_bytes(read_exact(reader)?))
}

/// Writes `grid` to `path`, compressing automatically past
/// [`COMPRESS_THRESHOLD`] cells.
pub fn write_maze<P: AsRef<Path>>(
    path: P,
    grid: &Grid,
    metadata: &[(String, String)],
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_maze_to(
        &mut writer,
        grid,
        metadata,
        grid.num_cells() >= COMPRESS_THRESHOLD,
    )
    .with_context(|| format!("Could not write {}", path.display()))?;
    writer.flush()?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Writes `grid` to an arbitrary sink with an explicit compression
/// choice.
pub fn write_maze_to<W: Write>(
    writer: &mut W,
    grid: &Grid,
    metadata: &[(String, String)],
    compress: bool,
) -> Result<()> {
    let (width, height) = grid.dimensions();
    let (exit_x, exit_y) = grid.exit();

    writer.write_all(&MAZE_MAGIC)?;
    writer.write_all(&MAZE_VERSION.to_le_bytes())?;
    writer.write_all(&(width as u32).to_le_bytes())?;
    writer.write_all(&(height as u32).to_le_bytes())?;
    let flags: u32 = if compress { FLAG_ZLIB } else { 0 };
    writer.write_all(&flags.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;
    writer.write_all(&(exit_x as u32).to_le_bytes())?;
    writer.write_all(&(exit_y as u32).to_le_bytes())?;

    let metadata = format_metadata(metadata);
    writer.write_all(&(metadata.len() as u32).to_le_bytes())?;
    writer.write_all(metadata.as_bytes())?;

    if compress {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(grid.bytes())?;
        let payload = encoder.finish()?;
        writer.write_all(&(payload.len() as u64).to_le_bytes())?;
        writer.write_all(&payload)?;
    } else {
        writer.write_all(&(grid.bytes().len() as u64).to_le_bytes())?;
        writer.write_all(grid.bytes())?;
    }
    Ok(())
}

/// Reads a maze and its advisory metadata from `path`.
pub fn read_maze<P: AsRef<Path>>(path: P) -> Result<(Grid, Vec<(String, String)>)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    read_maze_from(&mut reader).with_context(|| format!("Could not read {}", path.display()))
}

/// Reads a maze and its advisory metadata from an arbitrary source.
pub fn read_maze_from<R: Read>(reader: &mut R) -> Result<(Grid, Vec<(String, String)>)> {
    let magic: [u8; 4] = read_exact(reader)?;
    if magic != MAZE_MAGIC {
        return Err(FormatError::BadMagic { expected: "MAZE" }.into());
    }
    let version = read_u16(reader)?;
    if version > MAZE_VERSION {
        return Err(FormatError::UnsupportedVersion(version).into());
    }
    let width = read_u32(reader)? as usize;
    let height = read_u32(reader)? as usize;
    if width < 2
        || height < 2
        || width
            .checked_mul(height)
            .is_none_or(|cells| cells > MAX_CELLS)
    {
        return Err(FormatError::BadDimensions { width, height }.into());
    }
    let num_cells = width * height;
    let flags = read_u32(reader)?;
    let start = (read_u32(reader)? as usize, read_u32(reader)? as usize);
    let exit = (read_u32(reader)? as usize, read_u32(reader)? as usize);
    if start != (0, 0) || exit != (width - 1, height - 1) {
        // Tolerated: the grid is the source of truth and the crate's
        // endpoints are canonical.
        log::warn!(
            "Non-canonical endpoints in header (start {:?}, exit {:?}); using the canonical ones",
            start,
            exit
        );
    }

    let metadata_len = read_u32(reader)? as usize;
    let mut metadata = vec![0; metadata_len];
    reader
        .read_exact(&mut metadata)
        .map_err(|_| FormatError::Truncated)?;
    let metadata = parse_metadata(&String::from_utf8(metadata).map_err(FormatError::Metadata)?);

    let payload_len = read_u64(reader)? as usize;
    let mut payload = vec![0; payload_len];
    reader
        .read_exact(&mut payload)
        .map_err(|_| FormatError::Truncated)?;

    let cells = if flags & FLAG_ZLIB != 0 {
        let mut cells = Vec::with_capacity(num_cells);
        ZlibDecoder::new(&payload[..])
            .read_to_end(&mut cells)
            .context("Could not decompress the cell payload")?;
        cells
    } else {
        payload
    };
    if cells.len() != num_cells {
        return Err(FormatError::PayloadLength {
            expected: num_cells,
            found: cells.len(),
        }
        .into());
    }

    let grid = Grid::from_bytes(width, height, cells)
        .expect("dimensions and payload length were just validated");
    Ok((grid, metadata))
}

fn format_metadata(metadata: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in metadata {
        debug_assert!(!key.contains(['=', ';']) && !value.contains(';'));
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push(';');
    }
    out
}

fn parse_metadata(metadata: &str) -> Vec<(String, String)> {
    metadata
        .split(';')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| entry.split_once('='))
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_round_trip() {
        let metadata = vec![
            ("algo".to_owned(), "dfs".to_owned()),
            ("seed".to_owned(), "42".to_owned()),
        ];
        assert_eq!(parse_metadata(&format_metadata(&metadata)), metadata);
        assert_eq!(parse_metadata(""), vec![]);
    }

    #[test]
    fn test_bad_magic() {
        let err = read_maze_from(&mut &b"MAZX\x01\x00"[..]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FormatError>(),
            Some(FormatError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_truncated() {
        let err = read_maze_from(&mut &b"MAZE\x01"[..]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FormatError>(),
            Some(FormatError::Truncated)
        ));
    }
}
