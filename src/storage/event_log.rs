/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The `.events` log format.
//!
//! Magic `"MEVT"` and a little-endian `u16` version, followed by a
//! sequence of `(u8 kind, u32 x, u32 y, u32 aux)` records terminated
//! by a `0xFF` kind byte. The record stream (everything after the
//! version) may be zlib-compressed as a whole; readers tell the two
//! apart by the first byte, since the zlib CMF byte (`0x78`) is not a
//! valid record kind.

use super::FormatError;
use crate::events::{Event, EventKind};
use anyhow::{Context, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Magic number of `.events` files.
pub const EVENTS_MAGIC: [u8; 4] = *b"MEVT";
/// Current `.events` format version.
pub const EVENTS_VERSION: u16 = 1;
/// The kind byte closing a record stream.
const TERMINATOR: u8 = 0xFF;
/// The zlib CMF byte opening a compressed record stream.
const ZLIB_CMF: u8 = 0x78;

/// Bytes of one encoded record.
const RECORD_BYTES: usize = 13;

/// Record count from which [`write_events`] compresses the stream.
pub const COMPRESS_THRESHOLD: usize = (1 << 20) / RECORD_BYTES;

/// Writes an event log to `path`, compressing automatically when large.
pub fn write_events<P: AsRef<Path>>(path: P, events: &[Event]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_events_to(&mut writer, events, events.len() >= COMPRESS_THRESHOLD)
        .with_context(|| format!("Could not write {}", path.display()))?;
    writer.flush()?;
    log::info!("Wrote {} events to {}", events.len(), path.display());
    Ok(())
}

/// Writes an event log to an arbitrary sink with an explicit
/// compression choice.
pub fn write_events_to<W: Write>(writer: &mut W, events: &[Event], compress: bool) -> Result<()> {
    writer.write_all(&EVENTS_MAGIC)?;
    writer.write_all(&EVENTS_VERSION.to_le_bytes())?;
    if compress {
        let mut encoder = ZlibEncoder::new(writer, Compression::default());
        write_records(&mut encoder, events)?;
        encoder.finish()?;
    } else {
        write_records(writer, events)?;
    }
    Ok(())
}

fn write_records<W: Write>(writer: &mut W, events: &[Event]) -> Result<()> {
    let mut record = [0u8; RECORD_BYTES];
    for event in events {
        record[0] = event.kind as u8;
        record[1..5].copy_from_slice(&event.x.to_le_bytes());
        record[5..9].copy_from_slice(&event.y.to_le_bytes());
        record[9..13].copy_from_slice(&event.aux.to_le_bytes());
        writer.write_all(&record)?;
    }
    writer.write_all(&[TERMINATOR])?;
    Ok(())
}

/// Reads an event log from `path`.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<Event>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    read_events_from(&mut reader).with_context(|| format!("Could not read {}", path.display()))
}

/// Reads an event log from an arbitrary source, transparently handling
/// both the raw and the compressed form.
pub fn read_events_from<R: Read>(reader: &mut R) -> Result<Vec<Event>> {
    let magic: [u8; 4] = super::read_exact(reader)?;
    if magic != EVENTS_MAGIC {
        return Err(FormatError::BadMagic { expected: "MEVT" }.into());
    }
    let version = super::read_u16(reader)?;
    if version > EVENTS_VERSION {
        return Err(FormatError::UnsupportedVersion(version).into());
    }

    let first: [u8; 1] = super::read_exact(reader)?;
    let mut rest = std::io::Cursor::new(first).chain(reader);
    if first[0] == ZLIB_CMF {
        read_records(&mut ZlibDecoder::new(rest))
    } else {
        read_records(&mut rest)
    }
}

fn read_records<R: Read>(reader: &mut R) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    loop {
        let kind: [u8; 1] = super::read_exact(reader)?;
        if kind[0] == TERMINATOR {
            return Ok(events);
        }
        let kind = EventKind::from_tag(kind[0]).ok_or(FormatError::BadEventKind(kind[0]))?;
        let body: [u8; RECORD_BYTES - 1] = super::read_exact(reader)?;
        events.push(Event {
            kind,
            x: u32::from_le_bytes(body[0..4].try_into().unwrap()),
            y: u32::from_le_bytes(body[4..8].try_into().unwrap()),
            aux: u32::from_le_bytes(body[8..12].try_into().unwrap()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Dir;

    fn sample() -> Vec<Event> {
        vec![
            Event::carve_cell(0, 0),
            Event::connect(0, 0, Dir::East),
            Event::carve_cell(1, 0),
            Event::visit(1, 0, 1),
            Event::path(1, 0),
        ]
    }

    #[test]
    fn test_round_trip_raw() {
        let mut buffer = Vec::new();
        write_events_to(&mut buffer, &sample(), false).unwrap();
        assert_eq!(read_events_from(&mut &buffer[..]).unwrap(), sample());
    }

    #[test]
    fn test_round_trip_compressed() {
        let mut buffer = Vec::new();
        write_events_to(&mut buffer, &sample(), true).unwrap();
        assert_eq!(read_events_from(&mut &buffer[..]).unwrap(), sample());
    }

    #[test]
    fn test_empty_log() {
        let mut buffer = Vec::new();
        write_events_to(&mut buffer, &[], false).unwrap();
        assert_eq!(read_events_from(&mut &buffer[..]).unwrap(), vec![]);
    }
}
