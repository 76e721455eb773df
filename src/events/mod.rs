/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The generation/solve event stream.
//!
//! Generators and solvers report their work as an append-only sequence
//! of fixed-layout [`Event`] records pushed into an [`EventSink`].
//! Replaying a recorded sequence onto a fresh grid of the original
//! dimensions reproduces the recording's observable state, which is the
//! basis for headless replay and visualization.
//!
//! Producers push one record at a time; consumers pull. A sink must
//! accept events in the order emitted and must not block the producer
//! for long; renderers should buffer, e.g. behind a [`ChannelSink`].
//! No callback re-entry into the producer is allowed.
//!
//! For serial algorithms the event sequence is reproducible at a fixed
//! seed; the parallel generators reproduce the final grid state but not
//! the event interleaving.

use crate::grid::{CellFlags, Dir, Grid};
use thiserror::Error;

/// The kind tag of an [`Event`].
///
/// Discriminants are the on-disk `u8` tags of the
/// [event log](crate::storage::event_log); `0xFF` is reserved as the
/// stream terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    /// A generator claimed the cell (VISITED_GEN set).
    CarveCell = 1,
    /// A passage was opened from the cell toward `aux` (a [`Dir`] index).
    ConnectCells = 2,
    /// A solver expanded the cell; `aux` carries the distance where the
    /// solver tracks one.
    Visit = 3,
    /// The cell lies on the reported solution path.
    Path = 4,
    /// The solver-owned flags of the cell were cleared.
    ClearVisit = 5,
}

impl EventKind {
    /// Decodes an on-disk kind tag.
    pub fn from_tag(tag: u8) -> Option<EventKind> {
        match tag {
            1 => Some(EventKind::CarveCell),
            2 => Some(EventKind::ConnectCells),
            3 => Some(EventKind::Visit),
            4 => Some(EventKind::Path),
            5 => Some(EventKind::ClearVisit),
            _ => None,
        }
    }
}

/// One record of the event stream: `(kind, x, y, aux)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub x: u32,
    pub y: u32,
    /// Kind-specific payload: a [`Dir`] index for
    /// [`ConnectCells`](EventKind::ConnectCells), a distance for
    /// [`Visit`](EventKind::Visit), zero otherwise.
    pub aux: u32,
}

impl Event {
    #[inline(always)]
    pub fn carve_cell(x: usize, y: usize) -> Event {
        Event {
            kind: EventKind::CarveCell,
            x: x as u32,
            y: y as u32,
            aux: 0,
        }
    }

    #[inline(always)]
    pub fn connect(x: usize, y: usize, dir: Dir) -> Event {
        Event {
            kind: EventKind::ConnectCells,
            x: x as u32,
            y: y as u32,
            aux: dir as u32,
        }
    }

    #[inline(always)]
    pub fn visit(x: usize, y: usize, distance: usize) -> Event {
        Event {
            kind: EventKind::Visit,
            x: x as u32,
            y: y as u32,
            aux: distance as u32,
        }
    }

    #[inline(always)]
    pub fn path(x: usize, y: usize) -> Event {
        Event {
            kind: EventKind::Path,
            x: x as u32,
            y: y as u32,
            aux: 0,
        }
    }

    #[inline(always)]
    pub fn clear_visit(x: usize, y: usize) -> Event {
        Event {
            kind: EventKind::ClearVisit,
            x: x as u32,
            y: y as u32,
            aux: 0,
        }
    }
}

/// A consumer of the event stream.
pub trait EventSink {
    /// Accepts the next event. Called in emission order.
    fn on_event(&mut self, event: Event);
}

/// A sink that discards everything; the default when no recording or
/// rendering is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    #[inline(always)]
    fn on_event(&mut self, _event: Event) {}
}

/// A sink that appends every event to an in-memory vector, feeding the
/// [event log writer](crate::storage::event_log) or a replay.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the sink, returning the recorded events.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventSink for RecordingSink {
    #[inline(always)]
    fn on_event(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// A sink that forwards events into a bounded
/// [crossbeam channel](crossbeam_channel), decoupling the producer from
/// a consumer running on another thread.
///
/// When the channel is full the producer blocks until the consumer
/// catches up; when the consumer is gone the remaining events are
/// silently dropped.
pub struct ChannelSink {
    tx: crossbeam_channel::Sender<Event>,
}

impl ChannelSink {
    /// Creates a sink with a buffer of `bound` events, returning the
    /// receiving end alongside it.
    pub fn new(bound: usize) -> (Self, crossbeam_channel::Receiver<Event>) {
        let (tx, rx) = crossbeam_channel::bounded(bound);
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    #[inline]
    fn on_event(&mut self, event: Event) {
        // A disconnected consumer is not the producer's problem.
        let _ = self.tx.send(event);
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// A recorded event cannot be applied to the target grid.
pub enum ReplayError {
    #[error("event coordinate ({x}, {y}) is out of bounds")]
    OutOfBounds { x: u32, y: u32 },
    #[error("event aux value {aux} is not a direction")]
    BadDirection { aux: u32 },
}

/// Applies a single event to a grid.
pub fn apply(grid: &mut Grid, event: &Event) -> Result<(), ReplayError> {
    let (x, y) = (event.x as usize, event.y as usize);
    if !grid.in_bounds(x, y) {
        return Err(ReplayError::OutOfBounds {
            x: event.x,
            y: event.y,
        });
    }
    match event.kind {
        EventKind::CarveCell => grid.set_flag(x, y, CellFlags::VISITED_GEN, true),
        EventKind::ConnectCells => {
            let dir = u8::try_from(event.aux)
                .ok()
                .and_then(Dir::from_index)
                .ok_or(ReplayError::BadDirection { aux: event.aux })?;
            grid.carve(x, y, dir).map_err(|_| ReplayError::OutOfBounds {
                x: event.x,
                y: event.y,
            })?;
        }
        EventKind::Visit => grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true),
        EventKind::Path => grid.set_flag(x, y, CellFlags::ON_PATH, true),
        EventKind::ClearVisit => grid.set_flag(x, y, CellFlags::SOLVER, false),
    }
    Ok(())
}

/// Replays a recorded event sequence onto a grid.
///
/// The grid is taken as-is: for a solve recording pass the loaded maze,
/// for a generation recording use [`replay_generation`].
pub fn replay<'a, I: IntoIterator<Item = &'a Event>>(
    grid: &mut Grid,
    events: I,
) -> Result<(), ReplayError> {
    for event in events {
        apply(grid, event)?;
    }
    Ok(())
}

/// Replays a generation recording onto a grid, first restoring the
/// all-walls state every generator starts from.
pub fn replay_generation<'a, I: IntoIterator<Item = &'a Event>>(
    grid: &mut Grid,
    events: I,
) -> Result<(), ReplayError> {
    grid.fill_walls();
    replay(grid, events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_reproduces_carving() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.fill_walls();
        let mut sink = RecordingSink::new();
        sink.on_event(Event::carve_cell(0, 0));
        sink.on_event(Event::connect(0, 0, Dir::East));
        sink.on_event(Event::carve_cell(1, 0));
        grid.set_flag(0, 0, CellFlags::VISITED_GEN, true);
        grid.carve(0, 0, Dir::East).unwrap();
        grid.set_flag(1, 0, CellFlags::VISITED_GEN, true);

        let mut replayed = Grid::new(3, 2).unwrap();
        replay_generation(&mut replayed, sink.events()).unwrap();
        assert_eq!(replayed.bytes(), grid.bytes());
    }

    #[test]
    fn test_bad_events_rejected() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.fill_walls();
        assert!(apply(&mut grid, &Event::carve_cell(5, 0)).is_err());
        assert_eq!(
            apply(
                &mut grid,
                &Event {
                    kind: EventKind::ConnectCells,
                    x: 0,
                    y: 0,
                    aux: 9
                }
            ),
            Err(ReplayError::BadDirection { aux: 9 })
        );
    }
}
