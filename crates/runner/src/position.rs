use std::{collections::VecDeque, io};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use model::geo_point::GeoPoint;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{RunError, RunResult};

/// A position reading and the time it was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub position: GeoPoint,
    pub at: DateTime<Utc>,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64, at: DateTime<Utc>) -> Self {
        Self {
            position: GeoPoint {
                latitude,
                longitude,
            },
            at,
        }
    }
}

/// Delivers position fixes in chronological order.
#[async_trait]
pub trait PositionSource: Send {
    /// Waits for the next fix. `None` means no more fixes will come.
    /// Must be cancel safe: dropping the future must not lose a fix.
    async fn next_fix(&mut self) -> Option<PositionFix>;
}

/// Plays back a recorded list of fixes.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    fixes: VecDeque<PositionFix>,
}

#[derive(Debug, Deserialize)]
struct FixRow {
    latitude: f64,
    longitude: f64,
    seconds: f64,
}

impl ReplaySource {
    pub fn new(fixes: impl IntoIterator<Item = PositionFix>) -> Self {
        Self {
            fixes: fixes.into_iter().collect(),
        }
    }

    /// Reads `latitude,longitude,seconds` rows, `seconds` being the offset
    /// of the fix from `start`.
    pub fn from_csv<R: io::Read>(reader: R, start: DateTime<Utc>) -> RunResult<Self> {
        let mut fixes = VecDeque::new();
        for row in csv::Reader::from_reader(reader).deserialize() {
            let row: FixRow = row?;
            let at = fix_time(start, row.seconds).ok_or(RunError::InvalidOffset(row.seconds))?;
            fixes.push_back(PositionFix::new(row.latitude, row.longitude, at));
        }
        Ok(Self { fixes })
    }

    pub fn peek(&self) -> Option<&PositionFix> {
        self.fixes.front()
    }

    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }
}

fn fix_time(start: DateTime<Utc>, seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    start.checked_add_signed(Duration::try_milliseconds(millis as i64)?)
}

#[async_trait]
impl PositionSource for ReplaySource {
    async fn next_fix(&mut self) -> Option<PositionFix> {
        self.fixes.pop_front()
    }
}

/// Receives fixes pushed by a location provider callback.
pub struct ChannelSource {
    receiver: mpsc::Receiver<PositionFix>,
}

impl ChannelSource {
    pub fn new(buffer: usize) -> (mpsc::Sender<PositionFix>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self { receiver })
    }
}

#[async_trait]
impl PositionSource for ChannelSource {
    async fn next_fix(&mut self) -> Option<PositionFix> {
        self.receiver.recv().await
    }
}
