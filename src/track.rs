use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One GPS sample as read from the track file. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trackpoint {
    pub time: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

/// A trackpoint with every field present, see [`Trackpoint::fix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub points: Vec<Trackpoint>,
}

impl Trackpoint {
    /// Returns the complete sample, or `None` when a field is missing or a
    /// coordinate is exactly 0.0 (some recorders write 0 for "no fix").
    pub fn fix(&self) -> Option<Fix> {
        let fix = Fix {
            time: self.time?,
            latitude: self.latitude?,
            longitude: self.longitude?,
            elevation: self.elevation?,
        };
        if fix.latitude == 0.0 || fix.longitude == 0.0 {
            return None;
        }
        Some(fix)
    }

    pub fn is_valid(&self) -> bool {
        self.fix().is_some()
    }
}

/// Reads every `trk` of a GPX file. Segments are flattened in document order.
pub fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let reader = std::io::BufReader::new(file);
    let gpx_data =
        gpx::read(reader).with_context(|| format!("Failed to read GPX file {:?}", path))?;

    let tracks: Vec<Track> = gpx_data
        .tracks
        .into_iter()
        .map(|trk| Track {
            name: trk.name,
            points: trk
                .segments
                .into_iter()
                .flat_map(|seg| seg.points)
                .map(|wpt| {
                    let point = wpt.point();
                    Trackpoint {
                        time: wpt.time.and_then(utc_time),
                        latitude: Some(point.y()),
                        longitude: Some(point.x()),
                        elevation: wpt.elevation,
                    }
                })
                .collect(),
        })
        .collect();

    for track in &tracks {
        debug!(
            "{:?}: track {:?} has {} points, {} valid",
            path,
            track.name,
            track.points.len(),
            track.points.iter().filter(|p| p.is_valid()).count()
        );
    }
    Ok(tracks)
}

fn utc_time(time: gpx::Time) -> Option<DateTime<Utc>> {
    let iso = time.format().ok()?;
    DateTime::parse_from_rfc3339(&iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Spreads out trackpoints that share a timestamp.
///
/// Recorders log to the whole second while the camera fires faster, so a
/// point whose recorded time lies between the previous point's recorded and
/// adjusted times (both inclusive) is moved to `interval` after the previous
/// point's adjusted time. A run of three equal times T becomes T,
/// T+interval, T+2*interval; a next point recorded at or before the last
/// adjusted time is pushed on rather than colliding with it. Times that go
/// backwards are left alone. A point without a time resets the run.
pub fn normalize(track: &mut Track, interval: Duration) {
    track
        .points
        .iter_mut()
        .fold(None, |last: Option<(DateTime<Utc>, DateTime<Utc>)>, point| {
            let original = point.time?;
            if let Some((last_original, last_adjusted)) = last {
                if last_original <= original && original <= last_adjusted {
                    point.time = Some(last_adjusted + interval);
                }
            }
            point.time.map(|adjusted| (original, adjusted))
        });
}
