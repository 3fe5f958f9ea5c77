use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::{EventKind, SimEvent, Termination, Trajectory};

/// Summary statistics computed from a launch trajectory.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub max_altitude_m: f64,
    pub max_altitude_time_s: f64,
    pub max_speed_ms: f64,
    pub burnout_speed_ms: Option<f64>,
    pub flight_time_s: f64,
    pub final_altitude_m: f64,
    pub impacted: bool,
    pub steps: usize,
    pub events: Vec<SimEvent>,
}

impl FlightSummary {
    /// Compute summary from trajectory data.
    pub fn from_trajectory(traj: &Trajectory, radius_earth: f64) -> Self {
        let (max_altitude_m, max_altitude_time_s) = traj
            .samples()
            .iter()
            .map(|s| (s.state.altitude(radius_earth), s.time))
            .fold((f64::NEG_INFINITY, 0.0), |best, cur| if cur.0 > best.0 { cur } else { best });

        let max_speed_ms = traj
            .samples()
            .iter()
            .map(|s| s.state.speed())
            .fold(0.0_f64, f64::max);

        let first = traj.first();
        let last = traj.last();

        FlightSummary {
            max_altitude_m,
            max_altitude_time_s,
            max_speed_ms,
            burnout_speed_ms: traj.first_event(&EventKind::ThrustCutoff).map(|e| e.speed),
            flight_time_s: last.time - first.time,
            final_altitude_m: last.state.altitude(radius_earth),
            impacted: traj.termination() == Termination::Impact,
            steps: traj.samples().len() - 1,
            events: traj.events().to_vec(),
        }
    }
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &FlightSummary) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, summary)?;
    file.flush()
}
