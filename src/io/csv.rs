use std::io::{self, Write};
use std::path::Path;

use crate::sim::Sample;

/// Write trajectory data to CSV format.
///
/// Columns: time, x, y, z, dx, dy, dz, mass, altitude, speed
/// (ECEF metres and m/s; altitude above a sphere of `radius_earth`).
pub fn write_trajectory<W: Write>(
    writer: &mut W,
    samples: &[Sample],
    radius_earth: f64,
) -> io::Result<()> {
    writeln!(writer, "time,x,y,z,dx,dy,dz,mass,altitude,speed")?;

    for s in samples {
        let st = &s.state;
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            s.time,
            st.pos.x, st.pos.y, st.pos.z,
            st.vel.x, st.vel.y, st.vel.z,
            st.mass,
            st.altitude(radius_earth),
            st.speed(),
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file<P: AsRef<Path>>(
    path: P,
    samples: &[Sample],
    radius_earth: f64,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, samples, radius_earth)?;
    file.flush()
}
