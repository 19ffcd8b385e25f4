//! Export helpers for CSV and JSON trajectory artifacts.

pub mod trajectory {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// One recorded sample.
    #[derive(Debug, Clone, Serialize)]
    pub struct Sample {
        pub time_s: f64,
        pub x_m: f64,
        pub y_m: f64,
        pub vx_m_s: f64,
        pub vy_m_s: f64,
        pub ax_m_s2: f64,
        pub ay_m_s2: f64,
        pub air_density_kg_m3: f64,
    }

    /// A trajectory with its metadata and samples.
    #[derive(Debug, Clone, Serialize)]
    pub struct TrajectoryRecord {
        pub id: u64,
        pub rank: usize,
        pub projectile: String,
        pub launch_height_m: f64,
        pub launch_angle_deg: f64,
        pub launch_speed_m_s: f64,
        pub air_resistance: bool,
        pub riders: usize,
        pub landed: bool,
        pub landing_x_m: Option<f64>,
        pub hit: Option<bool>,
        pub samples: Vec<Sample>,
    }

    #[derive(Serialize)]
    struct CsvRow<'a> {
        trajectory_id: u64,
        rank: usize,
        projectile: &'a str,
        time_s: f64,
        x_m: f64,
        y_m: f64,
        vx_m_s: f64,
        vy_m_s: f64,
        ax_m_s2: f64,
        ay_m_s2: f64,
        air_density_kg_m3: f64,
    }

    #[derive(Serialize)]
    struct JsonDocument<'a> {
        trajectories: &'a [TrajectoryRecord],
    }

    /// Write one CSV row per sample, trajectories in the given order.
    pub fn write_csv<W: Write>(writer: W, records: &[TrajectoryRecord]) -> io::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for record in records {
            for sample in &record.samples {
                csv.serialize(CsvRow {
                    trajectory_id: record.id,
                    rank: record.rank,
                    projectile: &record.projectile,
                    time_s: sample.time_s,
                    x_m: sample.x_m,
                    y_m: sample.y_m,
                    vx_m_s: sample.vx_m_s,
                    vy_m_s: sample.vy_m_s,
                    ax_m_s2: sample.ax_m_s2,
                    ay_m_s2: sample.ay_m_s2,
                    air_density_kg_m3: sample.air_density_kg_m3,
                })?;
            }
        }
        csv.flush()
    }

    /// Write a single pretty-printed JSON document.
    pub fn write_json<W: Write>(writer: W, records: &[TrajectoryRecord]) -> io::Result<()> {
        to_writer_pretty(
            writer,
            &JsonDocument {
                trajectories: records,
            },
        )?;
        Ok(())
    }

    /// Write to `path`, choosing JSON for `.json` files and CSV otherwise.
    pub fn write_to_path(path: &Path, records: &[TrajectoryRecord]) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        if path.extension().map(|ext| ext == "json").unwrap_or(false) {
            write_json(&mut writer, records)?;
        } else {
            write_csv(&mut writer, records)?;
        }
        writer.flush()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn record() -> TrajectoryRecord {
            TrajectoryRecord {
                id: 7,
                rank: 0,
                projectile: "cannonball".to_string(),
                launch_height_m: 0.0,
                launch_angle_deg: 45.0,
                launch_speed_m_s: 10.0,
                air_resistance: false,
                riders: 1,
                landed: false,
                landing_x_m: None,
                hit: None,
                samples: vec![
                    Sample {
                        time_s: 0.0,
                        x_m: 0.0,
                        y_m: 0.0,
                        vx_m_s: 7.0,
                        vy_m_s: 7.0,
                        ax_m_s2: 0.0,
                        ay_m_s2: -9.81,
                        air_density_kg_m3: 0.0,
                    },
                    Sample {
                        time_s: 0.025,
                        x_m: 0.175,
                        y_m: 0.17,
                        vx_m_s: 7.0,
                        vy_m_s: 6.75,
                        ax_m_s2: 0.0,
                        ay_m_s2: -9.81,
                        air_density_kg_m3: 0.0,
                    },
                ],
            }
        }

        #[test]
        fn csv_has_header_and_one_row_per_sample() {
            let mut buffer = Vec::new();
            write_csv(&mut buffer, &[record()]).unwrap();
            let text = String::from_utf8(buffer).unwrap();
            let lines: Vec<_> = text.lines().collect();
            assert_eq!(lines.len(), 3);
            assert!(lines[0].starts_with("trajectory_id,rank,projectile,time_s"));
            assert!(lines[1].starts_with("7,0,cannonball,0.0"));
        }

        #[test]
        fn json_path_writes_document() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("out/flight.json");
            write_to_path(&path, &[record()]).unwrap();
            let value: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(value["trajectories"][0]["id"], 7);
            assert_eq!(value["trajectories"][0]["samples"].as_array().unwrap().len(), 2);
            assert!(value["trajectories"][0]["landing_x_m"].is_null());
        }
    }
}
