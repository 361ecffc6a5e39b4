// astra_sim/src/simulation/core/telemetry.rs

use astra_core::prelude::Sensor;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::SimError;

/// Name of the leading time column.
pub const ELAPSED_TIME_COLUMN: &str = "elapsed_time[s]";

/// Writes one CSV row per logged base tick from the sensors' header/value accessors.
pub struct TelemetryWriter<W: io::Write> {
    writer: csv::Writer<W>,
    header_written: bool,
    rows: u64,
}

impl TelemetryWriter<File> {
    pub fn create(path: &Path) -> Result<Self, SimError> {
        tracing::info!("Writing telemetry to: {:?}", path);
        Ok(Self::from_csv(csv::Writer::from_path(path)?))
    }
}

impl<W: io::Write> TelemetryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::from_csv(csv::Writer::from_writer(inner))
    }

    fn from_csv(writer: csv::Writer<W>) -> Self {
        Self {
            writer,
            header_written: false,
            rows: 0,
        }
    }

    /// Writes the header row. Must come before the first data row.
    pub fn write_header<'a>(&mut self, sensors: impl IntoIterator<Item = &'a dyn Sensor>) -> Result<(), SimError> {
        let mut record = vec![ELAPSED_TIME_COLUMN.to_string()];
        for sensor in sensors {
            record.extend(sensor.log_header());
        }
        self.writer.write_record(&record)?;
        self.header_written = true;
        Ok(())
    }

    pub fn write_row<'a>(&mut self, elapsed_s: f64, sensors: impl IntoIterator<Item = &'a dyn Sensor>) -> Result<(), SimError> {
        if !self.header_written {
            return Err(SimError::Scenario("telemetry row written before the header".to_string()));
        }
        let mut record = vec![format!("{elapsed_s:.6}")];
        for sensor in sensors {
            record.extend(sensor.log_values().iter().map(ToString::to_string));
        }
        self.writer.write_record(&record)?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far (the header is not counted).
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), SimError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W, SimError> {
        self.writer.into_inner().map_err(|e| SimError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_core::prelude::*;

    fn receiver(id: u32) -> Box<dyn Sensor> {
        let params = GnssReceiverParams {
            antenna: AntennaPattern::Hemisphere,
            ..GnssReceiverParams::default()
        };
        Box::new(GnssReceiver::new(id, &params, &mut SeedSource::new(0)).unwrap())
    }

    #[test]
    fn header_then_rows() {
        let sensors = vec![receiver(0), receiver(1)];
        let mut telemetry = TelemetryWriter::new(Vec::new());
        telemetry.write_header(sensors.iter().map(|s| s.as_ref())).unwrap();
        telemetry.write_row(0.5, sensors.iter().map(|s| s.as_ref())).unwrap();
        assert_eq!(telemetry.rows(), 1);

        let text = String::from_utf8(telemetry.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "elapsed_time[s],gnss0_position_eci(x)[m],gnss0_position_eci(y)[m],gnss0_position_eci(z)[m],\
             gnss0_vis_flag,gnss0_vis_num,gnss1_position_eci(x)[m],gnss1_position_eci(y)[m],\
             gnss1_position_eci(z)[m],gnss1_vis_flag,gnss1_vis_num"
        );
        // Nothing has ticked yet, so both receivers publish the unavailable sentinel.
        assert_eq!(lines[1], "0.500000,0,0,0,0,0,0,0,0,0,0");
    }

    #[test]
    fn row_before_header_is_rejected() {
        let sensors = vec![receiver(0)];
        let mut telemetry = TelemetryWriter::new(Vec::new());
        assert!(telemetry.write_row(0.0, sensors.iter().map(|s| s.as_ref())).is_err());
    }
}
