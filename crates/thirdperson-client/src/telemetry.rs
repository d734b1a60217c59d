//! Controller telemetry logging.
//!
//! Outputs one CSV row per simulation tick. Supports multiple output
//! destinations via the `TelemetryOutput` trait.

use glam::Vec3;

/// Snapshot of the controller state for one tick.
pub struct TelemetrySnapshot {
    pub elapsed: f32,
    pub dt: f32,
    pub move_x: f32,
    pub move_y: f32,
    pub sprint: bool,
    pub jump: bool,
    pub grounded: bool,
    pub free_fall: bool,
    pub double_jump_available: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    pub vertical_velocity: f32,
    pub current_speed: f32,
    pub animation_blend: f32,
    pub facing_yaw: f32,
    pub jumps: u32,
    pub flips: u32,
}

/// Trait for telemetry output destinations.
pub trait TelemetryOutput {
    /// Write the CSV header.
    fn write_header(&mut self, header: &str);
    /// Write a data row.
    fn write_row(&mut self, row: &str);
}

/// Stdout output for the headless trace binary.
pub struct StdoutTelemetryOutput;

impl TelemetryOutput for StdoutTelemetryOutput {
    fn write_header(&mut self, header: &str) {
        println!("{header}");
    }

    fn write_row(&mut self, row: &str) {
        println!("{row}");
    }
}

/// In-memory output, mostly for tests.
#[derive(Default)]
pub struct BufferTelemetryOutput {
    pub lines: Vec<String>,
}

impl TelemetryOutput for BufferTelemetryOutput {
    fn write_header(&mut self, header: &str) {
        self.lines.clear();
        self.lines.push(header.to_string());
    }

    fn write_row(&mut self, row: &str) {
        self.lines.push(row.to_string());
    }
}

/// Macro to define the CSV schema and generate the telemetry functions.
///
/// Column names and formats come from a single definition, keeping the header
/// and the rows in sync.
macro_rules! define_telemetry {
    (
        columns: { $( $name:ident : $fmt:literal ),* $(,)? },
        prelude: |$snapshot:ident| { $( $prelude:stmt );* $(;)? },
        row_values: { $( $val:expr ),* $(,)? }
    ) => {
        /// CSV header string.
        const CSV_HEADER: &str = concat!( $( stringify!($name), "," ),* );

        /// Write the header to the specified output.
        pub fn reset_telemetry_to(output: &mut dyn TelemetryOutput) {
            output.write_header(CSV_HEADER.trim_end_matches(','));
        }

        /// Write one row to the specified output.
        pub fn emit_telemetry_to($snapshot: &TelemetrySnapshot, output: &mut dyn TelemetryOutput) {
            // Execute prelude to compute derived values.
            $( $prelude )*

            // Generate row from schema, then trim trailing comma.
            let line = format!( concat!( $( $fmt, "," ),* ), $( $val ),* );
            let line = line.trim_end_matches(',');

            output.write_row(line);
        }
    };
}

define_telemetry! {
    columns: {
        t: "{:.4}",
        dt: "{:.5}",
        move_x: "{:.2}",
        move_y: "{:.2}",
        sprint: "{}",
        jump: "{}",
        grounded: "{}",
        free_fall: "{}",
        double_jump: "{}",
        pos_x: "{:.3}",
        pos_y: "{:.3}",
        pos_z: "{:.3}",
        h_speed: "{:.3}",
        v_vel: "{:.3}",
        speed: "{:.3}",
        blend: "{:.3}",
        yaw_deg: "{:.2}",
        jumps: "{}",
        flips: "{}",
    },
    prelude: |t| {
        let horizontal_speed = Vec3::new(t.velocity.x, 0.0, t.velocity.z).length();
    },
    row_values: {
        t.elapsed,
        t.dt,
        t.move_x,
        t.move_y,
        u8::from(t.sprint),
        u8::from(t.jump),
        u8::from(t.grounded),
        u8::from(t.free_fall),
        u8::from(t.double_jump_available),
        t.position.x,
        t.position.y,
        t.position.z,
        horizontal_speed,
        t.vertical_velocity,
        t.current_speed,
        t.animation_blend,
        t.facing_yaw,
        t.jumps,
        t.flips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            elapsed: 0.5,
            dt: 1.0 / 60.0,
            move_x: 0.0,
            move_y: 1.0,
            sprint: true,
            jump: false,
            grounded: true,
            free_fall: false,
            double_jump_available: true,
            position: Vec3::new(0.0, 0.0, -1.25),
            velocity: Vec3::new(3.0, -2.0, 4.0),
            vertical_velocity: -2.0,
            current_speed: 5.0,
            animation_blend: 4.5,
            facing_yaw: 0.0,
            jumps: 0,
            flips: 0,
        }
    }

    #[test]
    fn test_header_matches_row_width() {
        let mut output = BufferTelemetryOutput::default();
        reset_telemetry_to(&mut output);
        emit_telemetry_to(&snapshot(), &mut output);

        assert_eq!(output.lines.len(), 2);
        let header = output.lines[0].split(',').count();
        let row = output.lines[1].split(',').count();
        assert_eq!(header, row);
        assert!(output.lines[0].starts_with("t,dt,"));
    }

    #[test]
    fn test_row_values() {
        let mut output = BufferTelemetryOutput::default();
        emit_telemetry_to(&snapshot(), &mut output);
        let columns: Vec<&str> = output.lines[0].split(',').collect();
        assert_eq!(columns[4], "1");
        assert_eq!(columns[11], "-1.250");
        // Horizontal speed ignores the vertical component.
        assert_eq!(columns[12], "5.000");
    }
}
