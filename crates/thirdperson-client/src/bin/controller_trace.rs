//! Headless controller trace.
//!
//! Runs the character controller against a flat ground plane with a scripted
//! input sequence and writes per-tick CSV telemetry to stdout. A JSON summary
//! goes to stderr.
//!
//! Run with: cargo run -p thirdperson-client --bin controller-trace -- double-jump

#[cfg(target_family = "wasm")]
fn main() {}

#[cfg(not(target_family = "wasm"))]
mod trace {
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};
    use glam::{Vec2, Vec3};
    use serde::Serialize;
    use thirdperson_client::{
        settings,
        telemetry::{
            StdoutTelemetryOutput, TelemetrySnapshot, emit_telemetry_to, reset_telemetry_to,
        },
    };
    use thirdperson_core::{
        AimRay, AnimationSignals, BodyState, CharacterControllerCore, Collaborators,
        CollisionQueries, LayerMask, RawInput,
    };

    /// Fixed timestep (60 Hz).
    const DT: f32 = 1.0 / 60.0;

    /// Ground layer bit, matching the game's physics layers.
    const GROUND_LAYER: u32 = 1;

    #[derive(Clone, Copy, Debug, ValueEnum)]
    enum Scenario {
        /// Walk forward, then stop.
        Walk,
        /// Sprint forward, then stop.
        Sprint,
        /// A single jump from standing.
        Jump,
        /// Jump, then double jump near the apex.
        DoubleJump,
        /// Drop from a height.
        Fall,
    }

    impl Scenario {
        fn duration(self) -> f32 {
            match self {
                Scenario::Walk | Scenario::Sprint => 4.0,
                Scenario::Jump => 2.5,
                Scenario::DoubleJump | Scenario::Fall => 3.0,
            }
        }

        fn start_height(self) -> f32 {
            match self {
                Scenario::Fall => 10.0,
                _ => 0.0,
            }
        }

        /// Input held at time `t`.
        fn input(self, t: f32) -> RawInput {
            let forward = Vec2::new(0.0, 1.0);
            match self {
                Scenario::Walk | Scenario::Sprint => RawInput {
                    movement: if t < 3.0 { forward } else { Vec2::ZERO },
                    sprint_held: matches!(self, Scenario::Sprint),
                    ..Default::default()
                },
                Scenario::Jump => RawInput {
                    jump_held: (0.6..0.7).contains(&t),
                    ..Default::default()
                },
                Scenario::DoubleJump => RawInput {
                    jump_held: (0.6..0.7).contains(&t) || (0.95..1.05).contains(&t),
                    ..Default::default()
                },
                Scenario::Fall => RawInput::default(),
            }
        }
    }

    #[derive(Parser)]
    #[command(about = "Trace the character controller over a scripted input sequence")]
    struct CliArgs {
        /// Input script to run.
        #[arg(value_enum, default_value_t = Scenario::Walk)]
        scenario: Scenario,

        /// Controller tuning file (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    }

    /// Infinite ground plane at y = 0. The aim ray never hits anything.
    struct FlatGround;

    impl CollisionQueries for FlatGround {
        fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
            mask.0 & GROUND_LAYER != 0 && center.y - radius <= 0.0
        }

        fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<Vec3> {
            None
        }
    }

    /// Measurements accumulated over the run.
    #[derive(Serialize, Default)]
    struct TraceSummary {
        scenario: String,
        ticks: u32,
        max_height: f32,
        top_horizontal_speed: f32,
        jumps: u32,
        flips: u32,
        /// Seconds until the first landing after leaving the ground.
        first_landing: Option<f32>,
    }

    pub fn run() {
        let args = CliArgs::parse();
        let config = match settings::load(args.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        };
        let mut controller = match CharacterControllerCore::new(config, 0.0) {
            Ok(controller) => controller,
            Err(e) => {
                eprintln!("invalid tuning: {e}");
                std::process::exit(1);
            }
        };

        let scenario = args.scenario;
        let mut body = BodyState {
            position: Vec3::new(0.0, scenario.start_height(), 0.0),
            velocity: Vec3::ZERO,
        };
        let mut signals = AnimationSignals::default();
        let mut output = StdoutTelemetryOutput;
        let mut summary = TraceSummary {
            scenario: format!("{scenario:?}"),
            ..Default::default()
        };
        let mut was_airborne = false;

        reset_telemetry_to(&mut output);

        let mut elapsed = 0.0;
        while elapsed < scenario.duration() {
            let input = scenario.input(elapsed);
            let mut collaborators = Collaborators {
                animation: Some(&mut signals),
                ..Default::default()
            };

            let tick = controller.tick(&input, body, DT, &FlatGround, &mut collaborators);

            let mut position = body.position + tick.displacement;
            position.y = position.y.max(0.0);
            body.velocity = (position - body.position) / DT;
            body.position = position;

            let ray = AimRay::new(body.position + Vec3::new(0.0, 1.5, 3.0), Vec3::NEG_Z);
            controller.late_tick(body.position, ray, DT, &FlatGround, &mut collaborators);

            if !tick.grounded {
                was_airborne = true;
            } else if was_airborne && summary.first_landing.is_none() {
                summary.first_landing = Some(elapsed);
            }

            let motion = controller.motion();
            let vertical = controller.vertical();
            summary.ticks += 1;
            summary.max_height = summary.max_height.max(body.position.y);
            summary.top_horizontal_speed = summary.top_horizontal_speed.max(motion.current_speed);

            emit_telemetry_to(
                &TelemetrySnapshot {
                    elapsed,
                    dt: DT,
                    move_x: input.movement.x,
                    move_y: input.movement.y,
                    sprint: input.sprint_held,
                    jump: input.jump_held,
                    grounded: tick.grounded,
                    free_fall: signals.free_fall,
                    double_jump_available: vertical.double_jump_available,
                    position: body.position,
                    velocity: body.velocity,
                    vertical_velocity: vertical.vertical_velocity,
                    current_speed: motion.current_speed,
                    animation_blend: motion.animation_blend,
                    facing_yaw: motion.facing_yaw,
                    jumps: signals.jumps,
                    flips: signals.flips,
                },
                &mut output,
            );

            elapsed += DT;
        }

        summary.jumps = signals.jumps;
        summary.flips = signals.flips;
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("failed to serialize summary: {e}"),
        }
    }
}

#[cfg(not(target_family = "wasm"))]
fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    trace::run();
}
