use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use cannon_range::config::{SimulationSettings, load_projectiles, load_settings};
use cannon_range::export::trajectory::{Sample, TrajectoryRecord, write_to_path};
use cannon_range::sim::catalog;
use cannon_range::sim::{
    LaunchParameters, ProjectileSpec, Session, SimulationError, SimulationSpeed, TargetZone,
};

#[derive(Parser)]
#[command(author, version, about = "Fire the cannon and report where the shots land")]
struct Cli {
    /// Projectile name (case-insensitive), looked up in --catalog or the built-in types
    #[arg(long, default_value = "cannonball")]
    projectile: String,

    /// Projectile catalog (YAML list, TOML record, or directory of TOML records)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Simulation settings file (TOML or YAML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Cannon height in metres
    #[arg(long, default_value_t = 0.0)]
    height: f64,

    /// Cannon angle in degrees above horizontal
    #[arg(long, default_value_t = 45.0, allow_negative_numbers = true)]
    angle: f64,

    /// Launch speed in m/s
    #[arg(long, default_value_t = 15.0)]
    speed: f64,

    /// Override the projectile diameter (m)
    #[arg(long)]
    diameter: Option<f64>,

    /// Override the projectile drag coefficient
    #[arg(long)]
    drag: Option<f64>,

    /// Enable air resistance
    #[arg(long, default_value_t = false)]
    air_resistance: bool,

    /// Launch site altitude in metres
    #[arg(long)]
    altitude: Option<f64>,

    /// Gravitational acceleration in m/s²
    #[arg(long)]
    gravity: Option<f64>,

    /// Target centre downrange (m)
    #[arg(long)]
    target_x: Option<f64>,

    /// Target half-width (m)
    #[arg(long)]
    target_half_width: Option<f64>,

    /// Number of shots to fire
    #[arg(long, default_value_t = 1)]
    shots: usize,

    /// Simulated seconds between shots (0 fires them together)
    #[arg(long, default_value_t = 0.0)]
    shot_interval: f64,

    /// Playback speed
    #[arg(long, value_enum, default_value_t = SpeedMode::Normal)]
    speed_mode: SpeedMode,

    /// Frame delta fed to the clock (s)
    #[arg(long, default_value_t = 0.016)]
    frame_delta: f64,

    /// Stop after this many frame-seconds even if shots are still flying
    #[arg(long, default_value_t = 120.0)]
    max_time: f64,

    /// Write recorded trajectories to this path (.json for JSON, otherwise CSV, `-` for stdout)
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum SpeedMode {
    Normal,
    Slow,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => SimulationSettings::default(),
    };
    let spec = select_projectile(&cli)?;

    let mut session = Session::new(settings)?;
    session.set_air_resistance_enabled(cli.air_resistance);
    if let Some(altitude) = cli.altitude {
        session.set_altitude(altitude)?;
    }
    if let Some(gravity) = cli.gravity {
        session.set_gravity(gravity)?;
    }
    if cli.target_x.is_some() || cli.target_half_width.is_some() {
        let current = *session.target();
        session.set_target_zone(TargetZone::new(
            cli.target_x.unwrap_or(current.center_x_m),
            cli.target_half_width.unwrap_or(current.half_width_m),
        ))?;
    }
    session.set_speed(match cli.speed_mode {
        SpeedMode::Normal => SimulationSpeed::Normal,
        SpeedMode::Slow => SimulationSpeed::Slow,
    });
    session.play();

    let mut launch = LaunchParameters::new(spec, cli.height, cli.angle, cli.speed);
    if let Some(diameter) = cli.diameter {
        launch = launch.with_diameter(diameter);
    }
    if let Some(drag) = cli.drag {
        launch = launch.with_drag_coefficient(drag);
    }

    let frame_delta = cli.frame_delta.max(1e-4);
    let mut refused = 0usize;
    let mut elapsed = 0.0;
    let mut next_shot_at = 0.0;
    let mut fired = 0usize;
    while elapsed < cli.max_time {
        while fired < cli.shots && elapsed + 1e-12 >= next_shot_at {
            match session.fire(launch.clone()) {
                Ok(_) => {}
                Err(SimulationError::CapacityExceeded { .. }) => refused += 1,
                Err(err) => return Err(err.into()),
            }
            fired += 1;
            next_shot_at += cli.shot_interval.max(0.0);
        }
        if fired >= cli.shots && session.pool().flying_count() == 0 {
            break;
        }
        session.advance(frame_delta);
        elapsed += frame_delta;
    }

    print_summary(&session, &launch, refused);

    if let Some(path) = &cli.export {
        write_to_path(path, &export_records(&session))?;
    }

    Ok(())
}

fn select_projectile(cli: &Cli) -> anyhow::Result<ProjectileSpec> {
    Ok(match &cli.catalog {
        Some(path) => {
            let configs = load_projectiles(path)?;
            catalog::select(&configs, Some(&cli.projectile))?
        }
        None => catalog::builtin(&cli.projectile)?,
    })
}

fn print_summary(session: &Session, launch: &LaunchParameters, refused: usize) {
    let target = session.target();
    let env = session.environment();
    println!("=== Range Summary ===");
    println!(
        "Projectile     : {} ({:.3} kg, d = {:.3} m, Cd = {:.2})",
        launch.spec.name, launch.spec.mass_kg, launch.diameter_m, launch.drag_coefficient
    );
    println!(
        "Launch         : h = {:.2} m, angle = {:.1} deg, v = {:.2} m/s",
        launch.launch_height_m, launch.launch_angle_deg, launch.launch_speed_m_s
    );
    println!(
        "Environment    : g = {:.2} m/s², air resistance {}, site altitude = {:.0} m",
        env.gravity_m_s2,
        if env.air_resistance_enabled { "on" } else { "off" },
        env.site_altitude_m
    );
    println!(
        "Target         : x = {:.2} m ± {:.2} m",
        target.center_x_m, target.half_width_m
    );
    println!(
        "Trajectories   : {} (refused shots: {})",
        session.pool().len(),
        refused
    );
    for ranked in session.trajectories() {
        let t = ranked.trajectory;
        let outcome = match t.score() {
            Some(score) => format!(
                "landed at x = {:.3} m, {}",
                score.landing_x_m,
                if score.hit { "HIT" } else { "miss" }
            ),
            None => "still flying".to_string(),
        };
        println!(
            "  [rank {}] {} riders = {}, samples = {}, {}",
            ranked.rank,
            t.id(),
            t.riders().len(),
            t.points().len(),
            outcome
        );
    }
}

fn export_records(session: &Session) -> Vec<TrajectoryRecord> {
    session
        .trajectories()
        .map(|ranked| {
            let t = ranked.trajectory;
            let launch = t.launch();
            TrajectoryRecord {
                id: t.id().0,
                rank: ranked.rank,
                projectile: launch.spec.name.clone(),
                launch_height_m: launch.launch_height_m,
                launch_angle_deg: launch.launch_angle_deg,
                launch_speed_m_s: launch.launch_speed_m_s,
                air_resistance: t.environment().air_resistance_enabled,
                riders: t.riders().len(),
                landed: t.is_landed(),
                landing_x_m: t.score().map(|s| s.landing_x_m),
                hit: t.score().map(|s| s.hit),
                samples: t
                    .points()
                    .iter()
                    .map(|p| Sample {
                        time_s: p.time_s,
                        x_m: p.position[0],
                        y_m: p.position[1],
                        vx_m_s: p.velocity[0],
                        vy_m_s: p.velocity[1],
                        ax_m_s2: p.acceleration[0],
                        ay_m_s2: p.acceleration[1],
                        air_density_kg_m3: p.air_density_kg_m3,
                    })
                    .collect(),
            }
        })
        .collect()
}
