//! Run the local planner against a simulated robot and lidar.
//!
//! Usage:
//!   cargo run --bin dwa_sim -- --goal-x 5 --goal-y 1 --svg ./img/dwa_sim.svg
//!   RUST_LOG=debug cargo run --bin dwa_sim -- --config configs/dwa_planner.yaml

use clap::Parser;

use dwa_planner::common::{Obstacles, Point2D, Pose2D};
use dwa_planner::config::PlannerConfig;
use dwa_planner::control::ControlCycle;
use dwa_planner::simulation::{CircleObstacle, SimRobot, Simulation, World};
use dwa_planner::utils::render_run_svg;

/// Local planner simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Planner configuration file (YAML); defaults are used when absent
    #[arg(short, long)]
    config: Option<String>,

    /// Goal x coordinate in the odometry frame
    #[arg(long, default_value = "5.0")]
    goal_x: f64,

    /// Goal y coordinate in the odometry frame
    #[arg(long, default_value = "0.0")]
    goal_y: f64,

    /// Seed for the trajectory sampler (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum control ticks before giving up
    #[arg(long, default_value = "3000")]
    max_steps: usize,

    /// Seconds each command is held
    #[arg(long, default_value = "0.1")]
    dt: f64,

    /// Write a plot of the run to this SVG file
    #[arg(long)]
    svg: Option<String>,
}

fn scenario() -> World {
    World::new(vec![
        CircleObstacle::new(3.0, 0.2, 0.3),
        CircleObstacle::new(2.0, 2.5, 0.3),
        CircleObstacle::new(4.5, -2.0, 0.4),
    ])
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match PlannerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => PlannerConfig::default(),
    };
    if args.seed.is_some() {
        config.sampling.seed = args.seed;
    }

    let mut cycle = match ControlCycle::new(config) {
        Ok(cycle) => cycle,
        Err(e) => {
            log::error!("Invalid planner configuration: {}", e);
            std::process::exit(1);
        }
    };
    cycle.set_goal(args.goal_x, args.goal_y);

    let world = scenario();
    let outline = Obstacles::from_points(world.outline(24));
    let mut sim = Simulation::new(cycle, SimRobot::new(Pose2D::origin()), world, args.dt);
    let result = sim.run(args.max_steps);

    let end = sim.robot.pose();
    println!(
        "steps: {}, reached: {}, stuck ticks: {}, collided: {}, \
         final pose: ({:.3}, {:.3}, {:.3}), driven: {:.2} m",
        result.steps,
        result.reached,
        result.stuck_ticks,
        result.collided,
        end.x,
        end.y,
        end.yaw,
        result.trajectory.total_length()
    );

    if let Some(svg) = &args.svg {
        let goal = Point2D::new(args.goal_x, args.goal_y);
        if let Err(e) = render_run_svg(svg, &outline, &result.trajectory, &result.last_plan, goal) {
            log::error!("Failed to write {}: {}", svg, e);
            std::process::exit(1);
        }
    }

    if !result.reached {
        std::process::exit(2);
    }
}
