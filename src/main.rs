use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, Level};

use path_ctrl::constraints::Constraints;
use path_ctrl::executor::SimulatedExecutor;
use path_ctrl::ik_solver::JacobianIkSolver;
use path_ctrl::kinematic_traits::Kinematics;
use path_ctrl::kinematics_impl::URKinematics;
use path_ctrl::parameters::ur_kinematics::Parameters;
use path_ctrl::parameters_from_file::PathConfig;
use path_ctrl::path_runner::PathRunner;
use path_ctrl::rrt::RRTPlanner;
use path_ctrl::time_parameterization::IterativeTimeParameterization;
use path_ctrl::utils::format_joints;

/// Moves the arm through the viewpoints of the path file, one line `x,y,z,roll,pitch,yaw` each.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
struct Args {
    /// Path file with viewpoints, positions in centimeters and angles in radians
    path_file: PathBuf,

    /// YAML run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Robot model, overrides the configuration
    #[arg(long, value_parser = ["ur3", "ur5", "ur10"])]
    robot: Option<String>,

    /// Execute the geometric path with nominal time stamps if time parameterization fails
    #[arg(long)]
    execute_unparameterized: bool,

    /// Debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut config = match &args.config {
        Some(file) => PathConfig::from_yaml_file(file)
            .with_context(|| format!("Failed to load configuration {}", file.display()))?,
        None => PathConfig::default(),
    };
    if let Some(robot) = args.robot {
        config.robot = robot;
    }
    if args.execute_unparameterized {
        config.run.execute_unparameterized = true;
    }

    let parameters = Parameters::by_name(&config.robot)
        .with_context(|| format!("Unknown robot model {}", config.robot))?;
    info!("Robot {}:\n{}", config.robot, parameters.to_yaml());
    info!("Joint names:");
    for name in &config.run.joint_names {
        info!("Joint {}", name);
    }

    let constraints = Constraints::default();
    let robot: Arc<dyn Kinematics> = Arc::new(URKinematics::new(parameters));
    let solver = JacobianIkSolver::new(robot.clone(), constraints.clone());
    let planner = RRTPlanner::new(robot.clone(), constraints);
    let timing = IterativeTimeParameterization {
        velocity_scaling: config.velocity_scaling,
        ..Default::default()
    };
    let executor = SimulatedExecutor::new(config.home);
    info!("Starting from {}", format_joints(&config.home));

    let mut runner = PathRunner::new(
        config.run,
        Box::new(solver),
        Box::new(planner),
        Box::new(timing),
        executor,
    );
    let summary = runner
        .run_file(&args.path_file)
        .with_context(|| format!("Failed to run path {}", args.path_file.display()))?;

    for outcome in &summary.outcomes {
        if let Err(err) = &outcome.result {
            println!("Viewpoint {} (line {}): {}", outcome.entry, outcome.line_number, err);
        }
    }
    println!(
        "{} viewpoints, {} executed, {} failed",
        summary.processed(), summary.executed(), summary.failed()
    );
    Ok(())
}
