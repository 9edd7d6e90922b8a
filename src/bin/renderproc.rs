use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use renderproc::headless::{HeadlessOptions, HeadlessPassFactory, HeadlessWorld, headless_registry};
use renderproc::{FrameEngine, LoadOutcome, Settings};

#[derive(Parser, Debug)]
#[command(name = "renderproc", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a renderer config and print the built step sequence.
    Inspect(InspectArgs),
    /// Load a renderer config and render frames with headless collaborators.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Renderer config JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Renderer config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Number of frames to render.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// Synthetic scene object count.
    #[arg(long, default_value_t = 1024)]
    objects: usize,

    /// Shadow frustums contributed per frame.
    #[arg(long, default_value_t = 2)]
    shadow_cascades: usize,

    /// Culling worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(
    path: &std::path::Path,
    opts: &HeadlessOptions,
) -> anyhow::Result<(FrameEngine<HeadlessPassFactory>, HeadlessWorld)> {
    let mut world = HeadlessWorld::new(opts)?;
    let mut engine = FrameEngine::new(
        Settings::for_file(path),
        headless_registry(opts.shadow_cascades),
        HeadlessPassFactory::default(),
    );
    let outcome = engine
        .load_renderer_config(&mut world.uniforms)
        .with_context(|| format!("load renderer config '{}'", path.display()))?;
    if let LoadOutcome::Missing { path } = outcome {
        anyhow::bail!("renderer config '{}' not found", path.display());
    }
    world
        .render_system
        .register_pipeline_images(engine.steps(), engine.names());
    Ok((engine, world))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (engine, _world) = load(&args.config, &HeadlessOptions::default())?;
    if let Some(name) = engine.config_name() {
        println!("config: {name}");
    }
    print!("{}", engine.dump());
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let opts = HeadlessOptions {
        objects: args.objects,
        shadow_cascades: args.shadow_cascades,
        threads: args.threads,
        ..HeadlessOptions::default()
    };
    let (mut engine, mut world) = load(&args.config, &opts)?;

    let delta_t = 1.0 / 60.0;
    for _ in 0..args.frames {
        let stats = engine.render_frame(delta_t, &mut world.services());
        println!(
            "frame={} steps={} frustums={} draw_calls={} mesh_components={} dropped={} barriers={}",
            stats.frame.0,
            stats.steps,
            stats.frustums,
            stats.draw_calls,
            stats.mesh_components,
            stats.dropped,
            world.render_system.barriers().len(),
        );
    }
    Ok(())
}
