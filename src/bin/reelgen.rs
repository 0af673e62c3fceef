use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use reelgen::{
    CommandRenderer, CompileOptions, InMemoryRenderer, ReelConfig, Timeline, TimelineRenderer,
    TimingPolicy, VideoDefinition, compile_timeline, ensure_parent_dir, resolve_checked,
};

#[derive(Parser, Debug)]
#[command(name = "reelgen", version, about = "Validate and compile JSON video plans")]
struct Cli {
    /// TOML config file (defaults to ./reelgen.toml when present).
    #[arg(long, global = true, env = "REELGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `reelgen=debug`. Falls back to RUST_LOG.
    #[arg(long, global = true, env = "REELGEN_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a plan and print a one-line summary.
    Validate(PlanArgs),
    /// Print the resolved scene schedule as JSON.
    Schedule(PlanArgs),
    /// Compile a plan into a timeline JSON.
    Compile(CompileArgs),
    /// Compile a plan and hand it to the external renderer.
    Render(RenderArgs),
    /// Validate and compile many plans in parallel.
    Check(CheckArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimingArg {
    StartAtZero,
    Sequential,
}

impl From<TimingArg> for TimingPolicy {
    fn from(t: TimingArg) -> Self {
        match t {
            TimingArg::StartAtZero => TimingPolicy::StartAtZero,
            TimingArg::Sequential => TimingPolicy::Sequential,
        }
    }
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input plan JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Rule for scenes without explicit timing (overrides config).
    #[arg(long, value_enum, env = "REELGEN_TIMING")]
    timing: Option<TimingArg>,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    #[command(flatten)]
    plan: PlanArgs,

    /// Output timeline JSON; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    plan: PlanArgs,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Render program (overrides config).
    #[arg(long)]
    program: Option<String>,

    /// Fail instead of replacing an existing output.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Compile and report without running the renderer.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Plan files to check.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    #[arg(long, value_enum, env = "REELGEN_TIMING")]
    timing: Option<TimingArg>,

    /// Treat skipped scenes as failures.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let cfg = ReelConfig::load(cli.config.as_deref()).context("load config")?;
    match cli.cmd {
        Command::Validate(args) => cmd_validate(&cfg, args),
        Command::Schedule(args) => cmd_schedule(&cfg, args),
        Command::Compile(args) => cmd_compile(&cfg, args),
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Check(args) => cmd_check(&cfg, args),
    }
}

fn init_tracing(level: Option<&str>) {
    use tracing_subscriber::EnvFilter;
    let filter = match level {
        Some(l) => EnvFilter::new(l),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn compile_options(cfg: &ReelConfig, timing: Option<TimingArg>) -> CompileOptions {
    let mut opts = cfg.compile_options();
    if let Some(t) = timing {
        opts.timing = t.into();
    }
    opts
}

fn load_plan(path: &Path) -> anyhow::Result<VideoDefinition> {
    VideoDefinition::from_path(path).with_context(|| format!("invalid plan '{}'", path.display()))
}

fn cmd_validate(cfg: &ReelConfig, args: PlanArgs) -> anyhow::Result<()> {
    let def = load_plan(&args.in_path)?;
    let opts = compile_options(cfg, args.timing);
    let tl = compile_timeline(&def, &opts)?;
    println!(
        "ok {}: {} scenes, {} scheduled, {} skipped, {} frames @ {} fps",
        def.meta.id,
        def.scenes.len(),
        tl.entries.len(),
        tl.skipped.len(),
        tl.duration_in_frames,
        tl.fps.0
    );
    for s in &tl.skipped {
        println!("  skipped {}: {}", s.scene_id, s.error);
    }
    Ok(())
}

fn cmd_schedule(cfg: &ReelConfig, args: PlanArgs) -> anyhow::Result<()> {
    let def = load_plan(&args.in_path)?;
    let opts = compile_options(cfg, args.timing);
    let resolved = resolve_checked(&def, opts.timing)
        .with_context(|| format!("invalid plan '{}'", args.in_path.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&resolved).context("serialize schedule")?
    );
    Ok(())
}

fn cmd_compile(cfg: &ReelConfig, args: CompileArgs) -> anyhow::Result<()> {
    let def = load_plan(&args.plan.in_path)?;
    let tl = compile_timeline(&def, &compile_options(cfg, args.plan.timing))?;
    let json = tl.to_json_pretty()?;
    match &args.out {
        Some(out) => {
            ensure_parent_dir(out)?;
            std::fs::write(out, json)
                .with_context(|| format!("write timeline '{}'", out.display()))?;
            eprintln!(
                "wrote {} ({} entries, fingerprint {})",
                out.display(),
                tl.entries.len(),
                tl.fingerprint()?
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_render(cfg: &ReelConfig, args: RenderArgs) -> anyhow::Result<()> {
    let def = load_plan(&args.plan.in_path)?;
    let tl = compile_timeline(&def, &compile_options(cfg, args.plan.timing))?;

    let mut opts = cfg.renderer_opts();
    if let Some(program) = args.program {
        opts.program = program;
    }
    if args.no_overwrite {
        opts.overwrite = false;
    }

    let mut renderer: Box<dyn TimelineRenderer> = if args.dry_run {
        Box::new(InMemoryRenderer::new())
    } else {
        let r = CommandRenderer::new(opts)?;
        tracing::info!(
            program = %r.opts().program,
            overwrite = r.opts().overwrite,
            "using render command"
        );
        Box::new(r)
    };
    let report = renderer.render(&tl, &args.out)?;

    match &report.manifest {
        Some(m) => eprintln!(
            "rendered {} ({} frames, manifest {})",
            report.output.display(),
            report.frames,
            m.display()
        ),
        None => eprintln!(
            "dry run: {} would receive {} frames",
            report.output.display(),
            report.frames
        ),
    }
    Ok(())
}

fn check_one(path: &Path, opts: &CompileOptions) -> anyhow::Result<Timeline> {
    let def = load_plan(path)?;
    Ok(compile_timeline(&def, opts)?)
}

fn cmd_check(cfg: &ReelConfig, args: CheckArgs) -> anyhow::Result<()> {
    let opts = compile_options(cfg, args.timing);
    let results: Vec<(&PathBuf, anyhow::Result<Timeline>)> = args
        .paths
        .par_iter()
        .map(|p| (p, check_one(p, &opts)))
        .collect();

    let mut failed = 0usize;
    for (path, result) in &results {
        match result {
            Ok(tl) if tl.skipped.is_empty() || !args.strict => {
                println!(
                    "ok   {} ({} entries, {} skipped)",
                    path.display(),
                    tl.entries.len(),
                    tl.skipped.len()
                );
            }
            Ok(tl) => {
                failed += 1;
                println!("FAIL {} ({} skipped scenes)", path.display(), tl.skipped.len());
                for s in &tl.skipped {
                    println!("  {}: {}", s.scene_id, s.error);
                }
            }
            Err(e) => {
                failed += 1;
                println!("FAIL {}", path.display());
                for line in format!("{e:#}").lines() {
                    println!("  {line}");
                }
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} plans failed", results.len());
    }
    Ok(())
}
