//! Equilibrium solver binary for the bundled phantom games.
//!
//! Usage:
//!   cargo run --release --bin solve -- [OPTIONS]
//!
//! Options:
//!   --game <GAME>          dh3, adh3, dh2, adh2, pttt or apttt (default: dh2)
//!   --steps <N>            Solver steps to run (default: 1000)
//!   --report-every <N>     Measure exploitability every N steps (default: 100)
//!   --avg <SCHEME>         uniform, linear or quadratic (default: linear)
//!   --no-alternation       Update both players every step
//!   --dcfr                 Discounted CFR
//!   --rmplus               Regret matching+
//!   --predictive           Predictive CFR
//!   --config <FILE>        Solver configuration JSON (overrides the flags above)
//!   --uniform-only         Only evaluate the uniform strategy pair
//!
//! Logging goes through `RUST_LOG` (default: info).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use treeplex_solver::cfr::{
    AveragingScheme, CfrConf, CfrSolver, ConfigError, GameState, SolverResult, Traverser,
    MAX_ACTIONS,
};
use treeplex_solver::games::{
    AbruptDarkHex2, AbruptDarkHex3, AbruptPhantomTtt, DarkHex2, DarkHex3, PhantomTtt,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameKind {
    #[value(name = "dh3")]
    DarkHex3,
    #[value(name = "adh3")]
    AbruptDarkHex3,
    #[value(name = "dh2")]
    DarkHex2,
    #[value(name = "adh2")]
    AbruptDarkHex2,
    #[value(name = "pttt")]
    PhantomTtt,
    #[value(name = "apttt")]
    AbruptPhantomTtt,
}

#[derive(Parser, Debug)]
#[command(
    name = "solve",
    version,
    about = "CFR equilibrium solver for Dark Hex and Phantom Tic-Tac-Toe"
)]
struct Cli {
    /// Game to solve
    #[arg(long, value_enum, default_value = "dh2")]
    game: GameKind,

    /// Solver steps to run
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// Measure exploitability every N steps
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Averaging scheme for the average strategy
    #[arg(long, value_enum, default_value_t = AveragingScheme::Linear)]
    avg: AveragingScheme,

    /// Update both players from the same gradients every step
    #[arg(long)]
    no_alternation: bool,

    /// Discounted CFR
    #[arg(long)]
    dcfr: bool,

    /// Regret matching+
    #[arg(long)]
    rmplus: bool,

    /// Predictive CFR
    #[arg(long)]
    predictive: bool,

    /// Solver configuration JSON; overrides the variant flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only print ev and exploitability of the uniform strategies
    #[arg(long)]
    uniform_only: bool,
}

impl Cli {
    fn conf(&self) -> Result<CfrConf, ConfigError> {
        if let Some(path) = &self.config {
            info!("loading configuration from {}", path.display());
            return CfrConf::from_json_file(path);
        }
        let conf = CfrConf::new()
            .with_avg(self.avg)
            .with_alternation(!self.no_alternation)
            .with_dcfr(self.dcfr)
            .with_rmplus(self.rmplus)
            .with_predictive(self.predictive);
        conf.validate()?;
        Ok(conf)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.game {
        GameKind::DarkHex3 => run::<DarkHex3>(&cli),
        GameKind::AbruptDarkHex3 => run::<AbruptDarkHex3>(&cli),
        GameKind::DarkHex2 => run::<DarkHex2>(&cli),
        GameKind::AbruptDarkHex2 => run::<AbruptDarkHex2>(&cli),
        GameKind::PhantomTtt => run::<PhantomTtt>(&cli),
        GameKind::AbruptPhantomTtt => run::<AbruptPhantomTtt>(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run<G: GameState>(cli: &Cli) -> SolverResult<()> {
    println!("=================================================");
    println!("  Treeplex Solver: {:?}", cli.game);
    println!("=================================================");
    println!();

    let start_time = Instant::now();
    let mut traverser = Traverser::<G>::new()?;
    println!(
        "Infosets: {} (player 1), {} (player 2)",
        traverser.num_infosets(0)?,
        traverser.num_infosets(1)?
    );
    println!("Tree built in {:.2}s", start_time.elapsed().as_secs_f64());
    println!();

    if cli.uniform_only {
        let [s0, s1] = traverser.uniform_strategies();
        let out = traverser.ev_and_exploitability([&s0, &s1])?;
        println!("Uniform strategies:");
        println!("  ev0:            {:.6}", out.ev0);
        println!("  exploitability: {:.6} / {:.6}", out.expl[0], out.expl[1]);
        return Ok(());
    }

    let conf = cli.conf()?;
    println!("Configuration: {:?}", conf);
    println!("Steps: {}", cli.steps);
    println!();

    let mut solver = CfrSolver::new(traverser, conf)?;

    let progress = ProgressBar::new(cli.steps);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let interval = cli.report_every.clamp(1, cli.steps.max(1));
    let stats = solver.train_with_callback(cli.steps, interval, |stats| {
        progress.set_position(stats.iterations);
        if let Some(gap) = stats.exploitability {
            progress.set_message(format!("gap {:.6}", gap));
            info!(
                "step {:>8} | nash gap {:.6} | {:.1} steps/s",
                stats.iterations, gap, stats.iterations_per_second
            );
        }
    })?;
    progress.finish();

    println!();
    println!("Training complete!");
    println!("  Steps: {}", stats.iterations);
    println!("  Time: {:.2}s", stats.elapsed_seconds);
    println!("  Speed: {:.1} steps/s", stats.iterations_per_second);

    let out = solver.exploitability()?;
    println!("  ev0: {:.6}", out.ev0);
    println!(
        "  exploitability: {:.6} / {:.6} (nash gap {:.6})",
        out.expl[0],
        out.expl[1],
        out.nash_gap()
    );
    println!();

    for player in 0..2 {
        let avg = solver.avg_bh(player)?;
        let root = &avg[..MAX_ACTIONS];
        let moves: Vec<String> = root
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.0)
            .map(|(a, p)| format!("{}: {:.3}", a, p))
            .collect();
        println!("Player {} opening: {}", player + 1, moves.join(", "));
    }

    Ok(())
}
