//! xG Match Simulator CLI
//!
//! Season dataset JSON → Monte Carlo fixture report (text or JSON)

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use xg_core::{
    DatasetProvider, MatchConfiguration, SimParams, SimulationMode, SimulationRequest,
    SimulationResponse, Simulator, StopReason,
};

#[derive(Parser)]
#[command(name = "xg_sim")]
#[command(about = "Simulate football fixtures from historical shot xG", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run trials for a fixture and report outcome probabilities
    Simulate {
        #[command(flatten)]
        fixture: FixtureArgs,

        /// Number of trials
        #[arg(long, default_value_t = 10_000)]
        trials: u64,

        /// Worker threads (defaults to one per core)
        #[arg(long)]
        threads: Option<usize>,

        /// Run trials on the calling thread only
        #[arg(long, default_value = "false")]
        sequential: bool,

        /// Wall-clock limit in milliseconds; completed trials are kept
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Scorers listed per side
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Scorelines listed in text output
        #[arg(long, default_value_t = 10)]
        scorelines: usize,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the resolved modifiers and rates without running trials
    Plan {
        #[command(flatten)]
        fixture: FixtureArgs,
    },
}

#[derive(Args)]
struct FixtureArgs {
    /// Season dataset JSON file
    #[arg(long)]
    data: PathBuf,

    /// Home team identifier
    #[arg(long)]
    home: String,

    /// Away team identifier
    #[arg(long)]
    away: String,

    /// Season (defaults to the dataset's season)
    #[arg(long)]
    season: Option<i32>,

    /// Goal model: shot or poisson
    #[arg(long, default_value = "shot")]
    mode: SimulationMode,

    #[arg(long, default_value = "false")]
    exclude_penalties: bool,

    /// Use post-shot xG directly as the scoring probability
    #[arg(long, default_value = "false")]
    use_psxg: bool,

    #[arg(long)]
    home_advantage: Option<f64>,

    #[arg(long)]
    away_advantage: Option<f64>,

    /// Shooter to remove from the pool (repeatable)
    #[arg(long = "exclude-shooter")]
    exclude_shooters: Vec<String>,

    #[arg(long)]
    seed: Option<u64>,

    /// Tuning parameters JSON (falls back to XG_SIM_PARAMS_PATH, then defaults)
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl FixtureArgs {
    fn load(&self) -> Result<(DatasetProvider, MatchConfiguration, SimParams)> {
        let provider = DatasetProvider::load(&self.data)
            .with_context(|| format!("failed to load dataset {}", self.data.display()))?;

        let params = match &self.params {
            Some(path) => SimParams::load(path)
                .with_context(|| format!("failed to load params {}", path.display()))?,
            None => SimParams::from_env().context("failed to load params from environment")?,
        };

        let season = self.season.unwrap_or_else(|| provider.season());
        for team in [&self.home, &self.away] {
            if !provider.has_team(team) {
                log::warn!("{team} has no records in the dataset, neutral defaults apply");
            }
        }

        let mut config = MatchConfiguration::new(&self.home, &self.away, season)
            .with_mode(self.mode)
            .excluding_penalties(self.exclude_penalties)
            .using_post_shot_xg(self.use_psxg);
        let home_advantage = self.home_advantage.unwrap_or(config.home_advantage);
        let away_advantage = self.away_advantage.unwrap_or(config.away_advantage);
        config = config.with_advantages(home_advantage, away_advantage);
        for shooter in &self.exclude_shooters {
            config = config.excluding_shooter(shooter);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        Ok((provider, config, params))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            fixture,
            trials,
            threads,
            sequential,
            timeout_ms,
            top,
            scorelines,
            format,
        } => {
            if let Some(threads) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("failed to configure worker threads")?;
            }

            let (provider, config, params) = fixture.load()?;
            let request = SimulationRequest {
                top_scorers: top,
                parallel: !sequential,
                timeout_ms,
                params: Some(params),
                ..SimulationRequest::new(config, trials)
            };

            let response =
                xg_core::simulate_request(request, &provider).context("simulation failed")?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
                OutputFormat::Text => print_report(&response, scorelines),
            }
        }

        Commands::Plan { fixture } => {
            let (provider, config, params) = fixture.load()?;
            let simulator = Simulator::with_params(config, params, &provider)
                .context("failed to build simulator")?;
            println!("{}", serde_json::to_string_pretty(&simulator.plan_overview())?);
        }
    }

    Ok(())
}

fn print_report(response: &SimulationResponse, scorelines: usize) {
    let summary = &response.summary;
    let run = &response.run;

    println!(
        "{} ({}) vs {} ({})",
        summary.home_team_name,
        summary.home_abbreviation,
        summary.away_team_name,
        summary.away_abbreviation
    );
    println!(
        "   Mode: {}   Seed: {}   Trials: {}",
        summary.mode, summary.seed, summary.n_simulations
    );
    match run.stop {
        StopReason::Completed => {}
        StopReason::Cancelled => {
            println!("   Cancelled after {}/{} trials", run.completed, run.requested)
        }
        StopReason::TimedOut => println!(
            "   Timed out after {} ms: {}/{} trials",
            run.elapsed_ms, run.completed, run.requested
        ),
    }

    println!("\nOutcome");
    println!("   Home win: {:>6.2}%", summary.home_win_pct * 100.0);
    println!("   Draw:     {:>6.2}%", summary.draw_pct * 100.0);
    println!("   Away win: {:>6.2}%", summary.away_win_pct * 100.0);
    println!(
        "   Avg goals: {:.2} - {:.2} (expected {:.2} - {:.2})",
        summary.avg_home_goals,
        summary.avg_away_goals,
        response.plan.home.expected_goals,
        response.plan.away.expected_goals
    );

    println!("\nScorelines");
    for entry in response.scorelines.iter().take(scorelines) {
        println!(
            "   {:>2}-{:<2} {:>6.2}%  ({})",
            entry.home_goals,
            entry.away_goals,
            entry.probability * 100.0,
            entry.count
        );
    }

    for (team, scorers) in [
        (&summary.home_team_name, &response.home_top_scorers),
        (&summary.away_team_name, &response.away_top_scorers),
    ] {
        if scorers.is_empty() {
            continue;
        }
        println!("\nTop scorers: {team}");
        for scorer in scorers {
            let per_match = scorer.goals as f64 / summary.n_simulations as f64;
            println!("   {:<24} {:>8}  {:.3}/match", scorer.name, scorer.goals, per_match);
        }
    }
}
