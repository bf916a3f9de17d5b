mod api;
mod config;
mod locale;
mod puzzle;
mod report;
mod ui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;

use crate::api::{ApiServer, ApiServerConfig, ApiSharedState};
use crate::config::{Settings, load_settings};
use crate::locale::Language;
use crate::puzzle::model::{CrossingInput, GroupColor, GroupCount};
use crate::report::CalculationReport;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLanguage {
    En,
    Ar,
}

impl From<CliLanguage> for Language {
    fn from(value: CliLanguage) -> Self {
        match value {
            CliLanguage::En => Language::English,
            CliLanguage::Ar => Language::Arabic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "summitcalc",
    version,
    about = "Minimum time for three car groups to reach the mountain top"
)]
struct Cli {
    /// Settings file; created by the GUI when missing.
    #[arg(long, global = true, default_value = "summitcalc.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the total time for the given group sizes and print it.
    Calc(CalcArgs),
    /// Serve the calculator over HTTP until interrupted.
    Serve(ApiArgs),
    /// Open the desktop calculator (default).
    Gui(GuiArgs),
}

#[derive(Args, Debug)]
struct CalcArgs {
    #[arg(long, allow_hyphen_values = true)]
    red: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    green: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    blue: Option<String>,

    /// Also print the number of trips per team.
    #[arg(long)]
    breakdown: bool,

    /// Print the full plan as JSON.
    #[arg(long, conflicts_with = "breakdown")]
    json: bool,

    #[arg(long, value_enum)]
    lang: Option<CliLanguage>,

    /// Reject negative, fractional or non-numeric sizes instead of clamping them.
    #[arg(long)]
    strict: bool,
}

const DEFAULT_API_BIND: &str = "0.0.0.0";
const DEFAULT_API_PORT: u16 = 8177;

#[derive(Args, Debug, Clone)]
struct ApiArgs {
    #[arg(long, default_value = DEFAULT_API_BIND)]
    api_bind: String,

    #[arg(long, default_value_t = DEFAULT_API_PORT)]
    api_port: u16,
}

impl Default for ApiArgs {
    fn default() -> Self {
        Self {
            api_bind: DEFAULT_API_BIND.to_string(),
            api_port: DEFAULT_API_PORT,
        }
    }
}

#[derive(Args, Debug, Default)]
struct GuiArgs {
    #[command(flatten)]
    api: ApiArgs,

    /// Do not start the HTTP API next to the window.
    #[arg(long)]
    no_api: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Gui(GuiArgs::default())) {
        Command::Calc(args) => run_calc(&args, &settings),
        Command::Serve(args) => {
            let server = start_api(&args)?;
            server.wait();
            Ok(())
        }
        Command::Gui(args) => run_gui(args, settings, cli.config),
    }
}

fn run_calc(args: &CalcArgs, settings: &Settings) -> Result<()> {
    let input = resolve_input(args, settings.groups)?;
    let language = args.lang.map(Language::from).unwrap_or(settings.language);
    debug!(
        "calc red={} green={} blue={} lang={}",
        input.red.get(),
        input.green.get(),
        input.blue.get(),
        language.code()
    );

    let report = CalculationReport::new(&input, language);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text(args.breakdown));
    }
    Ok(())
}

/// Counts given on the command line override the configured ones.
fn resolve_input(args: &CalcArgs, defaults: CrossingInput) -> Result<CrossingInput> {
    let mut input = defaults;
    for color in GroupColor::ALL {
        let raw = match color {
            GroupColor::Red => args.red.as_deref(),
            GroupColor::Green => args.green.as_deref(),
            GroupColor::Blue => args.blue.as_deref(),
        };
        let Some(raw) = raw else {
            continue;
        };
        input[color] = if args.strict {
            GroupCount::parse_strict(raw)
                .map_err(|err| anyhow!("invalid --{} value: {err}", color.as_str()))?
        } else {
            GroupCount::from_raw(raw)
        };
    }
    Ok(input)
}

fn start_api(args: &ApiArgs) -> Result<ApiServer> {
    ApiServer::start(ApiServerConfig {
        bind_addr: args.api_bind.clone(),
        port: args.api_port,
    })
    .with_context(|| {
        format!(
            "failed to start local API at {}:{}",
            args.api_bind, args.api_port
        )
    })
}

fn run_gui(args: GuiArgs, settings: Settings, settings_path: PathBuf) -> Result<()> {
    let api_args = args.api;
    let api_server = if args.no_api {
        None
    } else {
        Some(start_api(&api_args)?)
    };
    let api_state: Option<Arc<Mutex<ApiSharedState>>> = api_server
        .as_ref()
        .map(|server| Arc::clone(&server.state));
    let api_address = api_server
        .as_ref()
        .map(|_| format!("{}:{}", api_args.api_bind, api_args.api_port));

    let ui_result = ui::app::run_gui(settings, settings_path, api_state, api_address);

    drop(api_server);
    ui_result
}
