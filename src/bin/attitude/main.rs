//! Attitude CLI - stream IMU angle lines through the orientation pipeline.

use anyhow::{bail, Context, Result};
use std::io::{self, BufWriter};
use std::path::PathBuf;

use attitude::core::{decode_detailed, AxisSet};
use attitude::geom::{CompositionOrder, ReferenceBody, RotationComposer};
use attitude::pipeline::{JsonLinesRenderer, Renderer, Settings, SummaryRenderer, TickDriver, Ticker};
use attitude::stream::{LineSource, ThreadedSource};
use tracing_subscriber::EnvFilter;

/// Verbosity selected by -q / -v / -vv.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Output format for `stream`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
    JsonFull,
}

/// Parsed command line.
struct Cli {
    verbosity: Verbosity,
    config: Option<PathBuf>,
    format: Format,
    max_ticks: Option<u64>,
    init: bool,
    overrides: Overrides,
    positional: Vec<String>,
}

/// Settings given on the command line; applied over the settings file.
#[derive(Default)]
struct Overrides {
    axes: Option<AxisSet>,
    window: Option<usize>,
    batch: Option<usize>,
    interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
    order: Option<CompositionOrder>,
}

impl Overrides {
    fn apply(&self, settings: &mut Settings) {
        if let Some(axes) = self.axes {
            settings.axes = axes;
        }
        if let Some(w) = self.window {
            settings.window_capacity = w;
        }
        if let Some(b) = self.batch {
            settings.batch_size = b;
        }
        if let Some(ms) = self.interval_ms {
            settings.tick_interval_ms = ms;
        }
        if let Some(ms) = self.timeout_ms {
            settings.read_timeout_ms = ms;
        }
        if let Some(order) = self.order {
            settings.composition_order = order;
        }
    }
}

fn main() {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_help();
            std::process::exit(2);
        }
    };

    init_logging(cli.verbosity);

    if let Err(e) = dispatch(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    let Some(command) = cli.positional.first() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        // Stream command - run the tick loop
        "stream" | "s" => cmd_stream(cli, cli.positional.get(1).map(String::as_str)),

        // Decode command - check a single line
        "decode" | "d" => {
            let Some(line) = cli.positional.get(1) else {
                bail!("missing line argument\nUsage: attitude-cli decode <LINE>");
            };
            cmd_decode(cli, line)
        }

        // Config command - show or initialize settings
        "config" | "c" => cmd_config(cli),

        "help" | "h" => {
            print_help();
            Ok(())
        }
        "version" => {
            println!("attitude-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => bail!("unknown command: {other}"),
    }
}

fn print_help() {
    println!("attitude-cli - orientation stream pipeline");
    println!();
    println!("USAGE:");
    println!("    attitude-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    s, stream [SOURCE]   Run the pipeline on a file, device or - (stdin)");
    println!("    d, decode <LINE>     Decode one line and show the result");
    println!("    c, config [--init]   Print effective settings (--init writes defaults)");
    println!("    h, help              Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose        Debug output");
    println!("    -vv, --trace         Trace output (every dropped line)");
    println!("    -q, --quiet          Warnings only");
    println!("    --config <PATH>      Settings file (default: per-user config dir)");
    println!("    --axes <2|3>         Fields per line: pitch,roll or pitch,roll,yaw");
    println!("    --window <N>         Samples kept per axis (default 200)");
    println!("    --batch <N>          Max lines read per tick (default 5)");
    println!("    --interval <MS>      Tick interval (default 30)");
    println!("    --timeout <MS>       Stream read timeout (default 1000)");
    println!("    --order <zyx|xyz>    Rotation composition order (default zyx)");
    println!("    --ticks <N>          Stop after N ticks");
    println!("    --json               One JSON object per tick");
    println!("    --json-full          JSON including window series and faces");
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli> {
    let mut cli = Cli {
        verbosity: Verbosity::Info,
        config: None,
        format: Format::Text,
        max_ticks: None,
        init: false,
        overrides: Overrides::default(),
        positional: Vec::new(),
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next().with_context(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "-v" | "--verbose" => cli.verbosity = Verbosity::Debug,
            "-vv" | "--trace" => cli.verbosity = Verbosity::Trace,
            "-q" | "--quiet" => cli.verbosity = Verbosity::Quiet,
            "-h" | "--help" => cli.positional.insert(0, "help".into()),
            "--json" => cli.format = Format::Json,
            "--json-full" => cli.format = Format::JsonFull,
            "--init" => cli.init = true,
            "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
            "--axes" => {
                let n: usize = value("--axes")?.parse().context("--axes expects 2 or 3")?;
                cli.overrides.axes =
                    Some(AxisSet::from_field_count(n).context("--axes expects 2 or 3")?);
            }
            "--window" => cli.overrides.window = Some(value("--window")?.parse()?),
            "--batch" => cli.overrides.batch = Some(value("--batch")?.parse()?),
            "--interval" => cli.overrides.interval_ms = Some(value("--interval")?.parse()?),
            "--timeout" => cli.overrides.timeout_ms = Some(value("--timeout")?.parse()?),
            "--order" => cli.overrides.order = Some(value("--order")?.parse()?),
            "--ticks" => cli.max_ticks = Some(value("--ticks")?.parse()?),
            _ => cli.positional.push(arg),
        }
    }
    Ok(cli)
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    // Logs go to stderr so stdout stays clean for tick output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Settings file (or defaults) with command-line overrides applied.
fn effective_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load(),
    };
    cli.overrides.apply(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn cmd_stream(cli: &Cli, source_arg: Option<&str>) -> Result<()> {
    let settings = effective_settings(cli)?;

    let source_path = match source_arg {
        Some("-") => None,
        Some(path) => Some(PathBuf::from(path)),
        None => settings.source.clone(),
    };

    let source: Box<dyn LineSource> = match &source_path {
        Some(path) => {
            tracing::info!("Reading {}", path.display());
            Box::new(
                ThreadedSource::open(path, settings.queue_capacity())
                    .with_context(|| format!("failed to open {}", path.display()))?,
            )
        }
        None => {
            tracing::info!("Reading standard input");
            Box::new(ThreadedSource::stdin(settings.queue_capacity())?)
        }
    };

    let mut driver = TickDriver::new(source, &settings, ReferenceBody::slab())?;
    let ticker = Ticker::new(settings.tick_interval()).with_max_ticks(cli.max_ticks);

    let stdout = BufWriter::new(io::stdout().lock());
    let mut renderer: Box<dyn Renderer> = match cli.format {
        Format::Text => Box::new(SummaryRenderer::new(stdout)),
        Format::Json => Box::new(JsonLinesRenderer::new(stdout)),
        Format::JsonFull => {
            Box::new(JsonLinesRenderer::new(stdout).with_series(true).with_faces(true))
        }
    };

    let summary = ticker.run(&mut driver, renderer.as_mut(), None)?;
    tracing::debug!(
        "{} ticks, {} samples, {} dropped lines",
        summary.ticks,
        summary.accepted,
        summary.rejected
    );
    Ok(())
}

fn cmd_decode(cli: &Cli, line: &str) -> Result<()> {
    let settings = effective_settings(cli)?;
    match decode_detailed(line.as_bytes(), settings.axes.field_count()) {
        Ok(sample) => {
            let r = RotationComposer::new(settings.composition_order).compose(&sample);
            if cli.format == Format::Text {
                println!("{sample}");
                println!("Rotation ({}):", settings.composition_order);
                for row in 0..3 {
                    let row = r.row(row);
                    println!("  [{:>9.5} {:>9.5} {:>9.5}]", row.x, row.y, row.z);
                }
            } else {
                let rows: Vec<[f64; 3]> = (0..3).map(|i| r.row(i).to_array()).collect();
                let json = serde_json::json!({ "sample": sample, "rotation": rows });
                println!("{json}");
            }
            Ok(())
        }
        Err(reason) => bail!("line rejected: {reason}"),
    }
}

fn cmd_config(cli: &Cli) -> Result<()> {
    if cli.init {
        let mut settings = Settings::default();
        cli.overrides.apply(&mut settings);
        settings.validate()?;
        let path = match &cli.config {
            Some(path) => {
                settings.save_to(path)?;
                path.clone()
            }
            None => settings.save()?,
        };
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let settings = effective_settings(cli)?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
