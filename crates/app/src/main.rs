mod grade;
mod take;
mod terminal;

use std::fmt;
use std::path::PathBuf;

use services::ApiConfig;
use services::api_config::DEFAULT_BASE_URL;
use tracing_subscriber::EnvFilter;
use vocab_core::model::TestKind;

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidKind { raw: String },
    InvalidTimer { raw: String },
    MissingFile,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidKind { raw } => {
                write!(f, "invalid --kind value: {raw} (expected regular or mastery)")
            }
            ArgsError::InvalidTimer { raw } => write!(f, "invalid --timer-secs value: {raw}"),
            ArgsError::MissingFile => write!(f, "grade requires a results file"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- take  [--kind regular|mastery] [--base-url <url>]");
    eprintln!("                            [--timer-secs <n>] [--out <dir>]");
    eprintln!("  cargo run -p app -- grade <evaluated_results.json>");
    eprintln!();
    eprintln!("Defaults for take:");
    eprintln!("  --kind regular");
    eprintln!("  --base-url {DEFAULT_BASE_URL}");
    eprintln!("  --timer-secs from the preset (0 disables the timer)");
    eprintln!("  --out .");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_TEST_KIND, VOCAB_API_BASE_URL, VOCAB_OUT_DIR, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Take,
    Grade,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "take" => Some(Self::Take),
            "grade" => Some(Self::Grade),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct TakeArgs {
    kind: TestKind,
    api: ApiConfig,
    timer_secs: Option<u32>,
    out_dir: PathBuf,
}

impl TakeArgs {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut kind = match env("VOCAB_TEST_KIND") {
            Some(raw) => TestKind::parse(&raw).ok_or(ArgsError::InvalidKind { raw })?,
            None => TestKind::Regular,
        };
        let mut api = ApiConfig::from_lookup(&env);
        let mut timer_secs = None;
        let mut out_dir = env("VOCAB_OUT_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--kind" => {
                    let value = require_value(args, "--kind")?;
                    kind = TestKind::parse(&value).ok_or(ArgsError::InvalidKind { raw: value })?;
                }
                "--base-url" => {
                    api = ApiConfig::new(require_value(args, "--base-url")?);
                }
                "--timer-secs" => {
                    let value = require_value(args, "--timer-secs")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTimer { raw: value.clone() })?;
                    timer_secs = Some(parsed);
                }
                "--out" => {
                    out_dir = PathBuf::from(require_value(args, "--out")?);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            kind,
            api,
            timer_secs,
            out_dir,
        })
    }
}

fn parse_grade(args: &mut impl Iterator<Item = String>) -> Result<PathBuf, ArgsError> {
    let path = args.next().ok_or(ArgsError::MissingFile)?;
    if let Some(extra) = args.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(PathBuf::from(path))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means take a test.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Take,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Take,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if argv.first().is_some_and(|first| !first.starts_with("--")) {
        argv.remove(0);
    }
    if argv.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return Ok(());
    }

    let mut iter = argv.into_iter();
    match cmd {
        Command::Take => {
            let parsed = TakeArgs::parse(&mut iter, |key| std::env::var(key).ok())
                .inspect_err(|_| print_usage())?;
            take::run(parsed).await?;
        }
        Command::Grade => {
            let path = parse_grade(&mut iter).inspect_err(|_| print_usage())?;
            let report = grade::grade_file(&path)?;
            print!("{report}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
