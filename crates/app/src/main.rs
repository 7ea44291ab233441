use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, ChapterCatalog, Clock, ImportDocument, ImportTarget, QuizLoopService,
    ResultsExporter, SearchService, StudyApiConfig, template_file_name,
};
use study_core::model::QuestionType;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidChapter { raw: String },
    InvalidType { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidChapter { raw } => write!(f, "invalid --chapter value: {raw}"),
            ArgsError::InvalidType { raw } => write!(
                f,
                "invalid --type value: {raw} (expected vocabulary, grammar, kanji or jlpt)"
            ),
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

fn parse_chapter(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ArgsError::InvalidChapter { raw })
}

fn parse_type(raw: String) -> Result<QuestionType, ArgsError> {
    raw.parse::<QuestionType>()
        .map_err(|_| ArgsError::InvalidType { raw })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn search(&self) -> SearchService {
        self.services.search()
    }

    fn catalog(&self) -> ChapterCatalog {
        self.services.catalog()
    }

    fn exporter(&self) -> Arc<ResultsExporter> {
        self.services.exporter()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui       [--api-url <url>] [--export-dir <dir>]");
    eprintln!(
        "  cargo run -p app -- import   --file <json> [--book <name>] [--chapter <n>] [--type <type>]"
    );
    eprintln!(
        "  cargo run -p app -- template --book <name> --chapter <n> --type <type> [--out <path>]"
    );
    eprintln!();
    eprintln!("Every command also accepts --api-url and --export-dir.");
    eprintln!("Types: vocabulary, grammar, kanji, jlpt");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_API_BASE_URL, STUDY_EXPORT_DIR, STUDY_HTTP_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Import,
    Template,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "import" => Some(Self::Import),
            "template" => Some(Self::Template),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    export_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    out: Option<PathBuf>,
    book: Option<String>,
    chapter: Option<u32>,
    question_type: Option<QuestionType>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--api-url") => parsed.api_url = Some(require_value(args, "--api-url")?),
                (_, "--export-dir") => {
                    parsed.export_dir = Some(require_value(args, "--export-dir")?.into());
                }
                (Command::Import, "--file") => {
                    parsed.file = Some(require_value(args, "--file")?.into());
                }
                (Command::Template, "--out") => {
                    parsed.out = Some(require_value(args, "--out")?.into());
                }
                (Command::Import | Command::Template, "--book") => {
                    parsed.book = Some(require_value(args, "--book")?);
                }
                (Command::Import | Command::Template, "--chapter") => {
                    parsed.chapter = Some(parse_chapter(require_value(args, "--chapter")?)?);
                }
                (Command::Import | Command::Template, "--type") => {
                    parsed.question_type = Some(parse_type(require_value(args, "--type")?)?);
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        match cmd {
            Command::Import if parsed.file.is_none() => {
                Err(ArgsError::MissingFlag { flag: "--file" })
            }
            Command::Template if parsed.book.is_none() => {
                Err(ArgsError::MissingFlag { flag: "--book" })
            }
            Command::Template if parsed.chapter.is_none() => {
                Err(ArgsError::MissingFlag { flag: "--chapter" })
            }
            Command::Template if parsed.question_type.is_none() => {
                Err(ArgsError::MissingFlag { flag: "--type" })
            }
            _ => Ok(parsed),
        }
    }

    fn config(&self) -> Result<StudyApiConfig, Box<dyn std::error::Error>> {
        let mut config = StudyApiConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url)?;
        }
        if let Some(dir) = &self.export_dir {
            config = config.with_export_dir(dir.clone());
        }
        Ok(config)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Launch the UI when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Ui => launch_ui(&parsed),
        Command::Import => import_questions(parsed),
        Command::Template => write_template(parsed),
    }
}

fn launch_ui(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config()?;
    info!(api = %config.base_url(), export_dir = %config.export_dir.display(), "starting desktop app");
    let services = AppServices::from_config(&config, Clock::system())?;
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Japanese Study")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn import_questions(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config()?;
    let Some(file) = args.file else {
        return Err(ArgsError::MissingFlag { flag: "--file" }.into());
    };
    let target = ImportTarget {
        book_name: args.book,
        chapter_number: args.chapter,
        question_type: args.question_type,
    };
    let services = AppServices::from_config(&config, Clock::system())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(services.importer().import_file(&file, &target))?;

    println!("{}", summary.message);
    if !summary.errors.is_empty() {
        eprintln!("{} question(s) were rejected:", summary.errors.len());
        for error in &summary.errors {
            eprintln!("  {error}");
        }
    }
    Ok(())
}

fn write_template(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(book), Some(chapter), Some(question_type)) =
        (args.book, args.chapter, args.question_type)
    else {
        return Err(ArgsError::MissingFlag { flag: "--book, --chapter and --type" }.into());
    };
    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(template_file_name(question_type)));
    ImportDocument::template(&book, chapter, question_type).write(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
