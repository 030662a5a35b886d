use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use dotenv::dotenv;
use t9n_table::{
    CurationStats, IssueLog, Languages, T9nError, TableParser, find_tables, rewrite_tables,
    translations::{Result, Severity},
};

#[derive(Parser, Debug)]
#[command(name = "t9n-check")]
#[command(about = "Check and normalize the translation tables of a wiki page")]
struct Cli {
    /// Page text to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Page title used in reports (defaults to the file name)
    #[arg(value_name = "PAGE")]
    page: Option<String>,

    /// Print the page with every table re-rendered instead of the issues
    #[arg(long)]
    rewrite: bool,

    /// JSON language file replacing the built-in tables
    #[arg(long, env = "T9N_LANGUAGES", value_name = "JSON")]
    languages: Option<PathBuf>,
}

impl Cli {
    fn page(&self) -> String {
        self.page.clone().unwrap_or_else(|| {
            self.file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

fn load_languages(path: Option<&Path>) -> Result<Languages> {
    let Some(path) = path else {
        return Ok(Languages::builtin());
    };
    log::info!("Loading languages from {}", path.display());
    let text = fs::read_to_string(path)
        .map_err(|e| T9nError::io_err(format!("reading {}", path.display()), e))?;
    Languages::from_json(&text)
}

fn log_stats(stats: &CurationStats) {
    for (label, codes) in &stats.unknown_languages {
        let total: usize = codes.values().sum();
        log::info!("Unknown language {:?} seen {} times: {:?}", label, total, codes);
    }
    for (label, count) in &stats.parent_candidates {
        log::info!("Possible parent-only language {:?} seen {} times", label, count);
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let languages = load_languages(cli.languages.as_deref())?;
    let text = fs::read_to_string(&cli.file)
        .map_err(|e| T9nError::io_err(format!("reading {}", cli.file.display()), e))?;
    let page = cli.page();

    let mut parser = TableParser::new(&languages);
    let mut issues = IssueLog::new();
    let rewritten = rewrite_tables(&text, &page, &mut parser, &mut issues);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.rewrite {
        writeln!(out, "{}", rewritten)?;
    } else {
        for issue in &issues.issues {
            let json = serde_json::to_string(issue)
                .map_err(|e| T9nError::io_err("serialising issue", e))?;
            writeln!(out, "{}", json)?;
        }
    }

    let errors = issues
        .issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    log::info!(
        "[{}] Tables: {}. Issues: {}. Errors: {}",
        page,
        find_tables(&text).len(),
        issues.issues.len(),
        errors
    );
    log_stats(parser.stats());

    Ok(errors == 0)
}

fn main() -> ExitCode {
    env_logger::init();
    dotenv().ok();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("t9n-check: {}", e);
            ExitCode::from(2)
        }
    }
}
