use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use edict_amend::pipeline::AnalysisPipeline;
use edict_compute::{assess_requirements, route, SystemLoad};
use edict_core::{Comment, EdictConfig, OutputFormat, SessionStore};
use edict_ingest::parser::parse_policy_document;
use edict_ingest::registry::{FileIngestor, Ingestor};

#[derive(Parser)]
#[command(
    name = "edict",
    version,
    about = "Clause-level policy argumentation platform",
    long_about = "Edict turns thousands of public comments on draft legislation into\n\
                   clause-level amendment suggestions backed by legal citations.\n\n\
                   Composable subcommands for argument extraction, clause analysis,\n\
                   amendment generation, and compute sizing.\n\n\
                   Examples:\n  \
                     edict analyze --comments comments.csv --policy draft.txt   Full analysis\n  \
                     edict analyze --comments c.json --policy p.txt --llm       LLM extraction\n  \
                     edict arguments --comments comments.csv                    Extraction readout\n  \
                     edict clause 'Section 7(a)' --comments comments.csv        Per-clause breakdown\n  \
                     edict suggestions --comments comments.csv                  Suggestions only\n  \
                     edict compute --count 50000                                Compute sizing"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .edict.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full analysis over a comment set and a policy document
    #[command(long_about = "Run the full analysis over a comment set and a policy document.\n\n\
        Extracts one argument per comment (keyword heuristic by default, any\n\
        OpenAI-compatible LLM with --llm), attaches citations, fuses arguments\n\
        across sources, and generates one amendment suggestion per clause.\n\n\
        Examples:\n  edict analyze --comments comments.csv --policy draft.txt\n  edict analyze --comments comments.json --policy draft.txt --llm --format json")]
    Analyze {
        /// Comment file (.csv or .json)
        #[arg(long)]
        comments: PathBuf,

        /// Policy document (plain text, one clause per line)
        #[arg(long)]
        policy: PathBuf,

        /// Use the configured LLM for extraction instead of the heuristic
        #[arg(
            long,
            long_help = "Use the configured LLM for extraction.\n\nRequires an API key for the provider in .edict.toml or the environment.\nComments that fail LLM extraction fall back to the heuristic."
        )]
        llm: bool,
    },
    /// Extract and print arguments from a comment file
    #[command(long_about = "Extract and print arguments from a comment file.\n\n\
        Heuristic extraction only: stance from support/objection keyword counts,\n\
        themes from fixed keyword tables, confidence from an additive formula.\n\n\
        Examples:\n  edict arguments --comments comments.csv\n  edict arguments --comments comments.json --format json")]
    Arguments {
        /// Comment file (.csv or .json)
        #[arg(long)]
        comments: PathBuf,
    },
    /// Break down the arguments on one policy clause
    #[command(long_about = "Break down the arguments on one policy clause.\n\n\
        Shows stance tallies, themes, every argument on the clause, and the\n\
        amendment suggestion those tallies produce.\n\n\
        Examples:\n  edict clause 'Section 7(a)' --comments comments.csv")]
    Clause {
        /// Clause identifier as it appears in the comments
        id: String,

        /// Comment file (.csv or .json)
        #[arg(long)]
        comments: PathBuf,
    },
    /// Generate amendment suggestions from a comment file
    #[command(long_about = "Generate amendment suggestions from a comment file.\n\n\
        One suggestion per clause: revise when objections dominate, retain when\n\
        support dominates, review in detail on a tie.\n\n\
        Examples:\n  edict suggestions --comments comments.csv --format markdown")]
    Suggestions {
        /// Comment file (.csv or .json)
        #[arg(long)]
        comments: PathBuf,
    },
    /// Estimate compute requirements for a comment set size
    #[command(long_about = "Estimate compute requirements for a comment set size.\n\n\
        Reports the size band (memory, processing time) and routes to local,\n\
        hybrid, or cloud processing based on current system load.\n\n\
        Examples:\n  edict compute --count 50000")]
    Compute {
        /// Number of comments to size for
        #[arg(long)]
        count: usize,
    },
    /// Create a default .edict.toml configuration file
    #[command(long_about = "Create a default .edict.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .edict.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1m\x1b[33m§\x1b[0m \x1b[1medict\x1b[0m v{version} - from public outcry to actionable amendments\n");

        println!("Quick start:");
        println!("  \x1b[36medict init\x1b[0m                                         Create a .edict.toml config file");
        println!("  \x1b[36medict analyze --comments c.csv --policy p.txt\x1b[0m      Run the full analysis");
        println!("  \x1b[36medict suggestions --comments c.csv\x1b[0m                 Jump straight to suggestions\n");

        println!("All commands:");
        println!("  \x1b[32manalyze\x1b[0m      Full pipeline: extraction, citations, fusion, amendments");
        println!("  \x1b[32marguments\x1b[0m    Heuristic argument extraction readout");
        println!("  \x1b[32mclause\x1b[0m       Per-clause stance and theme breakdown");
        println!("  \x1b[32msuggestions\x1b[0m  Amendment suggestions only");
        println!("  \x1b[32mcompute\x1b[0m      Advisory compute sizing and routing");
        println!("  \x1b[32minit\x1b[0m         Create default configuration\n");
    } else {
        println!("edict v{version} - from public outcry to actionable amendments\n");

        println!("Quick start:");
        println!("  edict init                                         Create a .edict.toml config file");
        println!("  edict analyze --comments c.csv --policy p.txt      Run the full analysis");
        println!("  edict suggestions --comments c.csv                 Jump straight to suggestions\n");

        println!("All commands:");
        println!("  analyze      Full pipeline: extraction, citations, fusion, amendments");
        println!("  arguments    Heuristic argument extraction readout");
        println!("  clause       Per-clause stance and theme breakdown");
        println!("  suggestions  Amendment suggestions only");
        println!("  compute      Advisory compute sizing and routing");
        println!("  init         Create default configuration\n");
    }

    println!("Run 'edict <command> --help' for details.");
}

fn load_comments(path: &Path, verbose: bool) -> Result<Vec<Comment>> {
    let comments = FileIngestor.ingest(&path.to_string_lossy())?;
    if comments.is_empty() {
        miette::bail!(miette::miette!(
            help = "The file parsed but contained no comment rows.\nCheck that CSV files have a 'text' column and JSON files hold an array of objects.",
            "No comments found in {}",
            path.display()
        ));
    }
    if verbose {
        eprintln!("Loaded {} comments from {}", comments.len(), path.display());
    }
    Ok(comments)
}

fn require_llm_key(config: &EdictConfig) -> Result<()> {
    let env_var = match config.llm.provider.as_str() {
        "gemini" => "GEMINI_API_KEY",
        _ => "OPENAI_API_KEY",
    };
    if config.llm.api_key.is_none() && std::env::var(env_var).is_err() {
        miette::bail!(miette::miette!(
            help = "Set {env_var} or add api_key in your .edict.toml under [llm]",
            "No API key configured for LLM provider '{}'",
            config.llm.provider
        ));
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Edict Configuration
# See: https://github.com/edict-platform/edict

[llm]
# Any OpenAI-compatible chat completions endpoint
# provider = "openai"
# model = "gpt-4o-mini"
# base_url = "https://api.openai.com"
# api_key = "sk-..."

[extraction]
# Use the LLM path with per-comment heuristic fallback
# use_llm = false

[fusion]
# Distinct-source count above which an argument is flagged as an echo chamber
# echo_threshold = 10

[amendment]
# max_citations = 3
# max_themes = 3
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EdictConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".edict.toml");
            if default_path.exists() {
                EdictConfig::from_file(default_path)?
            } else {
                EdictConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Analyze {
            ref comments,
            ref policy,
            llm,
        }) => {
            if llm {
                config.extraction.use_llm = true;
            }
            if config.extraction.use_llm {
                require_llm_key(&config)?;
            }

            let mut store = SessionStore::new();
            store.add_comments(load_comments(comments, cli.verbose)?);
            store.add_policy(parse_policy_document(policy)?);

            let spinner = if config.extraction.use_llm && std::io::stderr().is_terminal() {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .into_diagnostic()?,
                );
                pb.set_message(format!("Extracting arguments with {}...", config.llm.model));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let pipeline = AnalysisPipeline::new(config);
            let result = pipeline.run(&mut store).await.inspect_err(|_e| {
                if let Some(pb) = &spinner {
                    pb.finish_with_message("Failed");
                }
            })?;

            if let Some(pb) = spinner {
                pb.finish_with_message("Done");
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&result).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    print!("{}", result.to_markdown());
                }
                OutputFormat::Text => {
                    print!("{result}");
                }
            }
        }
        Some(Command::Arguments { ref comments }) => {
            let comments = load_comments(comments, cli.verbose)?;
            let arguments = edict_mining::extract_arguments(&comments);

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&arguments).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("# Extracted Arguments\n");
                    println!("| Clause | Stance | Confidence | Themes | Text |");
                    println!("|--------|--------|------------|--------|------|");
                    for arg in &arguments {
                        println!(
                            "| {} | {} | {:.2} | {} | {} |",
                            arg.clause,
                            arg.stance,
                            arg.confidence,
                            arg.themes.join(", "),
                            arg.text,
                        );
                    }
                }
                OutputFormat::Text => {
                    for (i, arg) in arguments.iter().enumerate() {
                        println!(
                            "{:>3}. [{}] {} (confidence {:.2}, themes: {})",
                            i + 1,
                            arg.stance,
                            arg.clause,
                            arg.confidence,
                            arg.themes.join(", "),
                        );
                        println!("     {}", arg.text);
                    }
                }
            }
        }
        Some(Command::Clause {
            ref id,
            ref comments,
        }) => {
            let comments = load_comments(comments, cli.verbose)?;
            let mut store = SessionStore::new();
            store.replace_arguments(edict_mining::extract_arguments(&comments));

            let pipeline = AnalysisPipeline::new(config);
            let analysis = pipeline.clause_analysis(&store, id)?;

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&analysis).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    let s = &analysis.summary;
                    println!("# Clause {}\n", s.clause);
                    println!(
                        "- Arguments: {} ({} support, {} objection, {} neutral)",
                        s.total, s.support, s.objection, s.neutral
                    );
                    println!("- Themes: {}\n", s.themes.join(", "));
                    if let Some(suggestion) = &analysis.suggestion {
                        println!("## Suggestion ({})\n", suggestion.kind);
                        println!("{}\n", suggestion.details);
                        println!("**Suggested change:** {}", suggestion.suggested_change);
                    }
                }
                OutputFormat::Text => {
                    let s = &analysis.summary;
                    println!(
                        "{}: {} support / {} objection / {} neutral",
                        s.clause, s.support, s.objection, s.neutral
                    );
                    println!("themes: {}", s.themes.join(", "));
                    for arg in &analysis.arguments {
                        println!("  [{}] {}", arg.stance, arg.text);
                    }
                    if let Some(suggestion) = &analysis.suggestion {
                        println!(
                            "\nsuggestion [{}] ({:.0}%): {}",
                            suggestion.kind,
                            suggestion.confidence * 100.0,
                            suggestion.suggested_change
                        );
                    }
                }
            }
        }
        Some(Command::Suggestions { ref comments }) => {
            let comments = load_comments(comments, cli.verbose)?;
            let arguments = edict_mining::extract_arguments(&comments);
            let groups = edict_fusion::aggregate_by_clause(&arguments);
            let suggestions = edict_amend::suggest_amendments(&groups, &config.amendment);

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&suggestions).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("# Amendment Suggestions\n");
                    for suggestion in &suggestions {
                        println!("## {} ({})\n", suggestion.clause, suggestion.kind);
                        println!("{}\n", suggestion.details);
                        println!("**Suggested change:** {}\n", suggestion.suggested_change);
                    }
                }
                OutputFormat::Text => {
                    for suggestion in &suggestions {
                        println!(
                            "[{}] {} ({:.0}%)",
                            suggestion.kind,
                            suggestion.clause,
                            suggestion.confidence * 100.0
                        );
                        println!("  {}", suggestion.summary);
                        println!("  change: {}", suggestion.suggested_change);
                    }
                }
            }
        }
        Some(Command::Compute { count }) => {
            let requirements = assess_requirements(count);
            let load = SystemLoad::sample();
            let target = route(&requirements, &load);

            match cli.format {
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "requirements": requirements,
                        "systemLoad": load,
                        "target": target,
                    });
                    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
                }
                OutputFormat::Markdown => {
                    println!("# Compute Assessment\n");
                    println!("- Comments: {}", requirements.num_comments);
                    println!("- Memory: {}", requirements.memory_required);
                    println!("- Processing time: {}", requirements.processing_time);
                    println!("- Target: {target}");
                }
                OutputFormat::Text => {
                    println!("Comments:        {}", requirements.num_comments);
                    println!("Memory:          {}", requirements.memory_required);
                    println!("Processing time: {}", requirements.processing_time);
                    match load.memory_percent {
                        Some(pct) => println!("Memory in use:   {pct:.0}%"),
                        None => println!("Memory in use:   unknown"),
                    }
                    println!("Target:          {target}");
                }
            }
        }
        Some(Command::Init) => {
            let path = Path::new(".edict.toml");
            if path.exists() {
                miette::bail!(".edict.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .edict.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "edict", &mut std::io::stdout());
        }
    }

    Ok(())
}
