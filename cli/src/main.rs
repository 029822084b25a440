//! docstyle CLI - Word document restyling tool

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use crossbeam_channel::{unbounded, Receiver};
use indicatif::{ProgressBar, ProgressStyle};

use docstyle::{
    detect_structure, parse_file_with_options, render_file_with_stats, to_json, DesignSystem,
    JsonFormat, ParseOptions, RenderOptions, TransformResult,
};

#[derive(Parser)]
#[command(name = "docstyle")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Restyle Word documents with a declarative design system", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a document with the design system
    Transform(TransformArgs),

    /// Dump the intermediate representation as JSON
    Inspect {
        /// Input DOCX file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Skip structure detection
        #[arg(long)]
        raw: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input DOCX file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct TransformArgs {
    /// Input DOCX file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: <stem>_transformed.docx next to the input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Base design-system file (default: bundled)
    #[arg(long, value_name = "FILE", env = "DOCSTYLE_CONFIG")]
    config: Option<PathBuf>,

    /// Theme file merged over the design system
    #[arg(long, value_name = "FILE")]
    theme: Option<PathBuf>,

    /// Skip the cover page
    #[arg(long)]
    no_cover: bool,

    /// Skip the table of contents
    #[arg(long)]
    no_toc: bool,

    /// Skip "Section NN" labels on chapters
    #[arg(long)]
    no_numbering: bool,

    /// Skip the running header and footer
    #[arg(long)]
    no_header_footer: bool,

    /// Title printed on the cover
    #[arg(long, value_name = "TITLE")]
    cover_title: Option<String>,

    /// Footer mention, e.g. a confidentiality notice
    #[arg(long, value_name = "TEXT")]
    mention: Option<String>,
}

impl TransformArgs {
    fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::new()
            .with_cover(!self.no_cover)
            .with_toc(!self.no_toc)
            .with_section_numbers(!self.no_numbering)
            .with_header_footer(!self.no_header_footer);
        if let Some(title) = &self.cover_title {
            options = options.with_cover_title(title.clone());
        }
        if let Some(mention) = &self.mention {
            options = options.with_mention(mention.clone());
        }
        options
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output(&self.input))
    }
}

/// `<stem>_transformed.docx` in the input's directory.
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_transformed.docx", stem))
}

/// Messages from the pipeline worker to the progress bar.
enum Progress {
    Stage(&'static str),
    Done(TransformResult),
    Failed(docstyle::Error),
}

const STAGE_COUNT: u64 = 4;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Transform(args) => cmd_transform(args),
        Commands::Inspect {
            input,
            raw,
            compact,
            output,
        } => cmd_inspect(&input, raw, compact, output.as_deref()),
        Commands::Info { input, json } => cmd_info(&input, json),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_design(config: Option<&Path>, theme: Option<&Path>) -> docstyle::Result<DesignSystem> {
    let design = match config {
        Some(path) => DesignSystem::from_path(path)?,
        None => DesignSystem::default_system(),
    };
    match theme {
        Some(path) => design.with_theme(path),
        None => Ok(design),
    }
}

/// Run the pipeline on a worker thread, reporting each stage.
fn spawn_pipeline(args: TransformArgs) -> Receiver<Progress> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        log::debug!("Pipeline worker started for {}", args.input.display());
        let run = || -> docstyle::Result<TransformResult> {
            tx.send(Progress::Stage("Loading design system...")).ok();
            let design = load_design(args.config.as_deref(), args.theme.as_deref())?;

            tx.send(Progress::Stage("Parsing document...")).ok();
            let tree = parse_file_with_options(&args.input, ParseOptions::new().lenient())?;

            tx.send(Progress::Stage("Detecting structure...")).ok();
            let tree = detect_structure(tree);
            let summary = tree.summary();

            tx.send(Progress::Stage("Rendering...")).ok();
            let (output, stats) =
                render_file_with_stats(&tree, args.output_path(), &args.render_options(), &design)?;
            Ok(TransformResult::new(output, tree.metadata, summary, stats))
        };
        let message = match run() {
            Ok(result) => Progress::Done(result),
            Err(e) => Progress::Failed(e),
        };
        tx.send(message).ok();
    });
    rx
}

fn cmd_transform(args: TransformArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(STAGE_COUNT);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let input = args.input.clone();
    let rx = spawn_pipeline(args);
    let mut started = false;
    let result = loop {
        match rx.recv() {
            Ok(Progress::Stage(message)) => {
                if started {
                    pb.inc(1);
                }
                started = true;
                pb.set_message(message);
            }
            Ok(Progress::Done(result)) => break result,
            Ok(Progress::Failed(e)) => {
                pb.abandon_with_message("Failed");
                return Err(e.into());
            }
            Err(_) => {
                pb.abandon_with_message("Failed");
                return Err("pipeline worker stopped unexpectedly".into());
            }
        }
    };
    pb.finish_with_message("Done!");

    print_summary(&input, &result);
    Ok(())
}

fn print_summary(input: &Path, result: &TransformResult) {
    let stats = &result.stats;
    println!("\n{}", "Transformation Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{:<14} {}", "Input".bold(), input.display());
    println!("{:<14} {}", "Output".bold(), result.output.display());
    if let Some(title) = &result.metadata.title {
        println!("{:<14} {}", "Title".bold(), title);
    }
    println!("{:<14} {}", "Cover".bold(), if stats.cover { "Yes" } else { "No" });
    println!("{:<14} {}", "TOC entries".bold(), stats.toc_entries);
    println!("{:<14} {}", "Sections".bold(), result.summary.sections);
    println!("{:<14} {}", "Headings".bold(), stats.heading_count);
    println!("{:<14} {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{:<14} {}", "Tables".bold(), stats.table_count);
    println!("{:<14} {}", "Images".bold(), stats.image_count);
    println!("{:<14} {}", "Callouts".bold(), stats.callout_count);
    println!("{:<14} {}", "List items".bold(), stats.list_item_count);
    println!("{:<14} {}", "Steps".bold(), stats.step_count);
    println!("{:<14} {}", "Words".bold(), stats.word_count);
    if stats.skipped_count > 0 {
        println!(
            "{:<14} {}",
            "Skipped".bold(),
            stats.skipped_count.to_string().yellow()
        );
    }
}

fn cmd_inspect(
    input: &Path,
    raw: bool,
    compact: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tree = parse_file_with_options(input, ParseOptions::new().lenient())?;
    if !raw {
        tree = detect_structure(tree);
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&tree, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Metadata is still worth showing when some parts are unreadable
    let tree = parse_file_with_options(input, ParseOptions::new().lenient())?;
    let tree = detect_structure(tree);
    let summary = tree.summary();
    let meta = &tree.metadata;

    if json {
        let value = serde_json::json!({
            "file": input.display().to_string(),
            "metadata": meta,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    let fields = [
        ("Title", &meta.title),
        ("Author", &meta.author),
        ("Date", &meta.date),
        ("Version", &meta.version),
        ("Reference", &meta.reference),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label.bold(), value);
        }
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = tree.plain_text();
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Sections".bold(), summary.sections);
    println!("{}: {}", "Paragraphs".bold(), summary.paragraphs);
    println!("{}: {}", "Tables".bold(), summary.tables);
    println!("{}: {}", "Images".bold(), summary.images);
    println!("{}: {}", "Callouts".bold(), summary.callouts);
    println!("{}: {}", "Lists".bold(), summary.lists);
    println!("{}: {}", "Steps blocks".bold(), summary.steps_blocks);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_transform_defaults() {
        let cli = parse(&["docstyle", "transform", "docs/manual.docx"]);
        assert!(!cli.verbose);
        let Commands::Transform(args) = cli.command else {
            panic!("expected transform");
        };
        let options = args.render_options();
        assert!(options.generate_cover);
        assert!(options.generate_toc);
        assert!(options.number_sections);
        assert!(options.header_footer);
        assert_eq!(args.output_path(), PathBuf::from("docs/manual_transformed.docx"));
    }

    #[test]
    fn test_transform_flags() {
        let cli = parse(&[
            "docstyle",
            "transform",
            "in.docx",
            "-o",
            "out.docx",
            "--theme",
            "dark.yaml",
            "--no-cover",
            "--no-toc",
            "--no-numbering",
            "--no-header-footer",
            "--cover-title",
            "Manuel",
            "--mention",
            "Interne",
            "-v",
        ]);
        assert!(cli.verbose);
        let Commands::Transform(args) = cli.command else {
            panic!("expected transform");
        };
        assert_eq!(args.theme, Some(PathBuf::from("dark.yaml")));
        assert_eq!(args.output_path(), PathBuf::from("out.docx"));
        let options = args.render_options();
        assert!(!options.generate_cover);
        assert!(!options.generate_toc);
        assert!(!options.number_sections);
        assert!(!options.header_footer);
        assert_eq!(options.cover_title_override.as_deref(), Some("Manuel"));
        assert_eq!(options.mention.as_deref(), Some("Interne"));
    }

    #[test]
    fn test_inspect_args() {
        let cli = parse(&["docstyle", "--verbose", "inspect", "a.docx", "--raw", "--compact"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Inspect {
                input,
                raw,
                compact,
                output,
            } => {
                assert_eq!(input, PathBuf::from("a.docx"));
                assert!(raw);
                assert!(compact);
                assert!(output.is_none());
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_info_args() {
        let cli = parse(&["docstyle", "info", "a.docx", "--json"]);
        assert!(matches!(cli.command, Commands::Info { json: true, .. }));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Cli::try_parse_from(["docstyle", "transform"]).is_err());
        assert!(Cli::try_parse_from(["docstyle"]).is_err());
    }

    #[test]
    fn test_default_output_without_directory() {
        assert_eq!(
            default_output(Path::new("report.docx")),
            PathBuf::from("report_transformed.docx")
        );
    }

    #[test]
    fn test_missing_theme_fails() {
        let result = load_design(None, Some(Path::new("/nonexistent/theme.yaml")));
        assert!(matches!(result, Err(docstyle::Error::FileNotFound(_))));
    }
}
