use anyhow::Context;
use clap::Parser;
use import_graph_core::{builder, render, Config, Error};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Import Graph - interactive map of Python module imports
#[derive(Parser, Debug)]
#[command(name = "import-graph")]
#[command(version)] // Auto-pull version from Cargo.toml
#[command(about = "Render the import graph of a Python project as an interactive HTML page", long_about = None)]
struct Cli {
    /// Project directory to scan (prompted for when omitted)
    directory: Option<String>,

    /// Where to write the HTML page
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// Number of layout simulation steps
    #[arg(long)]
    iterations: Option<usize>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the page without opening a browser
    #[arg(long)]
    no_open: bool,

    /// Scan files even if .gitignore excludes them
    #[arg(long)]
    no_gitignore: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Load the config file, if any, and apply flag overrides on top
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(title) = &self.title {
            config.output.title = title.clone();
        }
        if let Some(iterations) = self.iterations {
            config.layout.iterations = iterations;
        }
        if self.no_open {
            config.output.open_browser = false;
        }
        if self.no_gitignore {
            config.discovery.respect_gitignore = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;

    let directory = match &cli.directory {
        Some(directory) => directory.clone(),
        None => prompt_directory(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    generate(&directory, &config, |path| open::that(path))?;
    Ok(())
}

/// Scan `directory`, write the page and hand it to `open_page`
///
/// Returns the absolute path of the written page. A bad directory or an
/// empty graph is an error and leaves no page behind. A failing
/// `open_page` is only logged.
fn generate(
    directory: &str,
    config: &Config,
    open_page: impl FnOnce(&Path) -> io::Result<()>,
) -> anyhow::Result<PathBuf> {
    println!("You entered: {directory}");

    let expanded = expand_user_path(directory, dirs::home_dir().as_deref());
    println!("Expanded path: {}", expanded.display());

    builder::validate_root(&expanded)?;

    println!("Generating import graph...");
    let report = builder::build_import_graph(&expanded, &config.discovery)?;
    println!("Total Python files processed: {}", report.files_processed);
    if report.files_failed() > 0 {
        println!("Files skipped due to errors: {}", report.files_failed());
    }
    println!("Number of nodes in graph: {}", report.graph.node_count());
    println!("Number of edges in graph: {}", report.graph.edge_count());

    if report.graph.is_empty() {
        println!("No Python files were found or processed successfully.");
        return Err(Error::EmptyGraph.into());
    }

    println!("Visualizing the graph...");
    let html = import_graph_core::render_graph(&report.graph, config)?;
    let html_path = render::write_html(&config.output.path, &html)
        .with_context(|| format!("writing {}", config.output.path.display()))?;
    println!("Interactive graph saved as '{}'", html_path.display());

    if config.output.open_browser {
        println!("Opening graph visualization in your default web browser...");
        if let Err(err) = open_page(&html_path) {
            tracing::warn!(%err, path = %html_path.display(), "could not open a browser");
        }
    }

    Ok(html_path)
}

/// Ask for the project directory on `output` and read one line from `input`
fn prompt_directory(input: &mut impl BufRead, output: &mut impl Write) -> anyhow::Result<String> {
    write!(output, "Enter the path to your Python project directory: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("no directory given");
    }
    Ok(line.trim().to_string())
}

/// Expand a leading `~` to the home directory
///
/// `~user` forms and paths without a leading tilde are returned unchanged.
fn expand_user_path(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        return home.to_path_buf();
    }
    match path
        .strip_prefix("~/")
        .or_else(|| path.strip_prefix("~\\"))
    {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn test_config(out_dir: &Path, open_browser: bool) -> Config {
        let mut config = Config::default();
        config.output.path = out_dir.join("graph.html");
        config.output.open_browser = open_browser;
        config.layout.iterations = 5;
        config
    }

    fn no_browser(_: &Path) -> io::Result<()> {
        panic!("browser must not be opened")
    }

    #[test]
    fn test_generate_empty_directory_fails_without_page() {
        let project = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let config = test_config(out.path(), false);

        let err = generate(project.path().to_str().unwrap(), &config, no_browser).unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::EmptyGraph)));
        assert!(!config.output.path.exists());
    }

    #[test]
    fn test_generate_missing_directory() {
        let out = TempDir::new().unwrap();
        let config = test_config(out.path(), false);
        let missing = out.path().join("absent");

        let err = generate(missing.to_str().unwrap(), &config, no_browser).unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::PathNotFound(_))));
        assert!(!config.output.path.exists());
    }

    #[test]
    fn test_generate_file_instead_of_directory() {
        let out = TempDir::new().unwrap();
        let config = test_config(out.path(), false);
        let file = out.path().join("main.py");
        std::fs::write(&file, "import os\n").unwrap();

        let err = generate(file.to_str().unwrap(), &config, no_browser).unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotADirectory(_))));
    }

    #[test]
    fn test_generate_browser_failure_is_not_fatal() {
        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join("main.py"), "import os\n").unwrap();
        let out = TempDir::new().unwrap();
        let config = test_config(out.path(), true);
        let opened = Cell::new(false);

        let page = generate(project.path().to_str().unwrap(), &config, |_| {
            opened.set(true);
            Err(io::Error::new(io::ErrorKind::NotFound, "no browser"))
        })
        .unwrap();

        assert!(opened.get());
        assert!(page.is_absolute());
        assert!(std::fs::read_to_string(&page).unwrap().contains("function searchNode()"));
    }

    #[test]
    fn test_generate_no_open_skips_browser() {
        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join("main.py"), "import os\n").unwrap();
        let out = TempDir::new().unwrap();
        let config = test_config(out.path(), false);

        let page = generate(project.path().to_str().unwrap(), &config, no_browser).unwrap();

        assert!(page.exists());
    }

    #[test]
    fn test_invalid_pattern_in_config_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.toml");
        std::fs::write(&path, "[discovery]\npatterns = [\"src/[\"]\n").unwrap();

        let cli = Cli::parse_from(["import-graph", "--config", path.to_str().unwrap()]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/dev");
        assert_eq!(expand_user_path("~", Some(home)), PathBuf::from("/home/dev"));
        assert_eq!(
            expand_user_path("~/code/app", Some(home)),
            PathBuf::from("/home/dev/code/app")
        );
    }

    #[test]
    fn test_expand_leaves_other_paths() {
        let home = Path::new("/home/dev");
        assert_eq!(expand_user_path("/srv/app", Some(home)), PathBuf::from("/srv/app"));
        assert_eq!(expand_user_path("~other/app", Some(home)), PathBuf::from("~other/app"));
        assert_eq!(expand_user_path("app/~", Some(home)), PathBuf::from("app/~"));
        assert_eq!(expand_user_path("~/app", None), PathBuf::from("~/app"));
    }

    #[test]
    fn test_prompt_reads_trimmed_line() {
        let mut input = Cursor::new("  ~/project \n");
        let mut output = Vec::new();

        let directory = prompt_directory(&mut input, &mut output).unwrap();

        assert_eq!(directory, "~/project");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Enter the path to your Python project directory: "
        );
    }

    #[test]
    fn test_prompt_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(prompt_directory(&mut input, &mut output).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "import-graph",
            "proj",
            "--output",
            "out.html",
            "--title",
            "Mine",
            "--iterations",
            "7",
            "--no-open",
            "--no-gitignore",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(cli.directory.as_deref(), Some("proj"));
        assert_eq!(config.output.path, PathBuf::from("out.html"));
        assert_eq!(config.output.title, "Mine");
        assert_eq!(config.layout.iterations, 7);
        assert!(!config.output.open_browser);
        assert!(!config.discovery.respect_gitignore);
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.toml");
        std::fs::write(&path, "[output]\ntitle = \"From file\"\n\n[layout]\niterations = 99\n").unwrap();

        let cli = Cli::parse_from([
            "import-graph",
            "--config",
            path.to_str().unwrap(),
            "--iterations",
            "3",
        ]);
        let config = cli.resolve_config().unwrap();

        assert!(cli.directory.is_none());
        assert_eq!(config.output.title, "From file");
        assert_eq!(config.layout.iterations, 3);
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::parse_from(["import-graph", "-vv", "proj"]);
        assert_eq!(cli.verbose, 2);
    }
}
