//! CLI entry point for gitree

use std::collections::BTreeSet;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use gitree::config::config_path;
use gitree::picker::run_picker;
use gitree::{
    ArchivePlan, DirectorySink, Error, FileConfig, JsonRoot, OutputConfig, Result, Root,
    SelectionController, Tree, TreeBuilder, TreeConfig, TreeFormatter, output_path, print_json,
    resolve_roots,
};
use rayon::prelude::*;
use tracing::Level;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gitree")]
#[command(about = "A directory tree that respects .gitignore")]
#[command(version)]
struct Args {
    /// Directories to display (wildcards are expanded)
    paths: Vec<String>,

    /// Descend only N levels deep
    #[arg(short = 'L', long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,

    /// Read .gitignore files only down to this directory depth
    #[arg(long = "gitignore-depth", value_name = "N")]
    gitignore_depth: Option<usize>,

    /// Apply --exclude patterns only down to this directory depth
    #[arg(long = "exclude-depth", value_name = "N")]
    exclude_depth: Option<usize>,

    /// Show at most N entries per directory (1-10000)
    #[arg(long = "max-items", value_name = "N")]
    max_items: Option<usize>,

    /// Do not limit entries per directory
    #[arg(long = "no-max-items", conflicts_with = "max_items")]
    no_max_items: bool,

    /// Show at most N entries in total per root (1-10000)
    #[arg(long = "max-entries", value_name = "N")]
    max_entries: Option<usize>,

    /// Do not limit the total number of entries
    #[arg(long = "no-max-entries", conflicts_with = "max_entries")]
    no_max_entries: bool,

    /// Show hidden (dot) files and directories
    #[arg(short = 'a', long = "hidden-items")]
    hidden_items: bool,

    /// Ignore .gitignore files
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// List directories only
    #[arg(long = "no-files")]
    no_files: bool,

    /// List files before directories
    #[arg(long = "files-first", conflicts_with = "dirs_first")]
    files_first: bool,

    /// List directories before files
    #[arg(long = "dirs-first")]
    dirs_first: bool,

    /// Exclude paths matching a gitignore-style pattern (can be used multiple times)
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Only list files matching a gitignore-style pattern (can be used multiple times)
    #[arg(long = "include", value_name = "PATTERN")]
    include: Vec<String>,

    /// Only list files with these extensions (comma separated)
    #[arg(long = "include-file-types", value_name = "EXT", value_delimiter = ',')]
    include_file_types: Vec<String>,

    /// Output in JSON format
    #[arg(long = "json", conflicts_with = "interactive")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Save the tree to FILE (".txt" is appended unless FILE ends in .txt or .md)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        conflicts_with_all = ["json", "interactive"]
    )]
    output: Option<String>,

    /// Pick files interactively
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Copy the listed (or selected) files into DIR instead of printing the tree
    #[arg(long = "archive-dir", value_name = "DIR")]
    archive_dir: Option<PathBuf>,

    /// Read settings from FILE instead of .gitree/config.json
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore the config file
    #[arg(long = "no-config", conflicts_with = "config")]
    no_config: bool,

    /// Write a default config file and exit
    #[arg(long = "init-config")]
    init_config: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// The command-line configuration layer. Unset flags stay `None` so lower
    /// layers can fill them.
    fn layer(&self) -> FileConfig {
        let flag = |set: bool| set.then_some(true);
        let list = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        // An explicit cap overrides a lower layer's "no cap"
        let lift = |lifted: bool, cap: Option<usize>| match (lifted, cap) {
            (true, _) => Some(true),
            (false, Some(_)) => Some(false),
            (false, None) => None,
        };

        FileConfig {
            max_items: self.max_items,
            max_entries: self.max_entries,
            max_depth: self.max_depth,
            gitignore_depth: self.gitignore_depth,
            exclude_depth: self.exclude_depth,
            hidden_items: flag(self.hidden_items),
            files_first: if self.dirs_first {
                Some(false)
            } else {
                flag(self.files_first)
            },
            dirs_first: flag(self.dirs_first),
            no_gitignore: flag(self.no_gitignore),
            no_files: flag(self.no_files),
            no_max_items: lift(self.no_max_items, self.max_items),
            no_max_entries: lift(self.no_max_entries, self.max_entries),
            exclude: list(&self.exclude),
            include: list(&self.include),
            include_file_types: list(&self.include_file_types),
        }
    }
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("gitree: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let path = config_path(args.config.as_deref());
    if args.init_config {
        if FileConfig::write_default(&path)? {
            println!("Created {}", path.display());
        }
        return Ok(());
    }

    let file_layer = if args.no_config {
        FileConfig::default()
    } else {
        FileConfig::load(&path)?.unwrap_or_default()
    };
    let tree_config = args.layer().merge(file_layer).into_tree_config()?;
    let roots = resolve_roots(&args.paths)?;
    let tree_config = if args.interactive || args.archive_dir.is_some() {
        uncapped(tree_config, args)
    } else {
        tree_config
    };
    let builder = TreeBuilder::new(tree_config);

    if args.interactive {
        return run_interactive(args, &builder, &roots);
    }

    // Roots are independent; collect keeps them in input order
    let trees: Vec<Tree> = roots
        .par_iter()
        .map(|root| builder.build(&root.path))
        .collect::<Result<_>>()?;

    if let Some(dest) = &args.archive_dir {
        let mut plan = ArchivePlan::default();
        for (root, tree) in roots.iter().zip(&trees) {
            plan.extend(ArchivePlan::from_tree(
                &root.path,
                tree,
                archive_prefix(root, roots.len()).as_deref(),
            ));
        }
        return write_archive(dest, &plan);
    }

    if args.json {
        let json_roots: Vec<JsonRoot<'_>> = roots
            .iter()
            .zip(&trees)
            .map(|(root, tree)| JsonRoot {
                root: &root.path,
                tree,
            })
            .collect();
        return print_json(&json_roots).map_err(Error::Output);
    }

    if let Some(name) = &args.output {
        let path = output_path(name);
        let plain = TreeFormatter::new(OutputConfig {
            use_color: false,
            show_summary: true,
        });
        let mut text = String::new();
        for (i, (root, tree)) in roots.iter().zip(&trees).enumerate() {
            text.push_str(&header(root, i, roots.len()));
            text.push_str(&plain.format(&root.dir_name(), tree));
        }
        fs::write(&path, text).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!("saved tree to {}", path.display());
        return Ok(());
    }

    let formatter = TreeFormatter::new(OutputConfig {
        use_color: should_use_color(args.color),
        show_summary: true,
    });
    for (i, (root, tree)) in roots.iter().zip(&trees).enumerate() {
        print_header(root, i, roots.len());
        formatter
            .print(&root.dir_name(), tree)
            .map_err(Error::Output)?;
    }
    Ok(())
}

/// Select files root by root, then print or archive the selection.
fn run_interactive(args: &Args, builder: &TreeBuilder, roots: &[Root]) -> Result<()> {
    let mut selections: Vec<(&Root, Tree, BTreeSet<PathBuf>)> = Vec::new();

    for root in roots {
        let tree = builder.build(&root.path)?;
        let files = {
            let mut controller = SelectionController::new(&root.path, &tree);
            run_picker(&mut controller)
                .map_err(Error::Terminal)?
                .into_files()
        };
        if !files.is_empty() {
            selections.push((root, tree, files));
        }
    }

    if let Some(dest) = &args.archive_dir {
        let mut plan = ArchivePlan::default();
        for (root, tree, files) in &selections {
            let mut part = ArchivePlan::from_tree(
                &root.path,
                tree,
                archive_prefix(root, roots.len()).as_deref(),
            );
            part.retain_selected(files);
            plan.extend(part);
        }
        return write_archive(dest, &plan);
    }

    for (i, (root, _, files)) in selections.iter().enumerate() {
        print_header(root, i, selections.len());
        for file in files {
            println!("{}", file.display());
        }
    }
    Ok(())
}

/// Archiving and picking cover every file; item caps apply only when given
/// on the command line.
fn uncapped(config: TreeConfig, args: &Args) -> TreeConfig {
    TreeConfig {
        max_items: args.max_items.and(config.max_items),
        max_entries: args.max_entries.and(config.max_entries),
        ..config
    }
}

fn archive_prefix(root: &Root, root_count: usize) -> Option<String> {
    (root_count > 1).then(|| root.dir_name())
}

fn write_archive(dest: &Path, plan: &ArchivePlan) -> Result<()> {
    let mut sink = DirectorySink::create(dest)?;
    let written = plan.write_to(&mut sink)?;
    println!("Copied {} files to {}", written, sink.dest().display());
    Ok(())
}

/// The `=== label ===` header shown when several roots are rendered, with a
/// blank line before every header but the first.
fn header(root: &Root, index: usize, total: usize) -> String {
    match (total, index) {
        (0..=1, _) => String::new(),
        (_, 0) => format!("=== {} ===\n", root.label),
        _ => format!("\n=== {} ===\n", root.label),
    }
}

fn print_header(root: &Root, index: usize, total: usize) {
    print!("{}", header(root, index, total));
}
