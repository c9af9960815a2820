use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::{env, io};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::resolve::resolve_project_with_override;
use crate::config::{load_project_config, ProjectConfig};
use crate::core::pattern::CoordinatePattern;
use crate::core::project::{Project, ReactorProject};
use crate::error::{DepgraphError, Result};
use crate::graph::conflict::classify;
use crate::graph::ops::{find_matching, path_to_root};
use crate::graph::viz::{serializer_for, OutputFormat, TreeTokens};
use crate::graph::{builder::VerboseGraphBuilder, DependencyGraph, NodeId};
use crate::resolver::FileResolver;
use crate::util::output;

const LOG_ENV: &str = "MVN_DEPGRAPH_LOG";

#[derive(Parser, Debug)]
#[command(name = "mvn-depgraph")]
#[command(about = "Verbose Maven dependency tree renderer", long_about = None)]
pub struct Cli {
    /// Project file; defaults to the nearest depgraph.toml.
    #[arg(short, long)]
    pub project: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the verbose dependency tree.
    Tree(TreeArgs),
    /// List omitted dependencies and why they were left out.
    Conflicts(ConflictsArgs),
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Resolution document produced by the resolver.
    #[arg(short, long)]
    pub graph: PathBuf,
    #[arg(short, long, env = "MVN_DEPGRAPH_OUTPUT_TYPE")]
    pub format: Option<String>,
    #[arg(long)]
    pub tokens: Option<String>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub append: bool,
    /// Do not fall back to reactor modules when resolution fails.
    #[arg(long)]
    pub no_reactor: bool,
}

#[derive(Args, Debug)]
pub struct ConflictsArgs {
    #[arg(short, long)]
    pub graph: PathBuf,
    /// Only report nodes matching `groupId[:artifactId[:type[:version]]]`.
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub no_reactor: bool,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    init_tracing(cli.verbose, !cli.no_color);

    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, ansi: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "mvn_depgraph=info,warn",
            2 => "mvn_depgraph=debug,info",
            _ => "trace",
        })
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_ansi(ansi)
                .with_writer(io::stderr),
        )
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Tree(args) => handle_tree(args, cli.project),
        Commands::Conflicts(args) => handle_conflicts(args, cli.project),
    }
}

struct LoadedProject {
    root: PathBuf,
    config: ProjectConfig,
    project: Project,
    reactor: Vec<ReactorProject>,
}

fn load_project(project_path: Option<PathBuf>) -> Result<LoadedProject> {
    let cwd = env::current_dir()?;
    let resolved = resolve_project_with_override(&cwd, project_path)?;
    debug!(config = %resolved.config_path.display(), "loading project");
    let config = load_project_config(&resolved.config_path)?;
    let project = config.to_project()?;
    let reactor = config.reactor_projects();
    Ok(LoadedProject {
        root: resolved.root,
        config,
        project,
        reactor,
    })
}

fn build_graph(
    loaded: &LoadedProject,
    graph_path: &Path,
    use_reactor: bool,
) -> Result<DependencyGraph> {
    let resolver = FileResolver::from_path(graph_path)?;
    let mut builder = VerboseGraphBuilder::new(&resolver);
    if use_reactor {
        builder = builder.with_reactor(&loaded.reactor);
    }
    let graph = builder.build(&loaded.project)?;
    info!(
        project = %loaded.project.coordinate,
        nodes = graph.node_count(),
        "built verbose dependency graph"
    );
    Ok(graph)
}

fn parse_setting<T>(raw: &str, what: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse().map_err(|message: String| {
        DepgraphError::Other(anyhow::anyhow!("invalid {what}: {message}"))
    })
}

fn handle_tree(args: TreeArgs, project_path: Option<PathBuf>) -> Result<()> {
    let loaded = load_project(project_path)?;
    let settings = &loaded.config.tree;

    let format: OutputFormat = match args.format.as_deref() {
        Some(raw) => parse_setting(raw, "output type")?,
        None => settings.output_format()?.unwrap_or_default(),
    };
    let tokens: TreeTokens = match args.tokens.as_deref() {
        Some(raw) => parse_setting(raw, "tree tokens")?,
        None => settings.tree_tokens()?.unwrap_or_default(),
    };
    let destination = args.output.clone().or_else(|| {
        settings
            .output_file
            .as_ref()
            .map(|path| loaded.root.join(path))
    });
    let append = args.append || settings.append_output;

    let graph = build_graph(&loaded, &args.graph, !args.no_reactor)?;
    let rendered = serializer_for(format, tokens).serialize(&graph);
    debug!(%format, bytes = rendered.len(), "rendered dependency tree");
    output::write_output(&rendered, destination.as_deref(), append)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ConflictEntry {
    node: String,
    kind: &'static str,
    reason: String,
    path: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ConflictReport {
    project: String,
    omitted: Vec<ConflictEntry>,
    summary: BTreeMap<&'static str, usize>,
}

fn node_name(graph: &DependencyGraph, id: NodeId) -> String {
    graph
        .node(id)
        .coordinate_string()
        .unwrap_or_else(|| "Null Artifact Node".to_string())
}

fn handle_conflicts(args: ConflictsArgs, project_path: Option<PathBuf>) -> Result<()> {
    let loaded = load_project(project_path)?;
    let graph = build_graph(&loaded, &args.graph, !args.no_reactor)?;
    let classification = classify(&graph);

    let selected: Option<HashSet<NodeId>> = match args.filter.as_deref() {
        Some(raw) => {
            let pattern = CoordinatePattern::parse(raw)
                .with_context(|| format!("invalid filter '{raw}'"))?;
            Some(find_matching(&graph, &pattern).into_iter().collect())
        }
        None => None,
    };

    let omitted: Vec<ConflictEntry> = classification
        .omitted()
        .filter(|(id, _)| selected.as_ref().map_or(true, |ids| ids.contains(id)))
        .map(|(id, reason)| ConflictEntry {
            node: node_name(&graph, id),
            kind: reason.kind(),
            reason: reason.to_string(),
            path: path_to_root(&graph, id)
                .into_iter()
                .map(|step| node_name(&graph, step))
                .collect(),
        })
        .collect();

    let report = ConflictReport {
        project: loaded.project.coordinate.to_string(),
        summary: classification.summary(),
        omitted,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.omitted.is_empty() {
        output::info(&format!("No omitted dependencies in {}", report.project));
        return Ok(());
    }

    for entry in &report.omitted {
        println!("{} - {}", entry.node, entry.reason);
        println!("  via {}", entry.path.join(" -> "));
    }
    let summary = report
        .summary
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    output::info(&format!("{} omitted ({})", report.omitted.len(), summary));
    Ok(())
}
