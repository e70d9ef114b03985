//! Command dispatch
//!
//! Resolves settings, builds the service container and runs one subcommand.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{PlacedConcept, RenderOutcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{expand_env_vars, Document, Gesture};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Marker for reading the document from standard input.
const STDIN_PATH: &str = "-";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into());
    };

    // Completion needs no settings
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Render {
            file,
            output,
            width,
            gestures,
        } => cmd_render(&container, file, output.as_deref(), *width, gestures),
        Commands::Layout { file, width } => cmd_layout(&container, file, *width),
        Commands::Outline { file } => cmd_outline(&container, file),
        Commands::Report { file } => cmd_report(&container, file),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_project_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(dir) => Ok(PathBuf::from(expand_env_vars(&dir.to_string_lossy()))),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn load_document(container: &ServiceContainer, file: &str) -> CliResult<Document> {
    let document = if file == STDIN_PATH {
        container.documents.load_stdin()?
    } else {
        let path = PathBuf::from(expand_env_vars(file));
        container.documents.load(&path)?
    };
    Ok(document)
}

#[instrument(level = "debug", skip(container, gestures))]
fn cmd_render(
    container: &ServiceContainer,
    file: &str,
    out: Option<&str>,
    width: Option<f64>,
    gestures: &[Gesture],
) -> CliResult<()> {
    let document = load_document(container, file)?;
    let tree = Arc::new(document.concept_map().clone());
    let rendered = container.maps.render(tree, width, gestures)?;

    match &rendered.outcome {
        RenderOutcome::Drawn { nodes, links } => {
            debug!("drawn {} nodes, {} links", nodes, links)
        }
        RenderOutcome::Blank(reason) => {
            output::warning(&format!("nothing drawn: {:?}", reason))
        }
        RenderOutcome::Unchanged => {}
    }

    match out {
        Some(out) => {
            let path = PathBuf::from(expand_env_vars(out));
            container.documents.write_output(&path, &rendered.svg)?;
            output::success(&format!(
                "wrote {} ({})",
                path.display(),
                rendered.transform
            ));
        }
        None => print!("{}", rendered.svg),
    }
    Ok(())
}

fn cmd_layout(container: &ServiceContainer, file: &str, width: Option<f64>) -> CliResult<()> {
    let document = load_document(container, file)?;
    let placed = container.maps.layout(document.concept_map(), width)?;
    for line in layout_table(&placed) {
        output::info(&line);
    }
    Ok(())
}

/// Rows of the `layout` listing; labels are indented by depth.
pub fn layout_table(placed: &[PlacedConcept]) -> Vec<String> {
    let label_of = |p: &PlacedConcept| format!("{}{}", "  ".repeat(p.depth), p.label);
    let width = placed
        .iter()
        .map(|p| label_of(p).chars().count())
        .max()
        .unwrap_or(0)
        .max("CONCEPT".len());

    let mut rows = Vec::with_capacity(placed.len() + 1);
    rows.push(format!(
        "{:<width$}  {:>5}  {:>9}  {:>9}  {}",
        "CONCEPT", "DEPTH", "DEPTH_POS", "SIBLING", "KIND"
    ));
    rows.extend(placed.iter().map(|p| {
        format!(
            "{:<width$}  {:>5}  {:>9.2}  {:>9.2}  {}",
            label_of(p),
            p.depth,
            p.depth_pos,
            p.sibling_pos,
            if p.is_leaf { "leaf" } else { "internal" }
        )
    }));
    rows
}

fn cmd_outline(container: &ServiceContainer, file: &str) -> CliResult<()> {
    let document = load_document(container, file)?;
    output::info(&container.documents.outline(document.concept_map()).trim_end());
    Ok(())
}

fn cmd_report(container: &ServiceContainer, file: &str) -> CliResult<()> {
    let document = load_document(container, file)?;
    let report = container.documents.report(&document);

    match &report.summary {
        Some(summary) => {
            output::header("Summary");
            output::detail(summary);
        }
        None => output::warning("document has no analysis, only the concept map"),
    }

    if !report.sources.is_empty() {
        output::header("Sources");
        for (i, source) in report.sources.iter().enumerate() {
            output::item(
                i + 1,
                &format!("{} (relevance {})", source.title, source.relevance),
            );
            output::note(&source.description);
        }
    }

    if !report.roadmap.is_empty() {
        output::header("Roadmap");
        for (i, step) in report.roadmap.iter().enumerate() {
            output::item(i + 1, &format!("{} [{}]", step.step, step.estimated_time));
            output::note(&step.description);
        }
    }

    if !report.stats.is_empty() {
        output::header("Topics");
        for stat in &report.stats {
            output::detail(&format!(
                "{}: complexity {}, importance {}",
                stat.topic, stat.complexity, stat.importance
            ));
        }
    }

    if !report.questions.is_empty() {
        output::header("Suggested questions");
        for question in &report.questions {
            output::detail(&format!("- {question}"));
        }
    }

    output::header("Concept map");
    output::detail(&format!(
        "{} concepts, {} leaves, {} levels",
        report.map.nodes, report.map.leaves, report.map.depth
    ));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(project_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .documents
                .write_output(&path, &Settings::template())?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            let mark = |p: &Path| if container.fs.exists(p) { "" } else { " (missing)" };
            match global_config_path() {
                Some(global) => output::detail(&format!(
                    "global: {}{}",
                    global.display(),
                    mark(&global)
                )),
                None => output::detail("global: (unavailable)"),
            }
            let local = local_config_path(project_dir);
            output::detail(&format!("local:  {}{}", local.display(), mark(&local)));
            Ok(())
        }
    }
}
