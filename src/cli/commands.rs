//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::HierarchyService;
use crate::application::StringRecord;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::global_config_path;
use crate::domain::{HierarchyItem, HierarchyOptions, TreeDisplay};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".to_string()));
    };

    match command {
        Commands::Tree { file, select } => tree(&service(cli)?, file, select.as_deref()),
        Commands::Find { file, id } => find(&service(cli)?, file, id),
        Commands::Ancestors { file, id } => ancestors(&service(cli)?, file, id),
        Commands::Descendants { file, id } => descendants(&service(cli)?, file, id),
        Commands::Stats { file } => stats(&service(cli)?, file),
        Commands::Config { command } => config(cli, command),
        Commands::Completion { shell } => {
            completion(*shell);
            Ok(())
        }
    }
}

/// Options from config layers, with `--parent-links` applied on top.
fn load_options(cli: &Cli) -> CliResult<HierarchyOptions> {
    let mut options = HierarchyOptions::load(cli.config.as_deref())?;
    if cli.parent_links {
        options.set_parent_links = true;
    }
    debug!("effective options: {:?}", options);
    Ok(options)
}

fn service(cli: &Cli) -> CliResult<HierarchyService> {
    Ok(HierarchyService::new(load_options(cli)?))
}

fn warn_without_parent_links(service: &HierarchyService, what: &str) {
    if !service.options().set_parent_links {
        output::warning(&format!(
            "parent links disabled, {} unavailable (use --parent-links)",
            what
        ));
    }
}

fn node_label(node: &StringRecord) -> String {
    output::selection_label(node.to_string(), node.is_selected(), node.has_selected_child())
}

#[instrument(skip(service))]
fn tree(service: &HierarchyService, file: &Path, select: Option<&str>) -> CliResult<()> {
    if select.is_some() {
        warn_without_parent_links(service, "ancestor marking is");
    }
    let forest = service.tree(file, select)?;

    for root in &forest.roots {
        output::info(&root.to_tree_with(&node_label));
    }

    let orphans = forest.orphans();
    if !orphans.is_empty() {
        output::warning(&format!(
            "dropped {} orphan(s): {}",
            orphans.len(),
            orphans.iter().join(", ")
        ));
    }
    Ok(())
}

#[instrument(skip(service))]
fn find(service: &HierarchyService, file: &Path, id: &str) -> CliResult<()> {
    match service.find(file, id)? {
        Some(summary) => output::node_summary(&summary),
        None => output::warning(&format!("node not found: {}", id)),
    }
    Ok(())
}

#[instrument(skip(service))]
fn ancestors(service: &HierarchyService, file: &Path, id: &str) -> CliResult<()> {
    warn_without_parent_links(service, "ancestors are");
    match service.ancestors(file, id)? {
        Some(ancestors) if ancestors.is_empty() => output::detail(&"no ancestors"),
        Some(ancestors) => output::info(&ancestors.iter().map(|a| &a.id).join(" > ")),
        None => output::warning(&format!("node not found: {}", id)),
    }
    Ok(())
}

#[instrument(skip(service))]
fn descendants(service: &HierarchyService, file: &Path, id: &str) -> CliResult<()> {
    let descendants = service.descendants(file, id)?;
    if descendants.is_empty() {
        output::detail(&"no descendants");
    }
    for node in &descendants {
        output::info(&format!("{}\t{}\tlevel {}", node.id, node.label, node.level));
    }
    Ok(())
}

#[instrument(skip(service))]
fn stats(service: &HierarchyService, file: &Path) -> CliResult<()> {
    let stats = service.stats(file)?;
    output::header(&file.display());
    output::detail(&format!("records: {}", stats.records));
    output::detail(&format!("roots:   {}", stats.roots));
    output::detail(&format!("placed:  {}", stats.placed));
    output::detail(&format!("orphans: {}", stats.orphans));
    output::detail(&format!("depth:   {}", stats.depth));
    output::detail(&format!("leaves:  {}", stats.leaves.iter().join(", ")));
    Ok(())
}

fn config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let options = load_options(cli)?;
            output::info(&options.to_toml()?);
        }
        ConfigCommands::Template => output::info(&HierarchyOptions::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning(&"no home directory, global config unavailable"),
            }
            if let Some(path) = &cli.config {
                output::action("explicit", &path.display());
            }
        }
    }
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
