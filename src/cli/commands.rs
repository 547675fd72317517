//! Command dispatch

use std::io;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::CourseIndex;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Course, DeleteStrategy, Insertion, Order};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::List { order }) => cmd_list(&container(cli)?, *order),
        Some(Commands::Add {
            code,
            subject_code,
            subject_name,
            semester,
            year,
            seats,
            registered,
            price,
        }) => {
            let course = Course {
                code: code.clone(),
                subject_code: subject_code.clone(),
                subject_name: subject_name.clone(),
                semester: semester.clone(),
                year: year.clone(),
                seats: *seats,
                registered: *registered,
                price: *price,
            };
            cmd_add(&container(cli)?, course)
        }
        Some(Commands::Get { code }) => cmd_get(&container(cli)?, code),
        Some(Commands::Search { fragment }) => cmd_search(&container(cli)?, fragment),
        Some(Commands::Delete { code, strategy }) => cmd_delete(&container(cli)?, code, *strategy),
        Some(Commands::Balance) => cmd_balance(&container(cli)?),
        Some(Commands::Stats) => cmd_stats(&container(cli)?),
        Some(Commands::Tree) => cmd_tree(&container(cli)?),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "coursetree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `coursetree --help`".to_string(),
        )),
    }
}

/// Settings from config layers, with `--file` taking precedence.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(file) = &cli.file {
        settings.data_file = file.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?))
}

/// Load the course file, reporting skipped input as warnings.
fn load_index(container: &ServiceContainer) -> CliResult<CourseIndex> {
    let (index, report) = container.load_course_index()?;
    if report.missing {
        output::warning(&format!(
            "file doesn't exist: {}",
            container.data_file().display()
        ));
    }
    if report.malformed > 0 {
        output::warning(&format!("skipped {} malformed lines", report.malformed));
    }
    if report.duplicates > 0 {
        output::warning(&format!("skipped {} duplicate courses", report.duplicates));
    }
    Ok(index)
}

fn save_index(container: &ServiceContainer, index: &CourseIndex) -> CliResult<()> {
    let path = container.data_file();
    let count = index.save(&path)?;
    output::action("Saved", &format!("{} courses to {}", count, path.display()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer, order: Option<Order>) -> CliResult<()> {
    let index = load_index(container)?;
    let order = order.unwrap_or(container.settings.listing_order);
    let mut stdout = io::stdout().lock();
    let count = index.write_listing(order, &mut stdout)?;
    debug!("listed {} courses in {} order", count, order);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_add(container: &ServiceContainer, course: Course) -> CliResult<()> {
    let mut index = load_index(container)?;
    let code = course.code.clone();
    if index.add(course) == Insertion::Duplicate {
        return Err(CliError::Duplicate(code));
    }
    output::success(&format!("Added course {code}"));
    save_index(container, &index)
}

#[instrument(skip(container))]
fn cmd_get(container: &ServiceContainer, code: &str) -> CliResult<()> {
    let index = load_index(container)?;
    match index.search_by_code(code) {
        Some(course) => {
            output::info(course);
            Ok(())
        }
        None => Err(CliError::NotFound(code.to_string())),
    }
}

#[instrument(skip(container))]
fn cmd_search(container: &ServiceContainer, fragment: &str) -> CliResult<()> {
    let index = load_index(container)?;
    let matches = index.search_by_name(fragment);
    if matches.is_empty() {
        output::warning(&format!("no course name contains {fragment:?}"));
        return Ok(());
    }
    output::header(&format!("{} matching courses", matches.len()));
    for course in matches.breadth_first() {
        output::info(course);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_delete(
    container: &ServiceContainer,
    code: &str,
    strategy: Option<DeleteStrategy>,
) -> CliResult<()> {
    let mut index = load_index(container)?;
    let strategy = strategy.unwrap_or(container.settings.delete_strategy);
    match index.delete(code, strategy) {
        Some(course) => {
            output::success(&format!("Deleted course {} ({})", course.code, strategy));
            save_index(container, &index)
        }
        None => Err(CliError::NotFound(code.to_string())),
    }
}

#[instrument(skip(container))]
fn cmd_balance(container: &ServiceContainer) -> CliResult<()> {
    let mut index = load_index(container)?;
    let before = index.height();
    let was_balanced = index.is_balanced();
    index.balance();
    output::success(&format!(
        "Balanced {} courses: height {} -> {} (was {})",
        index.count(),
        before,
        index.height(),
        if was_balanced { "balanced" } else { "unbalanced" }
    ));
    save_index(container, &index)
}

#[instrument(skip(container))]
fn cmd_stats(container: &ServiceContainer) -> CliResult<()> {
    let index = load_index(container)?;
    output::header(&container.data_file().display());
    output::detail(&format!("courses:  {}", index.count()));
    output::detail(&format!("height:   {}", index.height()));
    output::detail(&format!("balanced: {}", index.is_balanced()));
    if let (Some(first), Some(last)) = (index.tree().min(), index.tree().max()) {
        output::detail(&format!("range:    {} .. {}", first.code, last.code));
    }
    output::detail(&format!("pre-order: {}", index.pre_order_codes()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer) -> CliResult<()> {
    let index = load_index(container)?;
    output::info(&index.render_tree());
    Ok(())
}

#[instrument]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (no config directory)"),
            }
            let local = cli
                .config
                .clone()
                .unwrap_or_else(|| local_config_path(std::path::Path::new(".")));
            output::detail(&format!("local:  {}", local.display()));
        }
    }
    Ok(())
}
