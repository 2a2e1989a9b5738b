use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::cli::args::{CliArgs, Command};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::engine::{DirectoryEngine, CONVERTED_KEY};
use crate::links::{LinkTemplates, DEFAULT_DASHBOARD_BASE, DEFAULT_SITE_BASE};
use crate::loader::{self, DataSource, LoadOutcome, DEFAULT_TIMEOUT_SECONDS};
use crate::logging;
use crate::output::{self, Notice, OutputFormat};
use crate::shell::{self, Flow};
use crate::store::{ConvertedStore, JsonFileStore};

fn print_banner() {
    const BANNER: &str = r#"
    __    __               ___
   / /_  / /_  _____  ____/ (_)____
  / __ \/ / / / / _ \/ __  / / ___/
 / /_/ / / /_/ /  __/ /_/ / / /
/_.___/_/\__,_/\___/\__,_/_/_/
      company directory :: type 'help'
    "#;
    println!("{}", BANNER);
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
struct RunConfig {
    data_source: DataSource,
    state_file: PathBuf,
    links: LinkTemplates,
    timeout: u64,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
    command: Command,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    let command = args.command_or_default();

    let data_source = args
        .data
        .or(cfg.data_source)
        .map(|raw| DataSource::parse(&raw))
        .unwrap_or(DataSource::Builtin);

    let state_file = args
        .state
        .or(cfg.state_file)
        .filter(|p| !p.trim().is_empty())
        .map(|p| config::expand_tilde(&p))
        .unwrap_or_else(config::default_state_path);

    let site_base = args
        .site_base
        .or(cfg.site_base)
        .unwrap_or_else(|| DEFAULT_SITE_BASE.to_string());
    let dashboard_base = args
        .dashboard_base
        .or(cfg.dashboard_base)
        .unwrap_or_else(|| DEFAULT_DASHBOARD_BASE.to_string());

    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }

    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text or json"))?,
        None => OutputFormat::Text,
    };

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    Ok(RunConfig {
        data_source,
        state_file,
        links: LinkTemplates::new(&site_base, &dashboard_base),
        timeout,
        output_format,
        no_color,
        verbose: args.verbose,
        command,
    })
}

async fn load_with_spinner(run: &RunConfig) -> Result<LoadOutcome, String> {
    let show_spinner =
        run.output_format == OutputFormat::Text && run.data_source != DataSource::Builtin;
    let pb = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_style(
            ProgressStyle::with_template(":: {spinner} {msg}")
                .map_err(|e| format!("failed to build spinner style: {e}"))?,
        );
        pb.set_message("جاري تحميل البيانات...");
        pb
    } else {
        ProgressBar::hidden()
    };

    let outcome = loader::load_or_fallback(&run.data_source, run.timeout).await;
    pb.finish_and_clear();
    Ok(outcome)
}

fn emit(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

fn run_command<S: ConvertedStore>(
    engine: &mut DirectoryEngine<S>,
    run: &RunConfig,
) -> Result<(), String> {
    let format = run.output_format;
    match run.command.clone() {
        Command::Categories => {
            emit(&output::render_categories(&output::category_entries(engine), format));
        }
        Command::Show { category, search } => {
            engine.select_category(&category.join(" "));
            if let Some(term) = search {
                engine.apply_search(&term);
            }
            emit(&output::render_selection(engine, &run.links, format));
        }
        Command::Converted { search } => {
            engine.select_category(CONVERTED_KEY);
            if let Some(term) = search {
                engine.apply_search(&term);
            }
            emit(&output::render_selection(engine, &run.links, format));
        }
        Command::Mark { ids } => {
            for id in ids {
                engine.mark_converted(id);
            }
            emit(&output::render_stats(&engine.stats(), format));
        }
        Command::Unmark { ids } => {
            for id in ids {
                engine.unmark_converted(id);
            }
            emit(&output::render_stats(&engine.stats(), format));
        }
        Command::Stats => {
            emit(&output::render_stats(&engine.stats(), format));
        }
        Command::Shell => run_shell(engine, run)?,
    }
    Ok(())
}

fn run_shell<S: ConvertedStore>(
    engine: &mut DirectoryEngine<S>,
    run: &RunConfig,
) -> Result<(), String> {
    if run.output_format == OutputFormat::Text {
        print_banner();
        emit(&output::render_categories(
            &output::category_entries(engine),
            run.output_format,
        ));
        emit(&output::render_stats(&engine.stats(), run.output_format));
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if run.output_format == OutputFormat::Text {
            emit(&format!("{} ", "bluedir>".bold().blue()));
        }
        let line = match lines.next() {
            Some(line) => line.map_err(|e| format!("failed to read input: {e}"))?,
            None => break,
        };
        let action = match shell::parse_line(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                output::print_notice(Notice::Warn, &e.to_string());
                continue;
            }
        };
        tracing::debug!(?action, "dispatching");
        match shell::dispatch(engine, action, &run.links, run.output_format) {
            Flow::Continue(text) => emit(&text),
            Flow::Quit => break,
        }
    }
    Ok(())
}

fn run_session(run: RunConfig) -> Result<(), String> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;
    let outcome = rt.block_on(load_with_spinner(&run))?;

    if let Some(warning) = outcome.warning() {
        output::print_notice(Notice::Warn, warning);
    }
    if run.verbose > 0 && run.output_format == OutputFormat::Text {
        format_kv_line("data", &run.data_source.describe());
        format_kv_line("state", &run.state_file.display().to_string());
        format_kv_line("categories", &outcome.catalog.len().to_string());
        println!();
    }

    let store = JsonFileStore::new(&run.state_file);
    let mut engine = DirectoryEngine::new(outcome.catalog, store);
    run_command(&mut engine, &run)
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };
    validation::validate(&args)?;

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => {
                if let Err(e) = config::ensure_default_config_file(&path) {
                    output::print_notice(Notice::Warn, &e);
                }
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    logging::init(run.verbose, run.no_color);

    run_session(run)
}
