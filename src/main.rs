use std::process;

use clap::Parser;
use colored::Colorize;
use hierarchy_tools::cli::{execute_command, Cli};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Dependencies log nothing useful for a record file; keep our own targets only.
    let module_filter = filter_fn(|metadata| metadata.target().starts_with("hierarchy"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hierarchy_tools::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counts_verbosity() {
        let cli = Cli::try_parse_from(["hierarchy", "-dd", "stats", "records.toml"]).unwrap();
        assert_eq!(cli.debug, 2);
        assert!(!cli.parent_links);
    }

    #[test]
    fn given_select_flag_when_parsing_tree_then_captures_id() {
        let cli = Cli::try_parse_from([
            "hierarchy",
            "--parent-links",
            "tree",
            "records.toml",
            "--select",
            "a1",
        ])
        .unwrap();
        assert!(cli.parent_links);
        match cli.command {
            Some(hierarchy_tools::cli::Commands::Tree { select, .. }) => {
                assert_eq!(select.as_deref(), Some("a1"))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
