use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bugdeck::cli::{Cli, ColumnsAction, Commands, ConfigAction, FilterAction};
use bugdeck::commands::{
    LsOptions, cmd_columns_hide, cmd_columns_hide_all, cmd_columns_move, cmd_columns_reset,
    cmd_columns_show, cmd_columns_show_all, cmd_columns_unhide, cmd_columns_width,
    cmd_config_get, cmd_config_set, cmd_config_show, cmd_filter_clear, cmd_filter_range,
    cmd_filter_search, cmd_filter_show, cmd_filter_sort, cmd_filter_toggle, cmd_ls,
};

const LOG_ENV: &str = "BUGDECK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ls {
            file,
            remote,
            page,
            page_size,
            scroll,
            json,
        } => {
            cmd_ls(LsOptions {
                file,
                remote,
                page,
                page_size,
                scroll,
                json,
            })
            .await
        }

        Commands::Filter { action } => match action {
            FilterAction::Show { json } => cmd_filter_show(json),
            FilterAction::Search { term } => cmd_filter_search(&term),
            FilterAction::Toggle { dimension, value } => cmd_filter_toggle(dimension, &value),
            FilterAction::Range { from, to } => cmd_filter_range(from.as_deref(), to.as_deref()),
            FilterAction::Sort { field, order } => cmd_filter_sort(field, order),
            FilterAction::Clear { all, json } => cmd_filter_clear(all, json),
        },

        Commands::Columns { action } => match action {
            ColumnsAction::Show { json } => cmd_columns_show(json),
            ColumnsAction::Move { from, to } => cmd_columns_move(from, to),
            ColumnsAction::Hide { id } => cmd_columns_hide(id),
            ColumnsAction::Unhide { id } => cmd_columns_unhide(id),
            ColumnsAction::Width { id, width } => cmd_columns_width(id, width),
            ColumnsAction::Reset { json } => cmd_columns_reset(json),
            ColumnsAction::ShowAll => cmd_columns_show_all(),
            ColumnsAction::HideAll => cmd_columns_hide_all(),
        },

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
