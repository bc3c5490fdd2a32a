// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use stockyard::api;
use stockyard::app_state::AppState;
use stockyard::catalog::YamlCategoryStore;
use stockyard::config::ValidatedConfig;
use stockyard::runtime_paths::RuntimePaths;

struct ParsedArgs {
    runtime_root: PathBuf,
    show_help: bool,
}

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if parsed_args.show_help {
        println!("Usage: stockyard [-C <root>]");
        println!("  -C <root>   runtime directory holding config.yaml and state/ (default: .)");
        return 0;
    }

    let runtime_paths = match RuntimePaths::from_root(&parsed_args.runtime_root) {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("❌ Invalid runtime root: {}", error);
            return 1;
        }
    };

    let (validated_config, created_config) =
        match ValidatedConfig::load_or_create(&runtime_paths.config_file) {
            Ok(result) => result,
            Err(error) => {
                eprintln!("❌ Configuration error: {}", error);
                eprintln!("❌ Application cannot start with invalid configuration.");
                return 1;
            }
        };
    if created_config {
        eprintln!(
            "[bootstrap] created {}",
            runtime_paths.config_file.display()
        );
    }

    let result = System::new().block_on(run_server(validated_config, runtime_paths));
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn parse_args() -> Result<ParsedArgs, String> {
    let mut runtime_root = PathBuf::from(".");
    let mut show_help = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-C" => {
                let value = args
                    .next()
                    .ok_or_else(|| "-C requires a directory argument".to_string())?;
                runtime_root = PathBuf::from(value);
            }
            "-h" | "--help" => show_help = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(ParsedArgs {
        runtime_root,
        show_help,
    })
}

async fn run_server(
    validated_config: ValidatedConfig,
    runtime_paths: RuntimePaths,
) -> std::io::Result<()> {
    let log_level = match validated_config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    // Stable log format shared across the product.
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    info!("Runtime root: {}", runtime_paths.root.display());

    let categories = match YamlCategoryStore::open(runtime_paths.categories_file.clone()) {
        Ok(store) => Arc::new(store),
        Err(error) => {
            eprintln!("❌ Failed to open category store: {}", error);
            eprintln!("❌ Application cannot start without its category store.");
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!("✅ Category store opened successfully");

    let app_state = web::Data::new(AppState::new(categories, runtime_paths));
    let config_data = web::Data::new(validated_config.clone());

    let bind = validated_config.server.bind.clone();
    let port = validated_config.server.port;
    info!(
        "✅ {} listening on {}:{}",
        validated_config.app.name, bind, port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .app_data(config_data.clone())
            .configure(api::configure)
    })
    .workers(validated_config.server.workers)
    .bind((bind.as_str(), port))?
    .run()
    .await
}
