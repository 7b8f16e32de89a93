// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::path::PathBuf;
use std::time::Instant;
use the_chainworks::config::{load_config, Runtime, RuntimeBuilder};
use the_chainworks::ports::chain_ports;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_CONFIG: &str = "configs/runtime.yaml";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "the_chainworks=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 || args.get(1).is_some_and(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: {} [runtime.yaml]", args[0]);
        eprintln!("Example: {} {}", args[0], DEFAULT_CONFIG);
        std::process::exit(1);
    }
    let config_file = PathBuf::from(args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG));

    let start_time = Instant::now();
    let runtime = tokio::task::spawn_blocking({
        let config_file = config_file.clone();
        move || -> anyhow::Result<Runtime> {
            let config = load_config(&config_file)?;
            Ok(RuntimeBuilder::from_config(&config)?)
        }
    })
    .await
    .context("runtime builder task failed")?
    .with_context(|| format!("cannot build runtime from {}", config_file.display()))?;

    println!("📋 Configuration: {}", config_file.display());
    print_summary(&runtime);
    println!("\n⏱️  Total Time: {:?}", start_time.elapsed());
    Ok(())
}

fn print_summary(runtime: &Runtime) {
    println!("\n🧩 Platforms ({}):", runtime.platforms.len());
    for platform in runtime.platforms.platforms() {
        let models = platform
            .models_folder_if_declared()
            .ok()
            .flatten()
            .map(|folder| folder.display().to_string())
            .unwrap_or_else(|| "no models".to_string());
        println!(
            "  • {} \"{}\" [{}{}] → {}",
            platform.id(),
            platform.name(),
            platform.technology(),
            if platform.is_built_in() { ", built-in" } else { "" },
            models
        );
    }

    println!("\n🔧 Executors ({}):", runtime.specifications.len());
    for (id, specification) in runtime.specifications.entries() {
        let ports = chain_ports(&specification, false);
        let role = specification
            .settings_name()
            .map(|name| format!(" (settings \"{}\")", name))
            .unwrap_or_default();
        println!("  • {}{}: {} port(s)", id, role, ports.len());
    }

    println!("\n🗺️  Mappings ({}):", runtime.mappings.len());
    for (id, mapping) in runtime.mappings.entries() {
        println!("  • {}: {}", id, mapping.specification().keys().join(", "));
    }

    match &runtime.settings_search {
        Some(search) => {
            let found = search.all_settings().map(|all| all.len()).unwrap_or(0);
            println!(
                "\n⚙️  Settings: {} combiner(s), {} reachable, complete: {}, duplicates: {}",
                runtime.combiners.len(),
                found,
                search.is_complete(),
                search.has_duplicates()
            );
            if let Ok(unresolved) = search.unresolved() {
                for reference in unresolved {
                    println!("     ⚠️  unresolved {}", reference);
                }
            }
        }
        None => println!("\n⚙️  Settings: {} combiner(s)", runtime.combiners.len()),
    }
}
