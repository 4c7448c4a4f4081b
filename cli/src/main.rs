//! restpipe CLI — exercise the pipeline and the registries surface.
//!
//! Usage:
//! ```bash
//! # Send one request through the standard policy chain
//! restpipe send --url https://example.com
//!
//! # List registries in a subscription
//! restpipe registries list --endpoint https://management.example.com --subscription sub-123
//!
//! # Get one registry by name
//! restpipe registries get --endpoint https://management.example.com \
//!     --subscription sub-123 --resource-group rg-1 --name primary
//! ```

use std::env;
use std::process;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use restpipe_core::pipeline::RetryConfig;
use restpipe_core::{HttpRequest, Method};
use restpipe_http::PipelineClient;
use restpipe_registry::{OperationScope, RegistriesClient, RegistryOperations};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "send" => cmd_send(&args[2..]).await,
        "registries" => cmd_registries(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("restpipe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("restpipe {}", env!("CARGO_PKG_VERSION"));
    println!("Exercise the HTTP policy pipeline from the terminal\n");
    println!("USAGE:");
    println!("    restpipe <COMMAND>\n");
    println!("COMMANDS:");
    println!("    send        Send one request through the standard chain");
    println!("    registries  list | get registry resources");
    println!("    version     Print version");
    println!("    help        Print this help\n");
    println!("SEND FLAGS:");
    println!("    --url <URL>          Request URL  [required]");
    println!("    --method <METHOD>    HTTP method  [default: GET]");
    println!("    --attempts <N>       Retry attempts  [default: 3]");
    println!("    --timeout-ms <MS>    Overall deadline in milliseconds");
    println!("\nREGISTRIES FLAGS:");
    println!("    --endpoint <URL>         Service endpoint  [required]");
    println!("    --subscription <ID>      Subscription id   [required]");
    println!("    --resource-group <NAME>  Resource group    (get)");
    println!("    --name <NAME>            Registry name     (get)");
}

async fn cmd_send(args: &[String]) -> Result<()> {
    let url = parse_flag(args, "--url").context("--url is required")?;
    let method: Method = parse_flag(args, "--method")
        .unwrap_or_else(|| "GET".into())
        .parse()
        .map_err(|e| anyhow!("{e}"))?;
    let attempts: u32 = match parse_flag(args, "--attempts") {
        Some(n) => n.parse().context("--attempts must be a number")?,
        None => 3,
    };

    let client = PipelineClient::builder(&url)
        .retry(RetryConfig {
            max_attempts: attempts,
            ..RetryConfig::default()
        })
        .build();

    let mut request = HttpRequest::new(method, &url);
    if let Some(ms) = parse_flag(args, "--timeout-ms") {
        let ms: u64 = ms.parse().context("--timeout-ms must be a number")?;
        request.context_mut().set_timeout(Duration::from_millis(ms));
    }

    println!("Sending {method} {url}...");
    let start = std::time::Instant::now();
    let response = client.send_request(request).await?;
    let latency = start.elapsed();

    println!("  Status:       {}", response.status());
    println!("  Latency:      {}ms", latency.as_millis());
    println!(
        "  Content-Type: {}",
        response.content_type().unwrap_or("unknown")
    );
    println!("  Body size:    {} bytes", response.body().len());
    if let Some(decoded) = response.decoded() {
        println!("{}", serde_json::to_string_pretty(decoded).unwrap_or_default());
    }
    Ok(())
}

async fn cmd_registries(args: &[String]) -> Result<()> {
    let sub = args.first().map(String::as_str);
    let rest = if args.is_empty() { args } else { &args[1..] };

    let endpoint = parse_flag(rest, "--endpoint").context("--endpoint is required")?;
    let subscription = parse_flag(rest, "--subscription").context("--subscription is required")?;

    let scope = OperationScope {
        subscription_id: subscription,
        resource_group_name: parse_flag(rest, "--resource-group").unwrap_or_default(),
        registry_name: parse_flag(rest, "--name"),
    };
    let client = PipelineClient::builder(&endpoint).build();
    let ops = RegistryOperations::new(scope, RegistriesClient::new(client));

    match sub {
        Some("list") => {
            let registries = ops.list().await?;
            println!("{} registries:", registries.len());
            for r in registries {
                println!(
                    "  {:<24} {:<12} {}",
                    r.name,
                    r.location,
                    r.description.unwrap_or_default()
                );
            }
            Ok(())
        }
        Some("get") => {
            let registry = ops.get(None).await?;
            println!("  Name:        {}", registry.name);
            println!("  Location:    {}", registry.location);
            if let Some(description) = registry.description {
                println!("  Description: {description}");
            }
            if let Some(access) = registry.public_network_access {
                println!("  Access:      {access}");
            }
            for (key, value) in &registry.tags {
                println!("  Tag:         {key}={value}");
            }
            Ok(())
        }
        _ => Err(anyhow!("expected: registries <list|get> [flags]")),
    }
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
