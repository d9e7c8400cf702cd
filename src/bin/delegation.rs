//! A trace-style CLI: prints the ordered delegation path for a name, then
//! the resolved parent server and nameserver set.
use clap::Parser;
use log::debug;
use tokio_util::sync::CancellationToken;

use iterdns::Resolver;

#[derive(Debug, Parser)]
#[clap(name = "delegation", about = "Trace the NS delegation path for a name")]
struct Cli {
    /// Name to trace, e.g. cherpec.com
    name: String,

    /// Verbose logging
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    debug!("tracing delegation for {}", cli.name);

    let resolver = Resolver::new();
    let result = resolver.delegation(CancellationToken::new(), &cli.name).await;

    for (hop, response) in result.path.iter().enumerate() {
        match response.message() {
            Some(message) => println!(
                "hop {}: {} authorities={} answers={}",
                hop + 1,
                response.addr(),
                message.authorities.len(),
                message.answers.len()
            ),
            None => println!("hop {}: {} -> {}", hop + 1, response.addr(), response.error_ref().unwrap()),
        }
    }

    if let Some(error) = &result.error {
        eprintln!("delegation trace failed: {}", error);
        std::process::exit(1);
    }

    match iterdns::resolver::delegation_of(&result, &cli.name) {
        Some(delegation) => {
            println!("parent server: {}", delegation.parent_server);
            for ns in &delegation.nameservers {
                println!("  NS {}", ns);
            }
        }
        None => println!("no delegation NS records found"),
    }
}
