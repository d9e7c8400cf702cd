//! A lookup-style CLI: prints every hop the iterative walker takes.
use std::str::FromStr;

use clap::Parser;
use log::debug;
use tokio_util::sync::CancellationToken;

use iterdns::{Outcome, QType, Resolver};

#[derive(Debug, Parser)]
#[clap(name = "lookup", about = "Iteratively resolve a name, printing every hop")]
struct Cli {
    /// Name to resolve, e.g. www.cherpec.com
    name: String,

    /// Query type, e.g. A, AAAA, NS, MX (default A)
    #[clap(default_value = "A")]
    qtype: String,

    /// Verbose logging
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let qtype = match QType::from_str(&cli.qtype) {
        Ok(qtype) => qtype,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    debug!("resolving {} {}", cli.name, qtype);

    let resolver = Resolver::new();
    let walker = resolver.iterator();
    let cancel = CancellationToken::new();

    let stream = walker.resolve(cancel, iterdns::Name::from(cli.name.as_str()), qtype);
    tokio::pin!(stream);

    use tokio_stream::StreamExt;
    let mut hop = 0;
    while let Some(response) = stream.next().await {
        hop += 1;
        match &response.outcome {
            Outcome::Success { message, rtt } => {
                println!(
                    "hop {}: {} answers={} authorities={} additionals={} rtt={:?}",
                    hop,
                    response.addr(),
                    message.answers.len(),
                    message.authorities.len(),
                    message.additionals.len(),
                    rtt
                );
                for rr in &message.answers {
                    println!("  {} {} {} {}", rr.name, rr.rtype, rr.ttl, rr.rdata);
                }
            }
            Outcome::Error(error) => {
                println!("hop {}: {} -> {}", hop, response.addr(), error);
            }
        }
    }
}
