use std::env;
use std::process::ExitCode;
use std::time::Duration;

use a2squery::{A2SQuery, ServerInfo, SourceQueryError, DEFAULT_PORT};

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(host) = args.next() else {
        eprintln!("usage: a2squery <host> [port] [timeout-seconds]");
        return ExitCode::FAILURE;
    };
    let port = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("invalid port: {raw}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_PORT,
    };
    let timeout_dur = args
        .next()
        .and_then(|raw| raw.parse().ok())
        .map(Duration::from_secs);

    match run(&host, port, timeout_dur).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("query failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(host: &str, port: u16, timeout_dur: Option<Duration>) -> Result<(), SourceQueryError> {
    let mut query = A2SQuery::connect(host, port, timeout_dur).await?;

    match query.info().await? {
        ServerInfo::Source(info) => {
            println!("{} ({})", info.name, info.game);
            println!(
                "map {} | players {}/{} ({} bots) | vac {}",
                info.map, info.players, info.max_players, info.bots, info.vac
            );
        }
        ServerInfo::GoldSource(info) => {
            println!("{} ({})", info.name, info.game);
            println!(
                "map {} | players {}/{} | vac {}",
                info.map, info.players, info.max_players, info.vac
            );
        }
    }

    let players = query.players().await?;
    for player in &players {
        println!("{:>6}  {} ({:.0}s)", player.score, player.name, player.duration);
    }

    let rules = query.rules().await?;
    println!("{} rules set", rules.len());

    query.close();
    Ok(())
}
