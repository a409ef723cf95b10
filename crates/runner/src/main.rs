use std::{env, fs::File, process, sync::Arc};

use chrono::Utc;
use log::{error, info, warn};
use model::{route::PlannedRoute, user::User, WithId};
use runner::{
    InMemoryRouteStore, ReplaySource, RouteStore, RunOrchestrator, RunResult, RunnerConfig,
};
use serde_json::json;
use tokio::sync::mpsc;
use utility::id::Id;

const USAGE: &str = "usage: runner <route.json> <fixes.csv> [user-id] [user-name]";

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(2);
    }

    if let Err(why) = replay(&args).await {
        error!("run failed: {}", why);
        process::exit(1);
    }
}

async fn replay(args: &[String]) -> RunResult<()> {
    let config = RunnerConfig::from_env()?;

    let route: PlannedRoute = serde_json::from_reader(File::open(&args[0])?)?;
    let mut source = ReplaySource::from_csv(File::open(&args[1])?, Utc::now())?;
    let user_id = args.get(2).cloned().unwrap_or_else(|| "anonymous".to_owned());
    let user = WithId::new(
        Id::new(user_id.clone()),
        User {
            display_name: args.get(3).cloned().unwrap_or(user_id),
        },
    );

    let store = Arc::new(InMemoryRouteStore::new());
    let route_id = store.put_route(route).await?;
    info!("loaded route {} with {} fixes", route_id, source.remaining());

    let orchestrator = RunOrchestrator::new(store, config);
    if let Some(first) = source.peek() {
        if !orchestrator.can_start(&route_id, &first.position).await? {
            warn!("first fix {} is not at the start of route {}", first.position, route_id);
        }
    }

    let (_commands, receiver) = mpsc::channel(1);
    let end = orchestrator
        .run(&route_id, &user, &mut source, receiver)
        .await?;
    let leaderboard = orchestrator.leaderboard().await?;

    let output = json!({ "run": end, "leaderboard": leaderboard });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
