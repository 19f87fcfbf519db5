use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contentfeed::config::Config;
use contentfeed::origin::{Connector, DiClient, OriginClient, RecoClient, TcpConnector};
use contentfeed::state::AppState;
use contentfeed_core::model::{BannerList, TabsList};
use contentfeed_core::registry::ResourceKind;
use contentfeed_core::resource::RecRecord;
use contentfeed_core::{Fetched, RequestContext};

/// ContentFeed - Aggregate recommendations, details and user actions
#[derive(Parser, Debug)]
#[command(name = "contentfeed")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    caller: Caller,

    /// Use an in-process store instead of Redis
    #[arg(long, global = true)]
    memory_store: bool,

    /// Serve from the cache only, never calling the origin services
    #[arg(long, global = true)]
    failover: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Caller identity forwarded to the origin services.
#[derive(Args, Debug)]
struct Caller {
    #[arg(long, global = true, default_value = "")]
    user: String,

    #[arg(long, global = true, default_value = "IN")]
    country: String,

    #[arg(long, global = true, default_value = "en")]
    lang: String,

    /// Comma separated preferred content languages
    #[arg(long, global = true, value_delimiter = ',')]
    prefer_langs: Vec<String>,

    #[arg(long, global = true, default_value = "1070")]
    app_version: u32,

    #[arg(long, global = true, default_value = "")]
    app_code: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build resources for a list of `api_type:id` items
    Group {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Build the detail page resource of one item
    Profile { api_type: String, id: String },
    /// List the home feed tab names
    TabNames,
    /// List the banners of a tab
    Banner { tab_id: String },
    /// Check both origin services and report whether failover should be engaged
    Failover,
}

impl Caller {
    fn context(&self) -> RequestContext {
        RequestContext {
            user_id: self.user.clone(),
            country: self.country.clone(),
            lang: self.lang.clone(),
            prefer_langs: self.prefer_langs.clone(),
            app_version: self.app_version,
            app_code: self.app_code.clone(),
            log_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

fn parse_item(item: &str) -> Result<RecRecord> {
    let Some((api_type, id)) = item.split_once(':') else {
        bail!("Expected `api_type:id`, got `{item}`");
    };
    let kind = ResourceKind::from_api_type(api_type)
        .with_context(|| format!("Unknown api type `{api_type}`"))?;
    Ok(RecRecord::new(id, kind.code()))
}

fn status<T>(fetched: &Fetched<T>) -> &'static str {
    match fetched {
        Fetched::Ok(_) => "ok",
        Fetched::NoCache(_) => "no_cache",
        Fetched::Unavailable => "unavailable",
    }
}

fn tab_names_json(fetched: Fetched<TabsList>) -> Value {
    let status = status(&fetched);
    let names: Vec<&str> = fetched
        .value()
        .map(|list| {
            list.items
                .iter()
                .flat_map(|tabs| tabs.tabs.iter().map(|tab| tab.name.as_str()))
                .collect()
        })
        .unwrap_or_default();
    json!({ "status": status, "tabs": names })
}

fn banners_json(fetched: Fetched<BannerList>) -> Value {
    let status = status(&fetched);
    let banners: Vec<Value> = fetched
        .value()
        .map(|list| {
            list.items
                .iter()
                .map(|banner| {
                    json!({
                        "id": banner.id,
                        "title": banner.title,
                        "image": banner.image,
                        "resource_id": banner.resource_id,
                        "resource_type": banner.resource_type,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    json!({ "status": status, "banners": banners })
}

async fn reachable<K: Connector>(connector: K) -> bool {
    match connector.connect().await {
        Ok(mut client) => {
            client.close().await;
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "Origin unreachable");
            false
        }
    }
}

async fn check_origins(config: &Config) -> Value {
    let (reco, di) = tokio::join!(
        reachable(TcpConnector::<RecoClient>::new(
            config.reco_addr.clone(),
            config.connect_timeout()
        )),
        reachable(TcpConnector::<DiClient>::new(
            config.di_addr.clone(),
            config.connect_timeout()
        ))
    );
    json!({ "reco": reco, "di": di, "engage": !(reco && di) })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contentfeed=debug".into()),
        )
        .with(cli.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    let mut config = Config::from_env()?;
    config.failover_mode |= cli.failover;

    let state = if cli.memory_store {
        AppState::in_memory(config)?
    } else {
        AppState::init(config).await?
    };

    let ctx = cli.caller.context();
    let output = match &cli.command {
        Command::Group { items } => {
            let records = items
                .iter()
                .map(|item| parse_item(item))
                .collect::<Result<Vec<_>>>()?;
            serde_json::to_value(state.builder.group_build(&ctx, &records).await)?
        }
        Command::Profile { api_type, id } => {
            serde_json::to_value(state.builder.profile_build(&ctx, api_type, id).await)?
        }
        Command::TabNames => tab_names_json(state.content.tab_names(&ctx).await),
        Command::Banner { tab_id } => banners_json(state.content.banner(&ctx, tab_id).await),
        Command::Failover => check_origins(&state.config).await,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    state.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let record = parse_item("movie:m1").unwrap();
        assert_eq!(record.id, "m1");
        assert_eq!(record.kind_code, ResourceKind::MovieFilm.code());

        assert!(parse_item("m1").is_err());
        assert!(parse_item("nope:m1").is_err());
    }

    #[test]
    fn test_cli_parses_global_caller_options() {
        let cli = Cli::try_parse_from([
            "contentfeed",
            "--memory-store",
            "banner",
            "home",
            "--lang",
            "hi",
            "--prefer-langs",
            "hi,ta",
        ])
        .unwrap();
        assert!(cli.memory_store);
        assert_eq!(cli.caller.lang, "hi");
        assert_eq!(cli.caller.prefer_langs, vec!["hi", "ta"]);
        assert!(matches!(cli.command, Command::Banner { ref tab_id } if tab_id == "home"));
    }

    #[tokio::test]
    async fn test_origin_check_reports_reachability() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = Config {
            reco_addr: listener.local_addr().unwrap().to_string(),
            di_addr: "127.0.0.1:1".to_string(),
            ..Config::default()
        };

        let report = check_origins(&config).await;

        assert_eq!(report, json!({ "reco": true, "di": false, "engage": true }));
    }
}
