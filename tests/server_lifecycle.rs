//! Startup failures and a live-socket round trip with graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use redirect_router::config::{parse_config, ConfigError, ConfigFormat};
use redirect_router::http::{HttpServer, NotFoundPolicy};
use redirect_router::lifecycle::{startup, Shutdown, StartupError};
use redirect_router::routing::{ConditionError, FixedClock, RouteTable, RouteTableError};

mod common;

#[test]
fn test_two_token_condition_stops_startup() {
    let yaml = common::CHROME_CONFIG.replace("\"User-Agent has Chrome\"", "\"User-Agent has\"");
    let err = startup::prepare(common::config(&yaml)).unwrap_err();

    match err {
        StartupError::Routes(RouteTableError::Condition { route, source }) => {
            assert_eq!(route, "/chrome");
            assert_eq!(
                source,
                ConditionError::Malformed {
                    raw: "User-Agent has".into(),
                    tokens: 2
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_operator_stops_startup() {
    let yaml = common::CHROME_CONFIG.replace("User-Agent has Chrome", "User-Agent matches Chrome");
    let err = startup::prepare(common::config(&yaml)).unwrap_err();
    assert!(matches!(
        err,
        StartupError::Routes(RouteTableError::Condition {
            source: ConditionError::UnknownOperator { .. },
            ..
        })
    ));
}

#[test]
fn test_invalid_config_is_rejected_before_compilation() {
    let yaml = common::CHROME_CONFIG.replace("redirect_status: 302", "redirect_status: 200");
    let err = parse_config(&yaml, ConfigFormat::Yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[tokio::test]
async fn test_live_server_redirects_and_shuts_down() {
    let config = common::config(common::CHROME_CONFIG);
    let table = RouteTable::compile(&config).unwrap();
    let clock = Arc::new(FixedClock::parse("2018-10-28T15:00:00+01:00").unwrap());
    let server = HttpServer::with_clock(&config, table, NotFoundPolicy::from_config(&config), clock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{}/chrome", addr))
        .header("User-Agent", common::CHROME_UA)
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()["location"], "/panel");

    let res = client
        .get(format!("http://{}/chrome", addr))
        .header("User-Agent", common::FIREFOX_UA)
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["location"], "/bye");

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops after shutdown");
    assert!(result.unwrap().is_ok());
}
