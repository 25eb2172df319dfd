//! End-to-end tests: HTTP client → gateway → TLS capsule.

use std::time::Duration;

use gemini_gateway::config::GatewayConfig;

mod common;

async fn gateway() -> (std::net::SocketAddr, gemini_gateway::Shutdown) {
    let mut config = GatewayConfig::default();
    config.gemini.exchange_timeout_secs = 5;
    common::start_gateway(config).await
}

#[tokio::test]
async fn renders_gemtext_as_html() {
    let capsule =
        common::start_fixed_capsule(b"20 text/gemini; charset=utf-8\r\n# Title\n* one\n* two\n=> gemini://localhost/x Next\n").await;
    let (addr, shutdown) = gateway().await;

    let res = common::http_client()
        .get(format!("http://{}/localhost:{}/page.gmi", addr, capsule.port()))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    let body = res.text().await.unwrap();
    assert!(body.contains("<h1>Title</h1>"));
    assert!(body.contains("<ul><li>one</li>\n<li>two</li></ul>"));
    assert!(body.contains("<a href=\"gemini://localhost/x\">Next</a>"));
    assert!(body.contains("/__static__/gemini_link_rewrite.js"));

    assert_eq!(
        capsule.requests(),
        [format!("gemini://localhost:{}/page.gmi\r\n", capsule.port())]
    );
    shutdown.trigger();
}

#[tokio::test]
async fn other_media_types_pass_through() {
    let capsule = common::start_fixed_capsule(b"20 text/plain; charset=utf-8\r\nplain <b>text</b>").await;
    let (addr, shutdown) = gateway().await;

    let res = common::http_client()
        .get(format!("http://{}/localhost:{}/notes.txt", addr, capsule.port()))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/plain; charset=utf-8");
    assert_eq!(res.text().await.unwrap(), "plain <b>text</b>");
    shutdown.trigger();
}

#[tokio::test]
async fn charsets_are_honoured() {
    let capsule = common::start_capsule(|line| {
        if line.contains("/latin1") {
            b"20 text/gemini; charset=iso-8859-1\r\n# caf\xe9\n".to_vec()
        } else {
            b"20 text/plain\r\nna\xc3\xafve".to_vec()
        }
    })
    .await;
    let (addr, shutdown) = gateway().await;
    let client = common::http_client();

    let res = client
        .get(format!("http://{}/localhost:{}/latin1", addr, capsule.port()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert!(res.text().await.unwrap().contains("<h1>caf\u{e9}</h1>"));

    let res = client
        .get(format!("http://{}/localhost:{}/plain", addr, capsule.port()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["content-type"], "text/plain; charset=utf-8");
    assert_eq!(res.bytes().await.unwrap().as_ref(), "na\u{ef}ve".as_bytes());
    shutdown.trigger();
}

#[tokio::test]
async fn input_prompt_and_query_forwarding() {
    let capsule = common::start_capsule(|line| {
        if line.contains('?') {
            b"20 text/gemini\r\nthanks\n".to_vec()
        } else {
            b"10 Your name?\r\n".to_vec()
        }
    })
    .await;
    let (addr, shutdown) = gateway().await;
    let client = common::http_client();

    let prompt = client
        .get(format!("http://{}/localhost:{}/greet", addr, capsule.port()))
        .send()
        .await
        .unwrap();
    assert_eq!(prompt.status(), 200);
    let body = prompt.text().await.unwrap();
    assert!(body.contains("Your name?"));
    assert!(body.contains("name=\"q\""));

    let answer = client
        .get(format!("http://{}/localhost:{}/greet?q=hello%20world%21", addr, capsule.port()))
        .send()
        .await
        .unwrap();
    assert!(answer.text().await.unwrap().contains("<p>thanks</p>"));

    assert_eq!(
        capsule.requests()[1],
        format!("gemini://localhost:{}/greet?hello%20world!\r\n", capsule.port())
    );
    shutdown.trigger();
}

#[tokio::test]
async fn redirect_is_shown_as_gateway_link() {
    let capsule = common::start_fixed_capsule(b"31 /moved/here\r\n").await;
    let (addr, shutdown) = gateway().await;

    let res = common::http_client()
        .get(format!("http://{}/localhost:{}/old", addr, capsule.port()))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains(&format!("href=\"/localhost:{}/moved/here\"", capsule.port())));
    shutdown.trigger();
}

#[tokio::test]
async fn capsule_failure_page() {
    let capsule = common::start_fixed_capsule(b"51 No such page\r\n").await;
    let (addr, shutdown) = gateway().await;

    let res = common::http_client()
        .get(format!("http://{}/localhost:{}/missing", addr, capsule.port()))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("Permanent failure (51)"));
    assert!(body.contains("No such page"));
    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_capsule_is_bad_gateway() {
    let port = common::closed_port().await;
    let (addr, shutdown) = gateway().await;

    let res = common::http_client()
        .get(format!("http://{}/localhost:{}/", addr, port))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body = res.text().await.unwrap();
    assert!(body.contains("transport_error"));
    assert!(!body.contains("refused"), "error details must stay in the log");
    shutdown.trigger();
}

#[tokio::test]
async fn malformed_header_is_bad_gateway() {
    let capsule = common::start_fixed_capsule(b"20text/gemini\r\n").await;
    let (addr, shutdown) = gateway().await;

    let res = common::http_client()
        .get(format!("http://{}/localhost:{}/", addr, capsule.port()))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert!(res.text().await.unwrap().contains("header_malformed"));
    shutdown.trigger();
}

#[tokio::test]
async fn stalled_capsule_is_gateway_timeout() {
    let stalled = common::start_stalled_endpoint().await;
    let mut config = GatewayConfig::default();
    config.gemini.exchange_timeout_secs = 1;
    let (addr, shutdown) = common::start_gateway(config).await;

    let res = common::http_client()
        .get(format!("http://{}/localhost:{}/", addr, stalled.port()))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 504);
    shutdown.trigger();
}

#[tokio::test]
async fn address_handling() {
    let (addr, shutdown) = gateway().await;
    let client = common::http_client();

    let res = client
        .get(format!("http://{}/example.org?q=x", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()["location"], "/example.org/?q=x");

    let res = client
        .get(format!("http://{}/not_a_host/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    shutdown.trigger();
}
