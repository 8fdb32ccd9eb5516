//! Behavior-driven tests for rate resolution
//!
//! These tests verify WHAT the user sees for each combination of upstream
//! outcomes: which source is credited, which values are sentinels, and that
//! no outage ever turns into a hard failure.

use dolarvzla_tests::*;
use std::sync::Arc;

const DOLARVZLA: &str = "api.dolarvzla.com";
const DOLARAPI: &str = "ve.dolarapi.com";
const YADIO: &str = "api.yadio.io";

fn healthy_dolarapi(upstreams: FakeUpstreams) -> FakeUpstreams {
    upstreams
        .json("/dolares/oficial", r#"{"promedio": 36.71}"#)
        .json("/euros/oficial", r#"{"promedio": 39.95}"#)
}

// =============================================================================
// Resolution: primary source healthy
// =============================================================================

#[tokio::test]
async fn when_primary_source_answers_user_sees_its_rates_and_inverted_usdt() {
    // Given: DolarVzla is healthy and Yadio quotes USD per bolívar
    let upstreams = Arc::new(
        FakeUpstreams::new()
            .json(DOLARVZLA, r#"{"usd": 36.8, "eur": 40.1}"#)
            .json(YADIO, r#"{"rate": 0.018}"#),
    );
    let router = router(&upstreams, RatesConfig::default().with_api_key("key"));

    // When: A snapshot is resolved
    let snapshot = router.resolve().await;

    // Then: Official rates come from DolarVzla and USDT is expressed in Bs
    assert_eq!(snapshot.usd_official.price, 36.8);
    assert_eq!(snapshot.eur_official.price, 40.1);
    assert!((snapshot.usdt_market.price - 55.56).abs() < 0.01);
    assert_eq!(snapshot.last_update_label, "Fuente: DolarVzla");
    assert_eq!(
        snapshot.attributions,
        vec![Attribution::bcv(), Attribution::yadio()]
    );

    // And: Lower-priority sources are never contacted
    assert_eq!(upstreams.hits(DOLARAPI), 0);
    assert_eq!(upstreams.hits(GEMINI_PATH), 0);
}

// =============================================================================
// Resolution: fallbacks
// =============================================================================

#[tokio::test]
async fn when_primary_source_fails_system_falls_back_to_dolarapi() {
    // Given: DolarVzla is returning 502 while DolarApi is healthy
    let upstreams = Arc::new(
        healthy_dolarapi(FakeUpstreams::new().reply(DOLARVZLA, Reply::Status(502)))
            .json(YADIO, r#"{"rate": 54.2}"#),
    );
    let router = router(&upstreams, RatesConfig::default());

    // When: A snapshot is resolved
    let snapshot = router.resolve().await;

    // Then: DolarApi is credited and both of its legs were requested
    assert_eq!(snapshot.usd_official.price, 36.71);
    assert_eq!(snapshot.eur_official.price, 39.95);
    assert_eq!(snapshot.usdt_market.price, 54.2);
    assert_eq!(snapshot.last_update_label, "Fuente: DolarApi");
    assert_eq!(upstreams.hits(DOLARAPI), 2);
}

#[tokio::test]
async fn when_http_sources_fail_and_key_exists_model_lookup_supplies_rates() {
    // Given: Both HTTP sources are down and the model answers in prose with grounding
    let upstreams = Arc::new(
        FakeUpstreams::new()
            .reply(DOLARVZLA, Reply::Down)
            .json(DOLARAPI, "<html>maintenance</html>")
            .json(
                GEMINI_PATH,
                &gemini_body(
                    "Según el BCV, el dólar: 36,62 y el euro: 39,91 Bs.",
                    &[("Banco Central de Venezuela", "https://www.bcv.org.ve/")],
                ),
            )
            .json(YADIO, r#"{"rate": 55.1}"#),
    );
    let router = router(&upstreams, RatesConfig::default().with_api_key("key"));

    // When: A snapshot is resolved
    let snapshot = router.resolve().await;

    // Then: The model's rates are used and its citation replaces the fixed one
    assert_eq!(snapshot.usd_official.price, 36.62);
    assert_eq!(snapshot.eur_official.price, 39.91);
    assert_eq!(snapshot.last_update_label, "Fuente: BCV (Google Search)");
    assert_eq!(
        snapshot.attributions,
        vec![
            Attribution::new("Banco Central de Venezuela", "https://www.bcv.org.ve/"),
            Attribution::yadio(),
        ]
    );

    // And: The credential travels in a header, never in the URL
    let model_call = upstreams
        .requests()
        .into_iter()
        .find(|request| request.url.contains(GEMINI_PATH))
        .expect("model was called");
    assert!(!model_call.url.contains("key"));
    assert_eq!(
        model_call.headers.get("x-goog-api-key").map(String::as_str),
        Some("key")
    );
}

#[tokio::test]
async fn when_model_answer_has_no_rates_user_sees_sync_error() {
    // Given: Every HTTP source is down and the model answer is unusable
    let upstreams = Arc::new(
        FakeUpstreams::new()
            .reply(DOLARVZLA, Reply::Down)
            .reply(DOLARAPI, Reply::Down)
            .json(GEMINI_PATH, &gemini_body("Lo siento, no encontré la tasa.", &[]))
            .reply(YADIO, Reply::Down),
    );
    let router = router(&upstreams, RatesConfig::default().with_api_key("key"));

    // When: A snapshot is resolved
    let snapshot = router.resolve().await;

    // Then: Prices are sentinels and the label reports the failure
    assert!(!snapshot.has_official_rates());
    assert_eq!(snapshot.last_update_label, SYNC_ERROR_LABEL);
    assert_eq!(upstreams.hits(GEMINI_PATH), 1);
}

// =============================================================================
// Resolution: total outage
// =============================================================================

#[tokio::test]
async fn when_everything_fails_without_key_snapshot_is_all_sentinels() {
    // Given: No credential and every upstream unreachable
    let upstreams = Arc::new(FakeUpstreams::new());
    let router = router(&upstreams, RatesConfig::default());

    // When: A snapshot is resolved
    let snapshot = router.resolve().await;

    // Then: Every rate is the sentinel with its label intact
    for slot in RateSlot::ALL {
        let rate = snapshot.rate(slot);
        assert_eq!(rate.price, UNAVAILABLE);
        assert_eq!(rate.label, slot.label());
    }
    assert_eq!(snapshot.last_update_label, SYNC_ERROR_LABEL);
    assert_eq!(snapshot.attributions, vec![Attribution::bcv()]);

    // And: The model was never called
    assert_eq!(upstreams.hits(GEMINI_PATH), 0);
}

#[tokio::test]
async fn when_only_usdt_fails_official_rates_are_still_shown() {
    // Given: Official source healthy, Yadio rate is zero
    let upstreams = Arc::new(
        FakeUpstreams::new()
            .json(DOLARVZLA, r#"{"usd": 36.8, "eur": 40.1}"#)
            .json(YADIO, r#"{"rate": 0}"#),
    );
    let router = router(&upstreams, RatesConfig::default());

    // When: A snapshot is resolved
    let snapshot = router.resolve().await;

    // Then: Only USDT is a sentinel and Yadio is not credited
    assert!(snapshot.has_official_rates());
    assert!(!snapshot.usdt_market.is_available());
    assert_eq!(snapshot.attributions, vec![Attribution::bcv()]);
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn configured_mirrors_and_model_receive_every_request() {
    // Given: Mirror endpoints, a custom model, and only the model answering
    let endpoints = Endpoints {
        dolarvzla: String::from("https://mirror.test/dolarvzla"),
        dolarapi_base_url: String::from("https://mirror.test/dolarapi/v1"),
        yadio: String::from("https://mirror.test/yadio"),
        gemini_base_url: String::from("https://mirror.test/gemini"),
    };
    let upstreams = Arc::new(
        FakeUpstreams::new()
            .reply("mirror.test/dolarvzla", Reply::Down)
            .reply("mirror.test/dolarapi", Reply::Status(503))
            .json(
                "models/gemini-custom:generateContent",
                &gemini_body("Dólar BCV: 36,50 Bs y Euro BCV: 39,80 Bs", &[]),
            )
            .json("mirror.test/yadio", r#"{"rate": 55.0}"#),
    );
    let config = RatesConfig::default()
        .with_api_key("key")
        .with_endpoints(endpoints)
        .with_gemini_model("gemini-custom");
    let router = router(&upstreams, config);

    // When: A snapshot is resolved
    let snapshot = router.resolve().await;

    // Then: The labelled model answer is used
    assert_eq!(snapshot.usd_official.price, 36.5);
    assert_eq!(snapshot.eur_official.price, 39.8);
    assert_eq!(snapshot.usdt_market.price, 55.0);

    // And: Nothing was sent to the production hosts
    let requests = upstreams.requests();
    assert_eq!(requests.len(), 5);
    assert!(requests
        .iter()
        .all(|request| request.url.starts_with("https://mirror.test/")));
    assert_eq!(upstreams.hits("gemini-custom"), 1);
}

#[tokio::test]
async fn configured_timeout_is_applied_to_every_request() {
    // Given: A 1.5s timeout in the config
    let upstreams = Arc::new(
        FakeUpstreams::new()
            .json(DOLARVZLA, r#"{"usd": 36.8, "eur": 40.1}"#)
            .json(YADIO, r#"{"rate": 55.0}"#),
    );
    let router = router(&upstreams, RatesConfig::default().with_timeout_ms(1_500));

    // When: A snapshot is resolved
    router.resolve().await;

    // Then: Each outgoing request carries it
    let requests = upstreams.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.timeout_ms == 1_500));
}
