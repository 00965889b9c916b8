//! Integration tests for the Instagram web API client.
//!
//! Uses `wiremock` to mock the instagram.com origin: the login handshake
//! (csrftoken cookie, `enc_password` form, `Set-Cookie` session), the
//! `web_profile_info` timeline endpoint, and the image CDN. Covers the
//! happy path, the empty account, expired sessions, and rejected logins.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use promowatch_core::{AppConfig, Platform};
use promowatch_scraper::platforms::instagram::{fetch_latest_with, InstagramClient};
use promowatch_scraper::platforms::ScrapeContext;
use promowatch_scraper::prompt::Credentials;
use promowatch_scraper::session::InstagramSession;
use promowatch_scraper::ScrapeError;

fn test_config(instagram_handle: &str) -> AppConfig {
    AppConfig {
        twitter_handle: "csgocases".to_string(),
        instagram_handle: instagram_handle.to_string(),
        facebook_handle: "csgocases".to_string(),
        webhook_url: "https://discord.example/webhook".to_string(),
        webdriver_url: "http://localhost:9515".to_string(),
        tesseract_bin: "tesseract".to_string(),
        tesseract_lang: "eng".to_string(),
        mention_role: None,
        request_timeout_secs: 5,
        element_wait_secs: 1,
        user_agent: "promowatch-test/0.1".to_string(),
    }
}

fn test_session() -> InstagramSession {
    InstagramSession {
        username: "kate".to_string(),
        csrf_token: "test-csrf".to_string(),
        session_id: "test-session".to_string(),
    }
}

/// `web_profile_info` body with a single timeline entry.
fn profile_json(shortcode: &str, display_url: &str, caption: &str, owner: &str) -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "edge_owner_to_timeline_media": {
                    "edges": [{
                        "node": {
                            "shortcode": shortcode,
                            "display_url": display_url,
                            "edge_media_to_caption": {
                                "edges": [{ "node": { "text": caption } }]
                            },
                            "owner": { "username": owner }
                        }
                    }]
                }
            }
        }
    })
}

/// Encodes a valid PNG in memory for the mocked CDN to serve.
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 40, 40, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("failed to encode test png");
    buf.into_inner()
}

// ---------------------------------------------------------------------------
// Test 1 – login happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_collects_cookies_and_returns_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "csrftoken=landing-csrf; Path=/; Secure"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/ajax/"))
        .and(header("X-CSRFToken", "landing-csrf"))
        .and(header("X-IG-App-ID", "936619743392459"))
        .and(body_string_contains("username=kate"))
        .and(body_string_contains("enc_password=%23PWD_INSTAGRAM_BROWSER%3A0%3A"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "sessionid=fresh-session; Path=/; HttpOnly")
                .append_header("Set-Cookie", "csrftoken=rotated-csrf; Path=/; Secure")
                .set_body_json(&json!({ "authenticated": true, "user": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = InstagramClient::new(reqwest::Client::new(), &server.uri());
    let credentials = Credentials {
        username: "kate".to_string(),
        password: "hunter2".to_string(),
    };
    let result = client.login(&credentials).await;

    assert!(result.is_ok(), "expected Ok, got: {:?}", result.err());
    let session = result.unwrap();
    assert_eq!(session.username, "kate");
    assert_eq!(session.session_id, "fresh-session");
    assert_eq!(
        session.csrf_token, "rotated-csrf",
        "login should keep the rotated csrftoken"
    );
}

// ---------------------------------------------------------------------------
// Test 2 – rejected credentials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_rejected_credentials_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "csrftoken=landing-csrf"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/ajax/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&json!({ "authenticated": false })),
        )
        .mount(&server)
        .await;

    let client = InstagramClient::new(reqwest::Client::new(), &server.uri());
    let credentials = Credentials {
        username: "kate".to_string(),
        password: "wrong".to_string(),
    };
    let result = client.login(&credentials).await;

    assert!(result.is_err(), "expected Err for rejected credentials");
    match result.unwrap_err() {
        ScrapeError::LoginFailed { platform, reason } => {
            assert_eq!(platform, Platform::Instagram);
            assert_eq!(reason, "credentials rejected");
        }
        other => panic!("expected ScrapeError::LoginFailed, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 3 – landing page without a csrftoken cookie
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_without_csrf_cookie_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = InstagramClient::new(reqwest::Client::new(), &server.uri());
    let credentials = Credentials {
        username: "kate".to_string(),
        password: "hunter2".to_string(),
    };
    let result = client.login(&credentials).await;

    assert!(result.is_err(), "expected Err without a csrftoken cookie");
    match result.unwrap_err() {
        ScrapeError::LoginFailed { reason, .. } => {
            assert_eq!(reason, "no csrftoken cookie on landing page");
        }
        other => panic!("expected ScrapeError::LoginFailed, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 4 – login endpoint rejects with a non-2xx status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_non_success_status_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "csrftoken=landing-csrf"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/ajax/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = InstagramClient::new(reqwest::Client::new(), &server.uri());
    let credentials = Credentials {
        username: "kate".to_string(),
        password: "hunter2".to_string(),
    };
    let result = client.login(&credentials).await;

    assert!(result.is_err(), "expected Err for 403 login response");
    match result.unwrap_err() {
        ScrapeError::LoginFailed { reason, .. } => {
            assert!(
                reason.contains("403"),
                "reason should carry the status, got: {reason}"
            );
        }
        other => panic!("expected ScrapeError::LoginFailed, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 5 – latest post fetched and assembled into a Post
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_latest_builds_post_from_timeline_and_cdn() {
    let server = MockServer::start().await;
    let display_url = format!("{}/media/p.png", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "csgocases"))
        .and(header("X-IG-App-ID", "936619743392459"))
        .and(header("X-CSRFToken", "test-csrf"))
        .and(header("Cookie", "csrftoken=test-csrf; sessionid=test-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&profile_json(
            "DAbc123",
            &display_url,
            "promocode drop, check the image",
            "csgocases",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/media/p.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(png_bytes(800, 500), "image/png"),
        )
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let config = test_config("csgocases");
    let data_dir = tempfile::tempdir().expect("failed to create temp dir");
    let ctx = ScrapeContext {
        http: &http,
        config: &config,
        data_dir: data_dir.path(),
        force_login: false,
    };
    let client = InstagramClient::new(http.clone(), &server.uri());

    let result = fetch_latest_with(&client, &test_session(), &ctx).await;

    assert!(result.is_ok(), "expected Ok, got: {:?}", result.err());
    let post = result.unwrap().expect("expected a post");
    assert_eq!(post.platform, Platform::Instagram);
    assert_eq!(post.author, "csgocases");
    assert_eq!(post.text, "promocode drop, check the image");
    assert_eq!(post.url, "https://www.instagram.com/p/DAbc123/");
    assert_eq!(post.image_url.as_deref(), Some(display_url.as_str()));
    let image = post.image.expect("expected the downloaded image");
    assert_eq!(image.dimensions(), (800, 500));
}

// ---------------------------------------------------------------------------
// Test 6 – account with no posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_latest_returns_none_for_empty_timeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": { "user": { "edge_owner_to_timeline_media": { "edges": [] } } }
        })))
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let config = test_config("csgocases");
    let data_dir = tempfile::tempdir().expect("failed to create temp dir");
    let ctx = ScrapeContext {
        http: &http,
        config: &config,
        data_dir: data_dir.path(),
        force_login: false,
    };
    let client = InstagramClient::new(http.clone(), &server.uri());

    let result = fetch_latest_with(&client, &test_session(), &ctx).await;

    assert!(result.is_ok(), "expected Ok, got: {:?}", result.err());
    assert!(result.unwrap().is_none(), "empty timeline should yield None");
}

// ---------------------------------------------------------------------------
// Test 7 – expired session comes back as user: null with HTTP 200
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_latest_maps_null_user_to_session_expired() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&json!({ "data": { "user": null } })),
        )
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let config = test_config("csgocases");
    let data_dir = tempfile::tempdir().expect("failed to create temp dir");
    let ctx = ScrapeContext {
        http: &http,
        config: &config,
        data_dir: data_dir.path(),
        force_login: false,
    };
    let client = InstagramClient::new(http.clone(), &server.uri());

    let result = fetch_latest_with(&client, &test_session(), &ctx).await;

    assert!(result.is_err(), "expected Err for a logged-out session");
    match result.unwrap_err() {
        ScrapeError::SessionExpired { platform } => {
            assert_eq!(platform, Platform::Instagram);
        }
        other => panic!("expected ScrapeError::SessionExpired, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 8 – non-2xx timeline response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_latest_propagates_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let config = test_config("csgocases");
    let data_dir = tempfile::tempdir().expect("failed to create temp dir");
    let ctx = ScrapeContext {
        http: &http,
        config: &config,
        data_dir: data_dir.path(),
        force_login: false,
    };
    let client = InstagramClient::new(http.clone(), &server.uri());

    let result = fetch_latest_with(&client, &test_session(), &ctx).await;

    assert!(result.is_err(), "expected Err for 401 response");
    match result.unwrap_err() {
        ScrapeError::UnexpectedStatus { status, .. } => {
            assert_eq!(status, 401);
        }
        other => panic!("expected ScrapeError::UnexpectedStatus, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 9 – image download failure drops the candidate
// ---------------------------------------------------------------------------

/// The image carries the code on this platform, so a post whose image
/// cannot be fetched is reported as no post rather than a half-built one.
#[tokio::test]
async fn fetch_latest_returns_none_when_image_download_fails() {
    let server = MockServer::start().await;
    let display_url = format!("{}/media/gone.png", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&profile_json(
            "DAbc123",
            &display_url,
            "promocode drop",
            "csgocases",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/media/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let config = test_config("csgocases");
    let data_dir = tempfile::tempdir().expect("failed to create temp dir");
    let ctx = ScrapeContext {
        http: &http,
        config: &config,
        data_dir: data_dir.path(),
        force_login: false,
    };
    let client = InstagramClient::new(http.clone(), &server.uri());

    let result = fetch_latest_with(&client, &test_session(), &ctx).await;

    assert!(result.is_ok(), "expected Ok, got: {:?}", result.err());
    assert!(
        result.unwrap().is_none(),
        "post without its image should yield None"
    );
}
