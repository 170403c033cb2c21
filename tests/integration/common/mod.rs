//! Shared wiremock helpers for the integration tests

#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `body` as robots.txt
pub async fn mount_robots_txt(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts `/robots.txt -> /hop/1 -> ... -> /hop/{redirects}`, the last serving `body`
///
/// With `redirects` of 9 the chain resolves on the 10th request.
pub async fn mount_redirect_chain(server: &MockServer, redirects: usize, body: &str) {
    for i in 0..redirects {
        let location = format!("{}/hop/{}", server.uri(), i + 1);
        Mock::given(method("GET"))
            .and(path(hop_path(i)))
            .respond_with(ResponseTemplate::new(302).insert_header("location", location.as_str()))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(hop_path(redirects)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn hop_path(index: usize) -> String {
    if index == 0 {
        "/robots.txt".to_string()
    } else {
        format!("/hop/{}", index)
    }
}
