use crate::request::{Body, HttpRequest};
use anyhow::{Context, anyhow};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

pub async fn execute(req: &HttpRequest) -> anyhow::Result<HttpResponse> {
    // Callers race each call against their own deadline; this is only a backstop so a
    // dead connection never lingers after the caller has given up.
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(90))
        .build()
        .context("build http client")?;

    let mut headers = HeaderMap::new();
    for (k, v) in &req.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .with_context(|| format!("invalid header name: {k}"))?;
        let value =
            HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
        headers.insert(name, value);
    }

    let builder = match req.method.as_str() {
        "GET" => client.get(&req.url),
        "POST" => client.post(&req.url),
        other => return Err(anyhow!("unsupported method: {other}")),
    }
    .headers(headers);

    let builder = match &req.body {
        Body::Empty => builder,
        Body::Json(s) => builder.body(s.clone()),
    };

    log::debug!("sending {req:?}");
    let resp = builder.send().await.context("http request failed")?;
    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .context("failed reading response body")?
        .to_vec();
    log::debug!("received status={status} bytes={}", body.len());

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("x-goog-api-key", "k"))
            .and(body_string_contains("\"hello\""))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let req = HttpRequest::post_json(
            format!("{}/echo", server.uri()),
            &serde_json::json!({"msg": "hello"}),
        )
        .with_header("x-goog-api-key", "k");

        let resp = execute(&req).await.unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.body, b"ok");
    }

    #[tokio::test]
    async fn rejects_unsupported_method() {
        let req = HttpRequest {
            method: "PATCH".into(),
            url: "http://127.0.0.1:9/".into(),
            headers: vec![],
            body: Body::Empty,
        };
        let err = execute(&req).await.unwrap_err();
        assert!(err.to_string().contains("unsupported method"));
    }
}
