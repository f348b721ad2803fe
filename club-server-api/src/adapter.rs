//! Runs a single request described as plain data through the router, for
//! hosts that hand over requests as serialized events instead of sockets.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    response::Response,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl OutboundResponse {
    fn bad_request(msg: impl Into<String>) -> Self {
        let body = serde_json::json!({ "error": msg.into() }).to_string();
        Self {
            status: StatusCode::BAD_REQUEST.as_u16(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        }
    }
}

fn build_request(inbound: InboundRequest) -> Result<Request<Body>, String> {
    let method_name = if inbound.method.is_empty() {
        "GET"
    } else {
        inbound.method.as_str()
    };
    let method = Method::from_bytes(method_name.as_bytes())
        .map_err(|_| format!("Invalid method: {}", inbound.method))?;

    let path = if inbound.path.starts_with('/') {
        inbound.path
    } else {
        format!("/{}", inbound.path)
    };
    let uri = match inbound.query.as_deref() {
        Some(query) if !query.is_empty() => {
            let separator = if path.contains('?') { '&' } else { '?' };
            format!("{}{}{}", path, separator, query)
        }
        _ => path,
    };

    let mut builder = Request::builder().method(method).uri(&uri);
    for (name, value) in &inbound.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| format!("Invalid header name: {}", name))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| format!("Invalid value for header {}", name))?;
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from(inbound.body))
        .map_err(|e| format!("Invalid request for {}: {}", uri, e))
}

async fn collect_response(response: Response) -> OutboundResponse {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = match to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("Failed to read response body: {}", e);
            String::new()
        }
    };
    OutboundResponse {
        status,
        headers,
        body,
    }
}

/// Invokes the router exactly once with the described request.
pub async fn dispatch(router: Router, inbound: InboundRequest) -> OutboundResponse {
    debug!("Dispatching {} {}", inbound.method, inbound.path);
    let request = match build_request(inbound) {
        Ok(request) => request,
        Err(msg) => {
            warn!("Rejecting inbound request: {}", msg);
            return OutboundResponse::bad_request(msg);
        }
    };
    match router.oneshot(request).await {
        Ok(response) => collect_response(response).await,
        Err(infallible) => match infallible {},
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Query, Request},
        routing::any,
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::testing::{TestClient, test_router};

    fn header<'a>(response: &'a OutboundResponse, name: &str) -> Option<&'a str> {
        response
            .headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    async fn echo(
        Query(query): Query<Vec<(String, String)>>,
        request: Request,
    ) -> Json<Value> {
        let method = request.method().to_string();
        let custom = request
            .headers()
            .get("x-custom")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(request.into_body(), usize::MAX).await.unwrap();
        Json(json!({
            "method": method,
            "query": query,
            "custom": custom,
            "body": String::from_utf8_lossy(&body),
        }))
    }

    #[tokio::test]
    async fn test_preserves_method_query_headers_and_body() {
        let router = Router::new().route("/echo", any(echo));
        for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
            let response = dispatch(
                router.clone(),
                InboundRequest {
                    method: method.to_string(),
                    path: "/echo".to_string(),
                    query: Some("a=1&b=two".to_string()),
                    headers: vec![("x-custom".to_string(), "yes".to_string())],
                    body: "payload".to_string(),
                },
            )
            .await;
            assert_eq!(response.status, 200);
            let echoed: Value = serde_json::from_str(&response.body).unwrap();
            assert_eq!(echoed["method"], method);
            assert_eq!(echoed["query"], json!([["a", "1"], ["b", "two"]]));
            assert_eq!(echoed["custom"], "yes");
            assert_eq!(echoed["body"], "payload");
        }
    }

    #[tokio::test]
    async fn test_query_in_path_is_merged() {
        let router = Router::new().route("/echo", any(echo));
        let response = dispatch(
            router,
            InboundRequest {
                method: "GET".to_string(),
                path: "/echo?a=1".to_string(),
                query: Some("b=two".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(response.status, 200);
        let echoed: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(echoed["query"], json!([["a", "1"], ["b", "two"]]));
    }

    #[tokio::test]
    async fn test_invalid_request_is_bad_request() {
        let router = Router::new().route("/echo", any(echo));

        let response = dispatch(
            router.clone(),
            InboundRequest {
                method: "NOT A METHOD".to_string(),
                path: "/echo".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(response.status, 400);

        let response = dispatch(
            router,
            InboundRequest {
                method: "GET".to_string(),
                path: "/echo".to_string(),
                headers: vec![("bad header".to_string(), "x".to_string())],
                ..Default::default()
            },
        )
        .await;
        assert_eq!(response.status, 400);
        assert!(response.body.contains("Invalid header name"));
    }

    #[tokio::test]
    async fn test_session_flow_through_adapter() {
        let client = TestClient::new().await;
        client.signup("coach", "coach@club.org", "hunter2").await;
        let router = test_router(&client);

        let login = serde_json::from_value::<InboundRequest>(json!({
            "method": "POST",
            "path": "/login",
            "headers": [["content-type", "application/x-www-form-urlencoded"]],
            "body": "username=coach&password=hunter2",
        }))
        .unwrap();
        let response = dispatch(router.clone(), login).await;
        assert_eq!(response.status, 302);
        assert_eq!(header(&response, "location"), Some("/dashboard"));
        let cookie = header(&response, "set-cookie")
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let response = dispatch(
            router,
            InboundRequest {
                method: "GET".to_string(),
                path: "/api/players".to_string(),
                headers: vec![("cookie".to_string(), cookie)],
                ..Default::default()
            },
        )
        .await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "[]");
    }
}
