use vercel_runtime::{Body, Response, StatusCode};

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Max-Age", "86400"),
];

/// Empty 204 answer to a CORS preflight.
pub fn preflight() -> anyhow::Result<Response<Body>> {
    let mut builder = Response::builder().status(StatusCode::NO_CONTENT);
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    Ok(builder.body(Body::Empty)?)
}
