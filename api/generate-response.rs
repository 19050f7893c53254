use std::sync::Arc;

use review_reply_api::{http::route, logging, ReviewResponder};
use vercel_runtime::{run, Body, Error, Request, Response};

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();
    // Built once per cold start and shared by every invocation of this instance.
    let responder = Arc::new(ReviewResponder::from_env());
    run(move |req: Request| {
        let responder = Arc::clone(&responder);
        async move { handler(&responder, req).await }
    })
    .await
}

pub async fn handler(responder: &ReviewResponder, req: Request) -> Result<Response<Body>, Error> {
    Ok(route(responder, req.method().as_str(), req.body()).await)
}
