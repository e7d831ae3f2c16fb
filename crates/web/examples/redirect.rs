use micro_reply::resolver::{SignOperation, SignedUrlParams, StorageUrlResolver, TimeoutResolver, UrlSigner};
use micro_reply::{Api, BoxError, Event, RequestContext, ResponseContext, handler_fn};
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Signs urls locally, a real deployment would call its storage provider here.
#[derive(Debug)]
struct LocalSigner;

#[async_trait::async_trait]
impl UrlSigner for LocalSigner {
    async fn signed_url(&self, _operation: SignOperation, params: SignedUrlParams) -> Result<String, BoxError> {
        Ok(format!(
            "https://{}.storage.local/{}?Expires={}&Signature=local",
            params.bucket, params.key, params.expires
        ))
    }
}

fn download(req: &RequestContext, res: &mut ResponseContext) -> Result<(), BoxError> {
    match req.query("file") {
        Some(file) => res.redirect(format!("s3://my-test-bucket/{file}"))?,
        None => res.status(400)?.send("missing file")?,
    };
    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let resolver = StorageUrlResolver::new(LocalSigner).expires(Duration::from_secs(300));
    let api = Api::builder()
        .version("v1.0")
        .resolver(TimeoutResolver::new(resolver, Duration::from_secs(2)))
        .build();

    let event: Event = match serde_json::from_str(
        r#"{ "httpMethod": "GET", "path": "/download", "queryStringParameters": { "file": "test/test.txt" } }"#,
    ) {
        Ok(event) => event,
        Err(e) => {
            error!(cause = %e, "invalid event");
            return;
        }
    };

    let handler = handler_fn(download);
    api.run(event, &handler, |outcome| match outcome.and_then(|envelope| envelope.to_json().map_err(Into::into)) {
        Ok(json) => info!(envelope = %json, "redirect finalized"),
        Err(e) => error!(cause = %e, "finalize failed"),
    })
    .await;
}
