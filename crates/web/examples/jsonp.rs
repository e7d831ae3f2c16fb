use micro_reply::{Api, ApiOptions, BoxError, Event, RequestContext, ResponseContext, handler_fn};
use serde::Serialize;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Serialize, Debug)]
struct User {
    name: String,
    zip: String,
}

fn user(req: &RequestContext, res: &mut ResponseContext) -> Result<(), BoxError> {
    let user = User { name: req.query("name").unwrap_or("anonymous").to_owned(), zip: "12345".into() };
    res.header("Cache-Control", "no-cache")?;
    res.jsonp(serde_json::to_value(&user)?)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let options: ApiOptions = serde_json::from_str(r#"{ "version": "v1.0", "callback": "cb" }"#)
        .expect("options are valid json");
    let api = Api::builder().options(options).build();
    let handler = handler_fn(user);

    for raw_query in ["cb=render", "callback=legacy&name=zava", "", "cb=foo%20bar"] {
        let event = Event {
            http_method: "GET".into(),
            path: "/user".into(),
            raw_query_string: Some(raw_query.into()),
            ..Event::default()
        };

        match api.handle(event, &handler).await {
            Ok(envelope) => info!(query = raw_query, body = envelope.body(), "jsonp response"),
            Err(e) => error!(cause = %e, "finalize failed"),
        }
    }
}
