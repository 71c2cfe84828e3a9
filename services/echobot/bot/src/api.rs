use std::convert::Infallible;
use std::sync::Arc;

use rocket::http::Status;
use rocket::serde::json::{json, Json, Value};
use rocket::{Route, State};
use serde::{Deserialize, Serialize};

use telemetry::Measure;

use crate::reply;
use crate::router::CommandRouter;

lazy_static! {
    static ref MESSAGE_MEASURE: Measure = Measure::new("controller", "message");
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
struct Message {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
struct Reply {
    reply: String,
}

#[get("/status")]
fn status() -> Value {
    json!({ "status": "ok" })
}

#[get("/metrics")]
fn metrics() -> Result<String, Status> {
    telemetry::encode().map_err(|_| Status::InternalServerError)
}

#[get("/api/v1/welcome")]
fn welcome() -> Json<Reply> {
    Json(Reply {
        reply: reply::welcome(),
    })
}

#[post("/api/v1/messages", format = "json", data = "<request>")]
async fn message(
    request: Json<Message>,
    router: &State<Arc<CommandRouter>>,
) -> Json<Reply> {
    MESSAGE_MEASURE
        .stats(async move {
            let reply = router.dispatch(&request.text).await;
            Ok::<_, Infallible>(Json(Reply { reply }))
        })
        .await
        .unwrap_or_else(|never| match never {})
}

pub fn routes() -> Vec<Route> {
    routes![status, metrics, welcome, message]
}
