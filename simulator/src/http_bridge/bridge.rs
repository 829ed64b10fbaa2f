use crate::http_bridge::model::SummaryModel;
use crate::workflow::runner::Runner;
use pincore::model::{tally_by_animal_type, DetectionEvent, MapId, PinId, PlacementRequest};
use pincore::prelude::PlacementError;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

type JsonReply = WithStatus<Json>;

#[derive(Debug, Deserialize)]
struct MapQuery {
    user_map_id: Option<MapId>,
}

/// HTTP front for the placer, mirroring the map pin endpoints.
pub struct HttpBridge {
    runner: Runner,
}

impl HttpBridge {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    pub async fn serve(self, addr: SocketAddr) {
        warp::serve(routes(self.runner)).run(addr).await;
    }
}

fn with_runner(runner: Runner) -> impl Filter<Extract = (Runner,), Error = Infallible> + Clone {
    warp::any().map(move || runner.clone())
}

pub fn routes(runner: Runner) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let create_route = warp::path("animalpins")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_runner(runner.clone()))
        .and_then(create_pin);

    let detection_route = warp::path("detections")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_runner(runner.clone()))
        .and_then(ingest_detection);

    let list_route = warp::path("animalpins")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<MapQuery>())
        .and(with_runner(runner.clone()))
        .and_then(list_pins);

    let delete_route = warp::path!("animalpins" / PinId)
        .and(warp::delete())
        .and(with_runner(runner.clone()))
        .and_then(delete_pin);

    let summary_route = warp::path("summary")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_runner(runner))
        .and_then(summary);

    create_route
        .or(detection_route)
        .or(list_route)
        .or(delete_route)
        .or(summary_route)
}

async fn create_pin(request: PlacementRequest, runner: Runner) -> Result<JsonReply, Infallible> {
    Ok(place(&request, &runner).await)
}

async fn ingest_detection(event: DetectionEvent, runner: Runner) -> Result<JsonReply, Infallible> {
    Ok(place(&event.to_request(), &runner).await)
}

async fn place(request: &PlacementRequest, runner: &Runner) -> JsonReply {
    match runner.submit(request).await {
        Ok(placed) => warp::reply::with_status(
            warp::reply::json(&json!({
                "success": true,
                "pin": placed.pin,
                "placement": placed.placement,
            })),
            StatusCode::CREATED,
        ),
        Err(err) => error_reply(&err),
    }
}

fn error_reply(err: &PlacementError) -> JsonReply {
    let status = match err {
        PlacementError::CameraNotFound(_) => StatusCode::NOT_FOUND,
        PlacementError::DuplicateDetection(_) => StatusCode::CONFLICT,
        PlacementError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        PlacementError::InvalidCamera { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        PlacementError::RepositoryUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warp::reply::with_status(
        warp::reply::json(&json!({ "message": err.to_string() })),
        status,
    )
}

async fn list_pins(query: MapQuery, runner: Runner) -> Result<JsonReply, Infallible> {
    let Some(user_map_id) = query.user_map_id else {
        return Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "error": "Missing user_map_id" })),
            StatusCode::BAD_REQUEST,
        ));
    };
    let pins = runner.store().pins_by_map(user_map_id).await;
    Ok(warp::reply::with_status(
        warp::reply::json(&pins),
        StatusCode::OK,
    ))
}

async fn delete_pin(id: PinId, runner: Runner) -> Result<JsonReply, Infallible> {
    let status = if runner.store().delete_pin(id).await {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "success": status == StatusCode::OK })),
        status,
    ))
}

async fn summary(runner: Runner) -> Result<JsonReply, Infallible> {
    let cameras = runner.store().cameras().await.len();
    let by_type = tally_by_animal_type(&runner.store().pins().await);
    let model = SummaryModel::new(cameras, by_type, runner.metrics());
    Ok(warp::reply::with_status(
        warp::reply::json(&model),
        StatusCode::OK,
    ))
}
