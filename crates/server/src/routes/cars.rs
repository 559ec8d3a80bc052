use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use models::CarInput;
use tracing::{info, warn};

use crate::assembler::{CarCollection, CarResource, CarResourceAssembler};
use crate::errors::JsonApiError;
use crate::routes::ServerState;

fn assembler(state: &ServerState, headers: &HeaderMap) -> CarResourceAssembler {
    CarResourceAssembler::for_request(state.public_url.as_deref(), headers)
}

/// List all cars, enriched with price and address.
#[utoipa::path(
    get, path = "/cars", tag = "cars",
    responses(
        (status = 200, description = "HAL collection of cars", body = crate::openapi::CarCollectionDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn list(State(state): State<ServerState>, headers: HeaderMap) -> Result<Json<CarCollection>, JsonApiError> {
    let cars = state.cars.list().await?;
    info!(count = cars.len(), "list cars");
    Ok(Json(assembler(&state, &headers).to_collection(cars)))
}

/// Fetch one car by id.
#[utoipa::path(
    get, path = "/cars/{id}", tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car resource", body = crate::openapi::CarDoc),
        (status = 404, description = "No car with this id", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CarResource>, JsonApiError> {
    let Path(id) = id?;
    let car = state.cars.find_by_id(id).await?;
    Ok(Json(assembler(&state, &headers).to_resource(car)))
}

/// Create a car. Responds 201 with the stored car and a `Location` header.
#[utoipa::path(
    post, path = "/cars", tag = "cars",
    request_body = crate::openapi::CarInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CarDoc),
        (status = 400, description = "Malformed or invalid car", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Result<Json<CarInput>, JsonRejection>,
) -> Result<Response, JsonApiError> {
    let Json(input) = body?;
    let car = input.validate_new()?;
    let saved = state.cars.save(car).await?;
    let resource = assembler(&state, &headers).to_resource(saved);
    info!(id = ?resource.car.id, "car_create_ok");
    let location = resource.links.self_link.href.clone();
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resource)).into_response())
}

/// Update a car. Only the fields present in the body change.
#[utoipa::path(
    put, path = "/cars/{id}", tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    request_body = crate::openapi::CarInputDoc,
    responses(
        (status = 200, description = "Merged car", body = crate::openapi::CarDoc),
        (status = 400, description = "Malformed or invalid body", body = crate::openapi::ErrorBody),
        (status = 404, description = "No car with this id", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CarInput>, JsonRejection>,
) -> Result<Json<CarResource>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = body?;
    input.validate_patch()?;
    let mut car = state.cars.find_stored(id).await?;
    car.merge(input);
    let saved = state.cars.save(car).await?;
    info!(id, "car_update_ok");
    Ok(Json(assembler(&state, &headers).to_resource(saved)))
}

/// Delete a car. Unknown ids also answer 204; store failures are 500.
#[utoipa::path(
    delete, path = "/cars/{id}", tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = id?;
    match state.cars.delete(id).await {
        Ok(()) => info!(id, "car_delete_ok"),
        Err(service::errors::ServiceError::NotFound(_)) => info!(id, "car_delete_missing"),
        Err(e) => {
            warn!(id, err = %e, "car_delete_failed");
            return Err(e.into());
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
