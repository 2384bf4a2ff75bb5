use crate::Error;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use domain::error::Error as DomainError;
use log::*;

/// `Json<T>` whose rejection is rendered as the standard `{ "error": ... }` body.
///
/// axum's own rejection answers in plain text; clients of this API always get
/// exactly one of the success or error shapes.
#[derive(Debug)]
pub(crate) struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                warn!("Rejecting malformed JSON body: {rejection}");
                Err(DomainError::validation(rejection.body_text()).into())
            }
        }
    }
}
