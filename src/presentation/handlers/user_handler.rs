use std::sync::Arc;

use axum::{
    Form, Json, Router,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{models::user::User, repositories::user_repository::UserRepository},
    presentation::error::ApiError,
    usecase::{
        get_user_usecase::GetUserUsecase, list_users_usecase::ListUsersUsecase,
        register_user_usecase::RegisterUserUsecase,
    },
};

// Request

/// registration submission, accepted as json or as an urlencoded form
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(request: &Request) -> BodyKind {
    let Some(mime) = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
    else {
        return BodyKind::Other;
    };

    if mime.type_() == mime::APPLICATION
        && (mime.subtype() == mime::JSON || mime.suffix().is_some_and(|suffix| suffix == mime::JSON))
    {
        BodyKind::Json
    } else if mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<S> FromRequest<S> for RegisterRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
                // an empty json body carries no fields, same as `{}`
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(RegisterRequest::default());
                }
                Json::<RegisterRequest>::from_bytes(&bytes)
                    .map(|Json(payload)| payload)
                    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
            }
            BodyKind::Form => Form::<RegisterRequest>::from_request(req, state)
                .await
                .map(|Form(payload)| payload)
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text())),
            // unparsed bodies carry no fields, so validation reports them as missing
            BodyKind::Other => Ok(RegisterRequest::default()),
        }
    }
}

// Response

/// json body carried by every non-data response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// json for register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: i64,
}

/* Router Function and Handler Function */

/// Routes for registration and read-back.
/// Suppose to be merged into the main router.
pub fn create_user_router<R: UserRepository + Send + Sync + 'static>(
    register_service: RegisterUserUsecase<R>,
    list_service: ListUsersUsecase<R>,
    get_service: GetUserUsecase<R>,
) -> Router {
    let state = AppState {
        register_service: Arc::new(register_service),
        list_service: Arc::new(list_service),
        get_service: Arc::new(get_service),
    };

    Router::new()
        .route("/post", post(register::<R>))
        .route("/users", get(list_users::<R>))
        .route("/users/{id}", get(get_user::<R>))
        .with_state(state)
}

pub struct AppState<R: UserRepository> {
    pub register_service: Arc<RegisterUserUsecase<R>>,
    pub list_service: Arc<ListUsersUsecase<R>>,
    pub get_service: Arc<GetUserUsecase<R>>,
}

// derive(Clone) would demand R: Clone
impl<R: UserRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            register_service: self.register_service.clone(),
            list_service: self.list_service.clone(),
            get_service: self.get_service.clone(),
        }
    }
}

// handler function

/// handler function for register
async fn register<R: UserRepository + Send + Sync>(
    State(state): State<AppState<R>>,
    payload: RegisterRequest,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .register_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    let response = RegisterResponse {
        message: "User registered successfully".to_string(),
        id: user.id().value(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// handler function for listing every stored user
async fn list_users<R: UserRepository + Send + Sync>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.list_service.list_users().await?))
}

/// handler function for lookup by id
async fn get_user<R: UserRepository + Send + Sync>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.get_service.get_user(&raw_id).await?))
}
