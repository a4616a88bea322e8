//! # API REST
//!
//! REST API implementation for Aarogya.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API key and bearer checks)
//!
//! Uses `api-shared` for wire types and `aarogya-core` for everything else.

#![warn(rust_2018_idioms)]

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use aarogya_core::{
    load_catalog, messaging::is_mobile_user_agent, AlertSeverity, Assistant, AuthProvider,
    CatalogError, ConditionQuery, CoreConfig, CoreError, CoreResult, FileProfileStore, Language,
    LocalAuthProvider, NewVaccineRecord, ProfileStore, Reply, Session, UserProfile, WhatsAppLinker,
};
use api_shared::{
    validate_api_key, AlertRes, AlertsQuery, AssessReq, AssessRes, AssessmentRes, CategoriesRes,
    ChatReq, ChatRes, ConditionRes, ConditionsQuery, ErrorRes, ExtractRes, GreetingRes,
    HealthRes, HealthService, IntentRes, LanguageQuery, ListAlertsRes, ListConditionsRes,
    ListVaccinationsRes, ListVaccinesRes, NewVaccinationReq, ProfileRes, ScoredConditionRes,
    SessionRes, SignInReq, SignOutRes, SignUpReq, TextReq, UpdateProfileReq, VaccinationRecordRes,
    VaccineRes, VaccinesQuery, WhatsAppQuery, WhatsAppRes,
};

/// Header carrying the API key when one is configured.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorRes {
            error: message.into(),
        }),
    )
}

/// Map a core error to a response. Server-side failures are logged and hidden from callers.
fn core_error(context: &str, e: CoreError) -> ApiError {
    let status = match &e {
        CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CoreError::EmailTaken(_) => StatusCode::CONFLICT,
        CoreError::InvalidCredentials | CoreError::InvalidSession => StatusCode::UNAUTHORIZED,
        CoreError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("{} error: {:?}", context, e);
        api_error(status, "Internal error")
    } else {
        tracing::warn!("{} rejected: {}", context, e);
        api_error(status, e.to_string())
    }
}

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant,
    pub auth: Arc<dyn AuthProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub whatsapp: WhatsAppLinker,
    pub default_language: Language,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// Wire up the default services for `cfg`: bundled or overridden catalog, in-memory
    /// accounts and file-backed profiles under the data directory.
    pub fn from_config(cfg: &CoreConfig, api_key: Option<String>) -> CoreResult<Self> {
        Ok(Self {
            assistant: Assistant::new(load_catalog(cfg)?),
            auth: Arc::new(LocalAuthProvider::new()),
            profiles: Arc::new(FileProfileStore::new(cfg.profiles_dir())),
            whatsapp: WhatsAppLinker::new(cfg.whatsapp_number()),
            default_language: cfg.default_language(),
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .map(Arc::from),
        })
    }

    fn language(&self, requested: Option<&str>) -> Language {
        requested
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(Language::resolve)
            .unwrap_or(self.default_language)
    }
}

/// The signed-in caller, taken from `Authorization: Bearer <token>`.
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "missing bearer token"))?;

        state
            .auth
            .session(token)
            .map(CurrentSession)
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "invalid or expired session"))
    }
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    match validate_api_key(state.api_key.as_deref(), provided) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!("rejected request to {}: {}", request.uri().path(), e);
            api_error(StatusCode::UNAUTHORIZED, e.to_string()).into_response()
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        greeting,
        chat,
        extract_symptoms,
        assess_symptoms,
        classify_intent,
        list_conditions,
        list_categories,
        list_vaccines,
        list_alerts,
        whatsapp_link,
        sign_up,
        sign_in,
        sign_out,
        get_profile,
        update_profile,
        list_vaccinations,
        add_vaccination,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        GreetingRes,
        ChatReq,
        ChatRes,
        TextReq,
        ExtractRes,
        IntentRes,
        AssessReq,
        AssessRes,
        AssessmentRes,
        ScoredConditionRes,
        ConditionRes,
        ListConditionsRes,
        CategoriesRes,
        VaccineRes,
        ListVaccinesRes,
        AlertRes,
        ListAlertsRes,
        WhatsAppRes,
        SignUpReq,
        SignInReq,
        SessionRes,
        SignOutRes,
        ProfileRes,
        UpdateProfileReq,
        VaccinationRecordRes,
        NewVaccinationReq,
        ListVaccinationsRes,
    ))
)]
pub struct ApiDoc;

/// Build the full application router.
///
/// `/health` and the Swagger UI are always open. Every other route requires the
/// `x-api-key` header when `state.api_key` is set.
pub fn router(state: AppState) -> Router {
    let guarded = Router::new()
        .route("/chat", post(chat))
        .route("/chat/greeting", get(greeting))
        .route("/symptoms/extract", post(extract_symptoms))
        .route("/symptoms/assess", post(assess_symptoms))
        .route("/intent", post(classify_intent))
        .route("/conditions", get(list_conditions))
        .route("/conditions/categories", get(list_categories))
        .route("/vaccines", get(list_vaccines))
        .route("/alerts", get(list_alerts))
        .route("/messaging/whatsapp", get(whatsapp_link))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
        .route("/profile", get(get_profile).put(update_profile))
        .route(
            "/profile/vaccinations",
            get(list_vaccinations).post(add_vaccination),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(guarded)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the router until the process exits.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    tracing::info!("++ Starting Aarogya REST on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/chat/greeting",
    params(LanguageQuery),
    responses(
        (status = 200, description = "Localized greeting", body = GreetingRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Opening message for a new conversation.
#[axum::debug_handler]
async fn greeting(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<GreetingRes>, ApiError> {
    let language = state.language(query.language.as_deref());
    let text = state
        .assistant
        .greet(language)
        .map_err(|e| core_error("Greeting", e))?;
    Ok(Json(GreetingRes {
        language: language.to_string(),
        speech_locale: language.speech_locale().to_string(),
        text,
    }))
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatReq,
    responses(
        (status = 200, description = "Assistant reply", body = ChatRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Answer one chat message.
///
/// Messages describing symptoms are assessed against the condition catalog; everything else
/// gets the template for its intent.
#[axum::debug_handler]
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatReq>,
) -> Result<Json<ChatRes>, ApiError> {
    let language = state.language(req.language.as_deref());
    let templates = state.assistant.catalog().templates();

    state
        .assistant
        .respond(&req.text, language)
        .and_then(|reply| ChatRes::render(reply, templates, language))
        .map(Json)
        .map_err(|e| core_error("Chat", e))
}

#[utoipa::path(
    post,
    path = "/symptoms/extract",
    request_body = TextReq,
    responses(
        (status = 200, description = "Recognised symptom categories", body = ExtractRes)
    )
)]
#[axum::debug_handler]
async fn extract_symptoms(
    State(state): State<AppState>,
    Json(req): Json<TextReq>,
) -> Json<ExtractRes> {
    Json(ExtractRes {
        symptoms: state
            .assistant
            .extract_symptoms(&req.text)
            .into_iter()
            .collect(),
    })
}

#[utoipa::path(
    post,
    path = "/symptoms/assess",
    request_body = AssessReq,
    responses(
        (status = 200, description = "Scored conditions and advice", body = AssessRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Assess an explicit list of symptom categories.
#[axum::debug_handler]
async fn assess_symptoms(
    State(state): State<AppState>,
    Json(req): Json<AssessReq>,
) -> Result<Json<AssessRes>, ApiError> {
    let language = state.language(req.language.as_deref());
    let symptoms: BTreeSet<String> = req
        .symptoms
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let assessment = state.assistant.assess_symptoms(&symptoms);
    let templates = state.assistant.catalog().templates();
    let rendered = AssessmentRes::render(&assessment, templates, language)
        .and_then(|res| {
            let text = state
                .assistant
                .compose_response(Reply::Assessment(&assessment), language)?;
            Ok(AssessRes {
                assessment: res,
                text,
            })
        })
        .map_err(|e| core_error("Assess symptoms", e))?;
    Ok(Json(rendered))
}

#[utoipa::path(
    post,
    path = "/intent",
    request_body = TextReq,
    responses(
        (status = 200, description = "Classified intent", body = IntentRes)
    )
)]
#[axum::debug_handler]
async fn classify_intent(
    State(state): State<AppState>,
    Json(req): Json<TextReq>,
) -> Json<IntentRes> {
    Json(IntentRes {
        intent: state.assistant.classify_intent(&req.text).to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/conditions",
    params(ConditionsQuery),
    responses(
        (status = 200, description = "Matching conditions", body = ListConditionsRes)
    )
)]
/// Search the disease library by name or symptom, optionally within one category.
#[axum::debug_handler]
async fn list_conditions(
    State(state): State<AppState>,
    Query(query): Query<ConditionsQuery>,
) -> Json<ListConditionsRes> {
    let language = state.language(query.language.as_deref());
    let search = ConditionQuery {
        text: query.q,
        category: query.category,
    };
    let conditions = state
        .assistant
        .catalog()
        .search_conditions(&search)
        .into_iter()
        .map(|c| c.localized(language).into())
        .collect();
    Json(ListConditionsRes { conditions })
}

#[utoipa::path(
    get,
    path = "/conditions/categories",
    responses(
        (status = 200, description = "Distinct condition categories", body = CategoriesRes)
    )
)]
#[axum::debug_handler]
async fn list_categories(State(state): State<AppState>) -> Json<CategoriesRes> {
    Json(CategoriesRes {
        categories: state
            .assistant
            .catalog()
            .condition_categories()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

#[utoipa::path(
    get,
    path = "/vaccines",
    params(VaccinesQuery),
    responses(
        (status = 200, description = "Vaccines for the age group", body = ListVaccinesRes)
    )
)]
#[axum::debug_handler]
async fn list_vaccines(
    State(state): State<AppState>,
    Query(query): Query<VaccinesQuery>,
) -> Json<ListVaccinesRes> {
    let language = state.language(query.language.as_deref());
    let vaccines = state
        .assistant
        .catalog()
        .vaccines_for_age_group(query.age_group.as_deref())
        .into_iter()
        .map(|v| v.localized(language).into())
        .collect();
    Json(ListVaccinesRes { vaccines })
}

#[utoipa::path(
    get,
    path = "/alerts",
    params(AlertsQuery),
    responses(
        (status = 200, description = "Alerts, newest first", body = ListAlertsRes),
        (status = 400, description = "Unknown severity", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<ListAlertsRes>, ApiError> {
    let language = state.language(query.language.as_deref());
    let severity = query
        .severity
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(str::parse::<AlertSeverity>)
        .transpose()
        .map_err(|e: CatalogError| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let alerts = state
        .assistant
        .catalog()
        .alerts(severity)
        .into_iter()
        .map(|a| a.localized(language).into())
        .collect();
    Ok(Json(ListAlertsRes { alerts }))
}

#[utoipa::path(
    get,
    path = "/messaging/whatsapp",
    params(WhatsAppQuery),
    responses(
        (status = 200, description = "Prefilled WhatsApp link", body = WhatsAppRes)
    )
)]
/// Link that opens a WhatsApp chat with the health helpline.
///
/// The button label follows the caller's `User-Agent` unless `mobile` is given.
#[axum::debug_handler]
async fn whatsapp_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WhatsAppQuery>,
) -> Json<WhatsAppRes> {
    let language = state.language(query.language.as_deref());
    let mobile = query.mobile.unwrap_or_else(|| {
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_mobile_user_agent)
    });
    Json(
        state
            .whatsapp
            .link(query.message.as_deref(), language, mobile)
            .into(),
    )
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignUpReq,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 409, description = "Email already registered", body = ErrorRes)
    )
)]
/// Create an account, sign it in and create its profile. The account is removed again
/// if the profile cannot be stored.
#[axum::debug_handler]
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpReq>,
) -> Result<(StatusCode, Json<SessionRes>), ApiError> {
    if req.full_name.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "full_name is required"));
    }

    let session = state
        .auth
        .sign_up(&req.email, &req.password, &req.full_name)
        .map_err(|e| core_error("Sign up", e))?;

    let profile = UserProfile::new(
        session.user.id,
        session.user.email.clone(),
        session.user.full_name.clone(),
    );
    if let Err(e) = state.profiles.upsert_profile(profile) {
        if let Err(rollback) = state.auth.delete_account(&session.user.id) {
            tracing::error!("Roll back sign up: {rollback}");
        }
        return Err(core_error("Create profile", e));
    }

    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SignInReq,
    responses(
        (status = 200, description = "Signed in", body = SessionRes),
        (status = 401, description = "Invalid credentials", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInReq>,
) -> Result<Json<SessionRes>, ApiError> {
    state
        .auth
        .sign_in(&req.email, &req.password)
        .map(|s| Json(s.into()))
        .map_err(|e| core_error("Sign in", e))
}

#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 200, description = "Signed out", body = SignOutRes),
        (status = 401, description = "Missing or invalid session", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn sign_out(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<SignOutRes>, ApiError> {
    state
        .auth
        .sign_out(&session.token)
        .map_err(|e| core_error("Sign out", e))?;
    Ok(Json(SignOutRes { success: true }))
}

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Caller's profile", body = ProfileRes),
        (status = 401, description = "Missing or invalid session", body = ErrorRes),
        (status = 404, description = "No profile yet", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ProfileRes>, ApiError> {
    match state.profiles.fetch_profile(&session.user.id) {
        Ok(Some(profile)) => Ok(Json(profile.into())),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "profile not found")),
        Err(e) => Err(core_error("Fetch profile", e)),
    }
}

#[utoipa::path(
    put,
    path = "/profile",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = ProfileRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 401, description = "Missing or invalid session", body = ErrorRes)
    )
)]
/// Update the caller's profile, creating it if it does not exist yet.
#[axum::debug_handler]
async fn update_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<UpdateProfileReq>,
) -> Result<Json<ProfileRes>, ApiError> {
    let user = &session.user;
    let mut profile = state
        .profiles
        .fetch_profile(&user.id)
        .map_err(|e| core_error("Fetch profile", e))?
        .unwrap_or_else(|| UserProfile::new(user.id, user.email.clone(), user.full_name.clone()));

    apply_profile_update(&mut profile, req).map_err(|e| core_error("Update profile", e))?;

    state
        .profiles
        .upsert_profile(profile)
        .map(|p| Json(p.into()))
        .map_err(|e| core_error("Update profile", e))
}

fn apply_profile_update(profile: &mut UserProfile, req: UpdateProfileReq) -> CoreResult<()> {
    if let Some(full_name) = req.full_name {
        profile.full_name = full_name;
    }
    if let Some(gender) = req.gender {
        profile.gender = Some(gender.parse()?);
    }
    if let Some(is_diabetic) = req.is_diabetic {
        profile.is_diabetic = is_diabetic;
    }
    if let Some(allergies) = req.allergies {
        profile.allergies = allergies;
    }
    if let Some(conditions) = req.chronic_conditions {
        profile.chronic_conditions = conditions;
    }
    if let Some(language) = req.preferred_language {
        profile.preferred_language = Language::resolve(&language);
    }
    profile.phone = req.phone.or(profile.phone.take());
    profile.blood_group = req.blood_group.or(profile.blood_group.take());
    profile.address = req.address.or(profile.address.take());
    profile.age = req.age.or(profile.age);
    profile.emergency_contact = req.emergency_contact.or(profile.emergency_contact.take());
    Ok(())
}

#[utoipa::path(
    get,
    path = "/profile/vaccinations",
    responses(
        (status = 200, description = "Vaccination history, newest first", body = ListVaccinationsRes),
        (status = 401, description = "Missing or invalid session", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn list_vaccinations(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ListVaccinationsRes>, ApiError> {
    let records = state
        .profiles
        .list_vaccination_records(&session.user.id)
        .map_err(|e| core_error("List vaccinations", e))?;
    Ok(Json(ListVaccinationsRes {
        records: records.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/profile/vaccinations",
    request_body = NewVaccinationReq,
    responses(
        (status = 201, description = "Record added", body = VaccinationRecordRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 401, description = "Missing or invalid session", body = ErrorRes),
        (status = 404, description = "No profile yet", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn add_vaccination(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<NewVaccinationReq>,
) -> Result<(StatusCode, Json<VaccinationRecordRes>), ApiError> {
    let record = parse_new_record(req).map_err(|e| core_error("Add vaccination", e))?;
    let saved = state
        .profiles
        .add_vaccination_record(&session.user.id, record)
        .map_err(|e| core_error("Add vaccination", e))?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

fn parse_date(field: &str, value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidInput(format!("{field} must be YYYY-MM-DD")))
}

fn parse_new_record(req: NewVaccinationReq) -> CoreResult<NewVaccineRecord> {
    Ok(NewVaccineRecord {
        vaccine_name: req.vaccine_name,
        date_administered: parse_date("date_administered", &req.date_administered)?,
        next_due_date: req
            .next_due_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| parse_date("next_due_date", d))
            .transpose()?,
        status: req.status.parse()?,
    })
}
