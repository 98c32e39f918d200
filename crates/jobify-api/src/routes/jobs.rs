//! # Job Routes
//!
//! CRUD over the caller's job applications, the filtered listing, and the
//! per-status / per-month stats.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/jobs`: filtered, sorted, paginated listing of own jobs
//! - `POST /api/v1/jobs`: create a job (not for the demo account)
//! - `GET /api/v1/jobs/stats`: status counts and monthly applications
//! - `GET /api/v1/jobs/{id}`: fetch one job
//! - `PATCH /api/v1/jobs/{id}`: edit a job (not for the demo account)
//! - `DELETE /api/v1/jobs/{id}`: delete a job (not for the demo account)
//!
//! A job is reachable through `{id}` by its owner and by admins.

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{Datelike, NaiveDate, Utc};
use jobify_auth::IdentityContext;
use jobify_core::{JobSort, JobStatus, JobType, RecordId, ValidationError};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{authenticate_user, check_for_test_user};
use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, is_blank, CurrentUser, Validate};
use crate::routes::auth::required;
use crate::state::{AppState, JobRecord};

/// Page size when the query gives none.
pub const DEFAULT_LIMIT: usize = 10;

/// How many months `monthlyApplications` reports.
const STATS_MONTHS: usize = 6;

/// Value of `jobStatus` / `jobType` that disables the filter.
const ALL_FILTER: &str = "all";

// ── Request/Response DTOs ───────────────────────────────────────────

/// Body for creating or editing a job.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    /// `pending` when absent on create; left unchanged when absent on edit.
    pub job_status: Option<String>,
    /// `full-time` when absent on create; left unchanged when absent on edit.
    pub job_type: Option<String>,
    pub job_location: Option<String>,
}

impl JobRequest {
    fn status(&self) -> Result<Option<JobStatus>, ValidationError> {
        self.job_status.as_deref().map(str::parse).transpose()
    }

    fn job_type(&self) -> Result<Option<JobType>, ValidationError> {
        self.job_type.as_deref().map(str::parse).transpose()
    }
}

impl Validate for JobRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if is_blank(&self.company) {
            problems.push("company is required".to_string());
        }
        if is_blank(&self.position) {
            problems.push("position is required".to_string());
        }
        if let Err(err) = self.status() {
            problems.push(err.to_string());
        }
        if let Err(err) = self.job_type() {
            problems.push(err.to_string());
        }
        if is_blank(&self.job_location) {
            problems.push("job location is required".to_string());
        }
        problems
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct JobQuery {
    /// Case-insensitive substring of position or company.
    pub search: Option<String>,
    /// A status, or `all`.
    pub job_status: Option<String>,
    /// A job type, or `all`.
    pub job_type: Option<String>,
    /// `newest` (default), `oldest`, `a-z` or `z-a`. Unknown values sort newest first.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub limit: Option<usize>,
}

/// A single job.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobResponse {
    pub job: JobRecord,
}

/// Acknowledgement carrying the affected job.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobMutationResponse {
    pub msg: String,
    pub job: JobRecord,
}

/// One page of the caller's jobs.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub total_jobs: usize,
    pub num_of_pages: usize,
    pub current_page: usize,
    pub jobs: Vec<JobRecord>,
}

/// Count of the caller's jobs per status.
#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DefaultStats {
    pub pending: usize,
    pub interview: usize,
    pub declined: usize,
}

/// Jobs created in one calendar month.
#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyApplication {
    /// Month as `Mon YY`, e.g. `Aug 23`.
    pub date: String,
    pub count: usize,
}

/// Status counts plus recent monthly activity.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatsResponse {
    pub default_stats: DefaultStats,
    pub monthly_applications: Vec<MonthlyApplication>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the jobs router. All routes sit behind session authentication;
/// the mutating ones also refuse the demo account.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_jobs).merge(post(create_job).route_layer(from_fn(check_for_test_user))),
        )
        .route("/api/v1/jobs/stats", get(show_stats))
        .route(
            "/api/v1/jobs/{id}",
            get(get_job).merge(
                patch(update_job)
                    .delete(delete_job)
                    .route_layer(from_fn(check_for_test_user)),
            ),
        )
        .route_layer(from_fn_with_state(state.clone(), authenticate_user))
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Resolve `{id}` to a job the caller may touch.
fn accessible_job(
    state: &AppState,
    identity: &IdentityContext,
    raw_id: &str,
) -> Result<JobRecord, AppError> {
    let id = RecordId::parse(raw_id).map_err(|_| AppError::BadRequest("invalid job id".into()))?;
    let job = state
        .jobs
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("no job with id {raw_id}")))?;
    if !identity.can_access(&job.created_by) {
        tracing::warn!(user_id = %identity.subject_id, job_id = %id, "job access refused");
        return Err(AppError::Unauthorized(
            "not authorized to access this route".into(),
        ));
    }
    Ok(job)
}

/// Parse an optional filter value; absent or `all` means no filter.
fn parse_filter<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = ValidationError>,
{
    match value {
        None | Some(ALL_FILTER) | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|err: ValidationError| AppError::BadRequest(err.to_string())),
    }
}

fn sort_jobs(jobs: &mut [JobRecord], sort: JobSort) {
    match sort {
        JobSort::Newest => jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        JobSort::Oldest => jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        JobSort::AToZ => jobs.sort_by(|a, b| a.position.cmp(&b.position)),
        JobSort::ZToA => jobs.sort_by(|a, b| b.position.cmp(&a.position)),
    }
}

/// Number of pages needed for `total` items at `limit` per page.
fn page_count(total: usize, limit: usize) -> usize {
    total.div_ceil(limit)
}

fn default_stats(jobs: &[JobRecord]) -> DefaultStats {
    jobs.iter()
        .fold(DefaultStats::default(), |mut stats, job| {
            match job.job_status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Interview => stats.interview += 1,
                JobStatus::Declined => stats.declined += 1,
            }
            stats
        })
}

/// The most recent months that have jobs, oldest first.
fn monthly_applications(jobs: &[JobRecord]) -> Vec<MonthlyApplication> {
    let mut by_month: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for job in jobs {
        *by_month
            .entry((job.created_at.year(), job.created_at.month()))
            .or_default() += 1;
    }

    let mut recent: Vec<MonthlyApplication> = by_month
        .into_iter()
        .rev()
        .take(STATS_MONTHS)
        .filter_map(|((year, month), count)| {
            NaiveDate::from_ymd_opt(year, month, 1).map(|first| MonthlyApplication {
                date: first.format("%b %y").to_string(),
                count,
            })
        })
        .collect();
    recent.reverse();
    recent
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /api/v1/jobs: List the caller's jobs.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(JobQuery),
    responses(
        (status = 200, description = "One page of jobs", body = JobListResponse),
        (status = 400, description = "Unknown status or type filter", body = crate::error::ErrorBody),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "jobs"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    query: Result<Query<JobQuery>, QueryRejection>,
) -> Result<Json<JobListResponse>, AppError> {
    let query = extract_query(query)?;
    let status: Option<JobStatus> = parse_filter(query.job_status.as_deref())?;
    let job_type: Option<JobType> = parse_filter(query.job_type.as_deref())?;
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let sort = query
        .sort
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    let page = query.page.filter(|&p| p > 0).unwrap_or(1);
    let limit = query.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIMIT);

    let mut jobs = state.jobs.filter(|job| {
        job.created_by == identity.subject_id
            && status.map_or(true, |s| job.job_status == s)
            && job_type.map_or(true, |t| job.job_type == t)
            && search.as_deref().map_or(true, |needle| {
                job.position.to_lowercase().contains(needle)
                    || job.company.to_lowercase().contains(needle)
            })
    });
    sort_jobs(&mut jobs, sort);

    let total_jobs = jobs.len();
    let jobs = jobs
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    Ok(Json(JobListResponse {
        total_jobs,
        num_of_pages: page_count(total_jobs, limit),
        current_page: page,
        jobs,
    }))
}

/// POST /api/v1/jobs: Create a job owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = JobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Validation error or demo account", body = crate::error::ErrorBody),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "jobs"
)]
pub async fn create_job(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    body: Result<Json<JobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let job_status = req.status().map_err(|e| AppError::BadRequest(e.to_string()))?;
    let job_type = req.job_type().map_err(|e| AppError::BadRequest(e.to_string()))?;
    let now = Utc::now();
    let id = RecordId::generate();

    let job = JobRecord {
        id: id.clone(),
        company: required(req.company),
        position: required(req.position),
        job_status: job_status.unwrap_or_default(),
        job_type: job_type.unwrap_or_default(),
        job_location: required(req.job_location),
        created_by: identity.subject_id,
        created_at: now,
        updated_at: now,
    };
    state.jobs.insert(id, job.clone());

    tracing::info!(job_id = %job.id, user_id = %job.created_by, "job created");
    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

/// GET /api/v1/jobs/stats: Status counts and monthly applications.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/stats",
    responses(
        (status = 200, description = "Job stats for the caller", body = JobStatsResponse),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "jobs"
)]
pub async fn show_stats(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Json<JobStatsResponse> {
    let jobs = state
        .jobs
        .filter(|job| job.created_by == identity.subject_id);
    Json(JobStatsResponse {
        default_stats: default_stats(&jobs),
        monthly_applications: monthly_applications(&jobs),
    })
}

/// GET /api/v1/jobs/{id}: Fetch one job.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "The job", body = JobResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 403, description = "Neither owner nor admin", body = crate::error::ErrorBody),
        (status = 404, description = "No such job", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "jobs"
)]
pub async fn get_job(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>, AppError> {
    let job = accessible_job(&state, &identity, &id)?;
    Ok(Json(JobResponse { job }))
}

/// PATCH /api/v1/jobs/{id}: Edit a job.
///
/// The body is validated before the id is resolved.
#[utoipa::path(
    patch,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    request_body = JobRequest,
    responses(
        (status = 200, description = "Job modified", body = JobMutationResponse),
        (status = 400, description = "Validation error, malformed id, or demo account", body = crate::error::ErrorBody),
        (status = 403, description = "Neither owner nor admin", body = crate::error::ErrorBody),
        (status = 404, description = "No such job", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "jobs"
)]
pub async fn update_job(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<JobRequest>, JsonRejection>,
) -> Result<Json<JobMutationResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let job_status = req.status().map_err(|e| AppError::BadRequest(e.to_string()))?;
    let job_type = req.job_type().map_err(|e| AppError::BadRequest(e.to_string()))?;
    let existing = accessible_job(&state, &identity, &id)?;

    let job = state
        .jobs
        .try_update(&existing.id, |job| {
            job.company = required(req.company);
            job.position = required(req.position);
            job.job_location = required(req.job_location);
            if let Some(status) = job_status {
                job.job_status = status;
            }
            if let Some(job_type) = job_type {
                job.job_type = job_type;
            }
            job.updated_at = Utc::now();
            Ok::<_, AppError>(job.clone())
        })
        .ok_or_else(|| AppError::NotFound(format!("no job with id {id}")))??;

    tracing::info!(job_id = %job.id, user_id = %identity.subject_id, "job modified");
    Ok(Json(JobMutationResponse {
        msg: "job modified".to_string(),
        job,
    }))
}

/// DELETE /api/v1/jobs/{id}: Delete a job.
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job deleted", body = JobMutationResponse),
        (status = 400, description = "Malformed id or demo account", body = crate::error::ErrorBody),
        (status = 403, description = "Neither owner nor admin", body = crate::error::ErrorBody),
        (status = 404, description = "No such job", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "jobs"
)]
pub async fn delete_job(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<JobMutationResponse>, AppError> {
    let existing = accessible_job(&state, &identity, &id)?;
    let job = state
        .jobs
        .remove(&existing.id)
        .ok_or_else(|| AppError::NotFound(format!("no job with id {id}")))?;

    tracing::info!(job_id = %job.id, user_id = %identity.subject_id, "job deleted");
    Ok(Json(JobMutationResponse {
        msg: "job deleted".to_string(),
        job,
    }))
}
