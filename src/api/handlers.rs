use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::assembler::{
    algorithm_info, command_info, container_info, parameter_info, parameter_type_info,
    space_system_info, AlgorithmInfo, CommandInfo, ContainerInfo, DetailLevel, ParameterInfo,
    ParameterTypeInfo, SpaceSystemInfo,
};
use crate::error::CatalogError;
use crate::logic::{
    CatalogQuery, ListAlgorithmsRequest, ListCommandsRequest, ListParametersRequest, ListRequest,
    MissionDatabaseSummary, Page, PageRequest, ParameterMatch, PrivilegeGate,
};
use crate::model::{AlgorithmScope, DataSource, MissionDatabase, NamedObjectId, UserContext};
use crate::store::CatalogStore;

/// Shared state of the HTTP surface.
pub struct MdbState<S> {
    pub store: S,
    pub gate: Box<dyn PrivilegeGate>,
    pub default_limit: usize,
}

pub type AppState<S> = Arc<MdbState<S>>;

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

fn api_error(err: CatalogError) -> ApiError {
    let status = match &err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Forbidden(_) => StatusCode::FORBIDDEN,
        CatalogError::BadRequest(_) => StatusCode::BAD_REQUEST,
        CatalogError::Internal(e) => {
            log::error!("Internal error: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::new(&err.to_string())))
}

fn catalog<S: CatalogStore>(state: &MdbState<S>, instance: &str) -> Result<Arc<MissionDatabase>, ApiError> {
    state.store.get_catalog(instance).ok_or_else(|| {
        api_error(CatalogError::not_found(format!("No such instance '{}'", instance)))
    })
}

/// Query string errors are reported with the same JSON body as every
/// other bad request.
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| api_error(CatalogError::bad_request(rejection.body_text())))
}

fn query<'a, S>(state: &'a MdbState<S>, mdb: &'a MissionDatabase, user: &'a UserContext) -> CatalogQuery<'a> {
    CatalogQuery::new(mdb, state.gate.as_ref(), user).with_default_limit(state.default_limit)
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub name: String,
    pub mission_database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListInstancesResponse {
    pub instances: Vec<InstanceInfo>,
}

pub async fn list_instances<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> Json<ListInstancesResponse> {
    let instances = state
        .store
        .list_instances()
        .into_iter()
        .filter_map(|name| {
            let mdb = state.store.get_catalog(&name)?;
            Some(InstanceInfo {
                mission_database: mdb.name().to_string(),
                version: mdb.version().map(str::to_string),
                name,
            })
        })
        .collect();
    Json(ListInstancesResponse { instances })
}

pub async fn get_mission_database<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(instance): Path<String>,
    user: UserContext,
) -> ApiResult<MissionDatabaseSummary> {
    let mdb = catalog(&state, &instance)?;
    let summary = query(&state, &mdb, &user)
        .mission_database()
        .map_err(api_error)?;
    Ok(Json(summary))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub system: Option<String>,
    pub q: Option<String>,
    pub pos: Option<usize>,
    pub limit: Option<usize>,
    pub next: Option<String>,
    #[serde(default)]
    pub details: bool,
}

impl ListQuery {
    fn page(&self) -> PageRequest {
        PageRequest {
            pos: self.pos,
            limit: self.limit,
            next: self.next.clone(),
        }
    }

    fn list_request(&self) -> ListRequest {
        ListRequest {
            system: self.system.clone(),
            q: self.q.clone(),
            page: self.page(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParametersQuery {
    pub system: Option<String>,
    pub q: Option<String>,
    pub pos: Option<usize>,
    pub limit: Option<usize>,
    pub next: Option<String>,
    /// Comma-separated engineering type names.
    pub types: Option<String>,
    pub source: Option<DataSource>,
    #[serde(default)]
    pub search_members: bool,
    #[serde(default)]
    pub details: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommandsQuery {
    pub system: Option<String>,
    pub q: Option<String>,
    pub pos: Option<usize>,
    pub limit: Option<usize>,
    pub next: Option<String>,
    #[serde(default)]
    pub no_abstract: bool,
    #[serde(default)]
    pub details: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlgorithmsQuery {
    pub system: Option<String>,
    pub q: Option<String>,
    pub pos: Option<usize>,
    pub limit: Option<usize>,
    pub next: Option<String>,
    pub scope: Option<AlgorithmScope>,
    #[serde(default)]
    pub details: bool,
}

pub async fn list_space_systems<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(instance): Path<String>,
    params: Result<Query<ListQuery>, QueryRejection>,
    user: UserContext,
) -> ApiResult<Page<SpaceSystemInfo>> {
    let params = query_params(params)?;
    let mdb = catalog(&state, &instance)?;
    let level = DetailLevel::for_listing(params.details);
    let page = query(&state, &mdb, &user)
        .list_space_systems(params.q.as_deref(), &params.page())
        .map_err(api_error)?;
    Ok(Json(page.map(|ss| space_system_info(ss, level))))
}

pub async fn get_space_system<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path((instance, name)): Path<(String, String)>,
    user: UserContext,
) -> ApiResult<SpaceSystemInfo> {
    let mdb = catalog(&state, &instance)?;
    let ss = query(&state, &mdb, &user)
        .get_space_system(&name)
        .map_err(api_error)?;
    Ok(Json(space_system_info(ss, DetailLevel::Full)))
}

pub async fn list_parameters<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(instance): Path<String>,
    params: Result<Query<ListParametersQuery>, QueryRejection>,
    user: UserContext,
) -> ApiResult<Page<ParameterInfo>> {
    let params = query_params(params)?;
    let mdb = catalog(&state, &instance)?;
    let level = DetailLevel::for_listing(params.details);
    let request = ListParametersRequest {
        list: ListRequest {
            system: params.system,
            q: params.q,
            page: PageRequest {
                pos: params.pos,
                limit: params.limit,
                next: params.next,
            },
        },
        types: split_list(params.types.as_deref()),
        source: params.source,
        search_members: params.search_members,
    };
    let page = query(&state, &mdb, &user)
        .list_parameters(&request)
        .map_err(api_error)?;
    Ok(Json(page.map(|item| match item {
        ParameterMatch::Parameter(p) => parameter_info(&mdb, p, None, level),
        ParameterMatch::Member(m) => parameter_info(&mdb, m.parameter, Some(&m.path), level),
    })))
}

pub async fn get_parameter<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path((instance, name)): Path<(String, String)>,
    user: UserContext,
) -> ApiResult<ParameterInfo> {
    let mdb = catalog(&state, &instance)?;
    let found = query(&state, &mdb, &user)
        .get_parameter(&name)
        .map_err(api_error)?;
    Ok(Json(parameter_info(
        &mdb,
        found.parameter,
        found.path.as_ref(),
        DetailLevel::Full,
    )))
}

#[derive(Debug, Deserialize)]
pub struct BatchGetParametersRequest {
    #[serde(default)]
    pub id: Vec<NamedObjectId>,
}

#[derive(Debug, Serialize)]
pub struct BatchGetParameterItem {
    pub id: NamedObjectId,
    pub parameter: ParameterInfo,
}

#[derive(Debug, Serialize)]
pub struct BatchGetParametersResponse {
    pub response: Vec<BatchGetParameterItem>,
}

pub async fn batch_get_parameters<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(instance): Path<String>,
    user: UserContext,
    RequestJson(request): RequestJson<BatchGetParametersRequest>,
) -> ApiResult<BatchGetParametersResponse> {
    let mdb = catalog(&state, &instance)?;
    let items = query(&state, &mdb, &user)
        .batch_get_parameters(&request.id)
        .map_err(api_error)?;
    let response = items
        .into_iter()
        .map(|item| BatchGetParameterItem {
            parameter: parameter_info(&mdb, item.parameter, None, DetailLevel::Summary),
            id: item.id,
        })
        .collect();
    Ok(Json(BatchGetParametersResponse { response }))
}

pub async fn get_parameter_type<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path((instance, name)): Path<(String, String)>,
    user: UserContext,
) -> ApiResult<ParameterTypeInfo> {
    let mdb = catalog(&state, &instance)?;
    let t = query(&state, &mdb, &user)
        .get_parameter_type(&name)
        .map_err(api_error)?;
    Ok(Json(parameter_type_info(t, DetailLevel::Full)))
}

pub async fn list_containers<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(instance): Path<String>,
    params: Result<Query<ListQuery>, QueryRejection>,
    user: UserContext,
) -> ApiResult<Page<ContainerInfo>> {
    let params = query_params(params)?;
    let mdb = catalog(&state, &instance)?;
    let level = DetailLevel::for_listing(params.details);
    let page = query(&state, &mdb, &user)
        .list_containers(&params.list_request())
        .map_err(api_error)?;
    Ok(Json(page.map(|c| container_info(&mdb, c, level))))
}

pub async fn get_container<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path((instance, name)): Path<(String, String)>,
    user: UserContext,
) -> ApiResult<ContainerInfo> {
    let mdb = catalog(&state, &instance)?;
    let c = query(&state, &mdb, &user)
        .get_container(&name)
        .map_err(api_error)?;
    Ok(Json(container_info(&mdb, c, DetailLevel::Full)))
}

pub async fn list_commands<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(instance): Path<String>,
    params: Result<Query<ListCommandsQuery>, QueryRejection>,
    user: UserContext,
) -> ApiResult<Page<CommandInfo>> {
    let params = query_params(params)?;
    let mdb = catalog(&state, &instance)?;
    let level = DetailLevel::for_listing(params.details);
    let request = ListCommandsRequest {
        list: ListRequest {
            system: params.system,
            q: params.q,
            page: PageRequest {
                pos: params.pos,
                limit: params.limit,
                next: params.next,
            },
        },
        no_abstract: params.no_abstract,
    };
    let page = query(&state, &mdb, &user)
        .list_commands(&request)
        .map_err(api_error)?;
    Ok(Json(page.map(|c| command_info(c, level))))
}

pub async fn get_command<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path((instance, name)): Path<(String, String)>,
    user: UserContext,
) -> ApiResult<CommandInfo> {
    let mdb = catalog(&state, &instance)?;
    let c = query(&state, &mdb, &user)
        .get_command(&name)
        .map_err(api_error)?;
    Ok(Json(command_info(c, DetailLevel::Full)))
}

pub async fn list_algorithms<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(instance): Path<String>,
    params: Result<Query<ListAlgorithmsQuery>, QueryRejection>,
    user: UserContext,
) -> ApiResult<Page<AlgorithmInfo>> {
    let params = query_params(params)?;
    let mdb = catalog(&state, &instance)?;
    let level = DetailLevel::for_listing(params.details);
    let request = ListAlgorithmsRequest {
        list: ListRequest {
            system: params.system,
            q: params.q,
            page: PageRequest {
                pos: params.pos,
                limit: params.limit,
                next: params.next,
            },
        },
        scope: params.scope,
    };
    let page = query(&state, &mdb, &user)
        .list_algorithms(&request)
        .map_err(api_error)?;
    Ok(Json(page.map(|a| algorithm_info(a, level))))
}

pub async fn get_algorithm<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path((instance, name)): Path<(String, String)>,
    user: UserContext,
) -> ApiResult<AlgorithmInfo> {
    let mdb = catalog(&state, &instance)?;
    let a = query(&state, &mdb, &user)
        .get_algorithm(&name)
        .map_err(api_error)?;
    Ok(Json(algorithm_info(a, DetailLevel::Full)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("float, integer,,")), vec!["float", "integer"]);
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(api_error(CatalogError::not_found("x")).0, StatusCode::NOT_FOUND);
        assert_eq!(api_error(CatalogError::forbidden("x")).0, StatusCode::FORBIDDEN);
        assert_eq!(api_error(CatalogError::bad_request("x")).0, StatusCode::BAD_REQUEST);
        let (status, Json(body)) = api_error(CatalogError::Internal(anyhow::anyhow!("boom")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "boom");
    }
}
