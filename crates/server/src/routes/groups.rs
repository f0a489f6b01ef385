use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use service::group_service;
use service::pagination::ListWindow;
use tracing::{error, info};
use uuid::Uuid;

use models::{group, student};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Substring filter on the group name
    pub name: Option<String>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StudentDto {
    pub id: Uuid,
    pub name: String,
}

/// Wire representation of a group. `students` is serialized only on
/// single-group fetches; list responses stay shallow.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GroupDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<StudentDto>>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateGroupInput {
    pub name: String,
}

fn student_to_dto(m: student::Model) -> StudentDto {
    StudentDto { id: m.id, name: m.name }
}

fn group_to_dto(m: group::Model) -> GroupDto {
    GroupDto { id: m.id, name: m.name, students: None }
}

fn group_with_students_to_dto(m: group::Model, students: Vec<student::Model>) -> GroupDto {
    GroupDto {
        id: m.id,
        name: m.name,
        students: Some(students.into_iter().map(student_to_dto).collect()),
    }
}

#[utoipa::path(
    get, path = "/groups", tag = "groups",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK", body = [GroupDto]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<GroupDto>>, JsonApiError> {
    let window = ListWindow::from_query(q.skip, q.take);
    match group_service::list_groups(&state.db, q.name.as_deref(), window).await {
        Ok(groups) => {
            info!(count = groups.len(), "list groups");
            Ok(Json(groups.into_iter().map(group_to_dto).collect()))
        }
        Err(e) => {
            error!(err = %e, "list groups failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/groups/{id}", tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "OK", body = GroupDto),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupDto>, StatusCode> {
    match group_service::get_group(&state.db, id).await {
        Ok(Some((g, members))) => Ok(Json(group_with_students_to_dto(g, members))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, "get group failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[utoipa::path(
    post, path = "/groups", tag = "groups",
    request_body = CreateGroupInput,
    responses(
        (status = 201, description = "Created", body = GroupDto),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateGroupInput>,
) -> Result<impl IntoResponse, JsonApiError> {
    match group_service::add_group(&state.db, &input.name).await {
        Ok(m) => {
            info!(id = %m.id, name = %m.name, "created group");
            let location = format!("/groups/{}", m.id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(group_with_students_to_dto(m, Vec::new())),
            ))
        }
        Err(e) => match e {
            ServiceError::Validation(_) | ServiceError::Model(_) => Err(JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Validation Error",
                Some(e.to_string()),
            )),
            _ => {
                error!(err = %e, "create group failed");
                Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(e.to_string())))
            }
        },
    }
}

#[utoipa::path(
    delete, path = "/groups/{id}", tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> StatusCode {
    match group_service::delete_group(&state.db, id).await {
        Ok(()) => {
            info!(id = %id, "deleted group");
            StatusCode::NO_CONTENT
        }
        Err(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete group failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[utoipa::path(
    post, path = "/groups/{group_id}/students/{student_id}", tag = "groups",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Added"),
        (status = 404, description = "Group or student not found"),
        (status = 500, description = "Add Failed")
    )
)]
pub async fn add_student(
    State(state): State<ServerState>,
    Path((group_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, JsonApiError> {
    match group_service::add_student_to_group(&state.db, group_id, student_id).await {
        Ok(()) => {
            info!(group_id = %group_id, student_id = %student_id, "student added to group");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => match e {
            ServiceError::NotFound(_) => {
                Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())))
            }
            _ => {
                error!(err = %e, "add student to group failed");
                Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Add Failed", Some(e.to_string())))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_group() -> group::Model {
        group::Model {
            id: Uuid::new_v4(),
            name: "Algebra 1".into(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn shallow_dto_omits_students_key() {
        let dto = group_to_dto(sample_group());
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("students").is_none());
        assert_eq!(json["name"], "Algebra 1");
    }

    #[test]
    fn full_dto_serializes_empty_member_list() {
        let dto = group_with_students_to_dto(sample_group(), Vec::new());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["students"], serde_json::json!([]));
    }

    #[test]
    fn full_dto_carries_members() {
        let s = student::Model {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            created_at: Utc::now().into(),
        };
        let sid = s.id;
        let dto = group_with_students_to_dto(sample_group(), vec![s]);
        let members = dto.students.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, sid);
        assert_eq!(members[0].name, "Ada");
    }

    #[test]
    fn create_input_ignores_unknown_fields() {
        let input: CreateGroupInput =
            serde_json::from_str(r#"{"id":"not-used","name":"Chem","students":[]}"#).unwrap();
        assert_eq!(input.name, "Chem");
    }
}
