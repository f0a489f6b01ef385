use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::groups::list,
        crate::routes::groups::create,
        crate::routes::groups::get,
        crate::routes::groups::delete,
        crate::routes::groups::add_student,
    ),
    components(
        schemas(
            crate::routes::groups::GroupDto,
            crate::routes::groups::StudentDto,
            crate::routes::groups::CreateGroupInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "groups"),
    )
)]
pub struct ApiDoc;
