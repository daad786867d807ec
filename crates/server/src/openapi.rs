use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct TaskDoc {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
    /// RFC 3339 timestamp in UTC
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct CreateTaskDoc {
    /// 3..=80 characters after trimming
    pub title: String,
    /// At most 300 characters after trimming
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdateTaskDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme("bearer", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::ping,
        crate::routes::tasks::list_tasks,
        crate::routes::tasks::create_task,
        crate::routes::tasks::get_task,
        crate::routes::tasks::update_task,
        crate::routes::tasks::delete_task,
    ),
    components(
        schemas(
            HealthResponse,
            TaskDoc,
            CreateTaskDoc,
            UpdateTaskDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "tasks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_task_paths_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/tasks"));
        assert!(doc.paths.paths.contains_key("/tasks/{id}"));
        assert!(doc.paths.paths.contains_key("/ping"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
