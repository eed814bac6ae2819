//! Call arguments and route templates.

use crate::dispatch::{ApiError, HttpMethod};
use serde::Serialize;
use serde_json::{json, Value};

/// Placeholder substituted by [`CallArgs`] ids.
const ID_PLACEHOLDER: &str = "{id}";

/// Arguments for one endpoint invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallArgs {
    /// No arguments
    None,
    /// A single path identifier
    Id { id: String },
    /// Email/password pair (login, register)
    Credentials { email: String, password: String },
    /// JSON request body
    Body { body: Value },
    /// Path identifier plus JSON body
    IdAndBody { id: String, body: Value },
}

impl CallArgs {
    pub fn id(id: impl Into<String>) -> Self {
        CallArgs::Id { id: id.into() }
    }

    pub fn credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        CallArgs::Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn body(body: Value) -> Self {
        CallArgs::Body { body }
    }

    pub fn id_and_body(id: impl Into<String>, body: Value) -> Self {
        CallArgs::IdAndBody {
            id: id.into(),
            body,
        }
    }

    /// Number of positional arguments the call is made with.
    pub fn arity(&self) -> usize {
        match self {
            CallArgs::None => 0,
            CallArgs::Id { .. } | CallArgs::Body { .. } => 1,
            CallArgs::Credentials { .. } | CallArgs::IdAndBody { .. } => 2,
        }
    }

    pub fn path_id(&self) -> Option<&str> {
        match self {
            CallArgs::Id { id } | CallArgs::IdAndBody { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn json_body(&self) -> Option<Value> {
        match self {
            CallArgs::Credentials { email, password } => {
                Some(json!({"email": email, "password": password}))
            }
            CallArgs::Body { body } | CallArgs::IdAndBody { body, .. } => Some(body.clone()),
            _ => None,
        }
    }
}

/// HTTP binding of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub method: HttpMethod,
    /// Path template, `{id}` marks the path parameter
    pub template: &'static str,
}

impl Route {
    pub const fn new(method: HttpMethod, template: &'static str) -> Self {
        Self { method, template }
    }

    pub fn needs_id(&self) -> bool {
        self.template.contains(ID_PLACEHOLDER)
    }

    /// Concrete path and body for `args`.
    ///
    /// A template with a path parameter called without an id cannot be
    /// dispatched at all, which is reported as a wiring failure.
    pub fn render(&self, args: &CallArgs) -> Result<(String, Option<Value>), ApiError> {
        let path = if self.needs_id() {
            let id = args.path_id().ok_or_else(|| {
                ApiError::Unwired(format!("{} requires a path id", self.template))
            })?;
            self.template.replace(ID_PLACEHOLDER, id)
        } else {
            self.template.to_string()
        };
        Ok((path, args.json_body()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_have_arity_two() {
        let args = CallArgs::credentials("a@b.c", "pw");
        assert_eq!(args.arity(), 2);
        assert_eq!(
            args.json_body().unwrap(),
            json!({"email": "a@b.c", "password": "pw"})
        );
    }

    #[test]
    fn test_render_substitutes_id() {
        let route = Route::new(HttpMethod::Post, "/users/{id}/follow");
        let (path, body) = route.render(&CallArgs::id("42")).unwrap();
        assert_eq!(path, "/users/42/follow");
        assert!(body.is_none());
    }

    #[test]
    fn test_render_missing_id_is_wiring_error() {
        let route = Route::new(HttpMethod::Get, "/streams/{id}");
        let err = route.render(&CallArgs::None).unwrap_err();
        assert!(err.is_wiring());
    }

    #[test]
    fn test_render_static_route_carries_body() {
        let route = Route::new(HttpMethod::Put, "/settings");
        let (path, body) = route
            .render(&CallArgs::body(json!({"theme": "dark"})))
            .unwrap();
        assert_eq!(path, "/settings");
        assert_eq!(body.unwrap()["theme"], "dark");
    }
}
