use crate::{
    CreateUserRequest, Credentials, DeleteUserRequest, Identity, TokenResponse, UpdateRoleRequest,
    UserRecord,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths are relative to the configured base URL and keep the backend's trailing slash.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the stored bearer token is attached.
    const AUTHENTICATED: bool = true;

    /// The URL path (or suffix).
    fn path(&self) -> String;
}

// =========================================================
// Request Definitions
// =========================================================

/// Exchange credentials for an access token
impl ApiRequest for Credentials {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "token/".to_string()
    }
}

/// Fetch the caller's own identity
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentIdentityRequest;

impl ApiRequest for CurrentIdentityRequest {
    type Response = Identity;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "me/".to_string()
    }
}

/// List all users
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<UserRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "users/".to_string()
    }
}

impl ApiRequest for CreateUserRequest {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "users/".to_string()
    }
}

impl ApiRequest for UpdateRoleRequest {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("users/{}/", self.id)
    }
}

/// The backend answers 204 with an empty body; we treat success as ().
impl ApiRequest for DeleteUserRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("users/{}/", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_paths_keep_trailing_slash() {
        assert_eq!(ListUsersRequest.path(), "users/");
        assert_eq!(CurrentIdentityRequest.path(), "me/");
        assert_eq!(
            UpdateRoleRequest {
                id: 5,
                role: Role::Admin
            }
            .path(),
            "users/5/"
        );
        assert_eq!(DeleteUserRequest { id: 9 }.path(), "users/9/");
    }

    #[test]
    fn test_only_token_exchange_is_anonymous() {
        assert!(!<Credentials as ApiRequest>::AUTHENTICATED);
        assert!(<CurrentIdentityRequest as ApiRequest>::AUTHENTICATED);
        assert!(<ListUsersRequest as ApiRequest>::AUTHENTICATED);
        assert!(<DeleteUserRequest as ApiRequest>::AUTHENTICATED);
    }

    #[test]
    fn test_body_methods() {
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Put.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }
}
