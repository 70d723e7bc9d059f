//! 测试工具：内存假后端、内存令牌存储、内存会话单元

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use rolegate_shared::{
    BEARER_PREFIX, CreateUserRequest, Credentials, HEADER_AUTHORIZATION, Role, UserId, UserRecord,
};
use rolegate_shared::protocol::HttpMethod;
use serde_json::json;
use tokio::sync::Notify;

use crate::api::{ApiClient, TokenStore};
use crate::session::{SessionCell, SessionState, SessionStore};
use crate::web::http::{HttpClient, HttpError, HttpRequest, HttpResponse};

pub const BASE_URL: &str = "http://backend.test/api/";

pub type TestApi = ApiClient<FakeBackend, MemoryTokenStore>;
pub type TestSession = SessionStore<FakeBackend, MemoryTokenStore, MemorySessionCell>;

// =========================================================
// 假后端
// =========================================================

/// 注入到下一次请求的故障
#[derive(Debug, Clone)]
pub enum Failure {
    Status(u16, String),
    Network,
}

#[derive(Default)]
struct BackendState {
    users: Vec<UserRecord>,
    passwords: HashMap<String, String>,
    tokens: HashMap<String, UserId>,
    next_id: UserId,
    issued: u64,
    requests: Vec<HttpRequest>,
    failures: VecDeque<Failure>,
    hold: Option<Rc<Notify>>,
}

/// 行为与真实 REST 后端一致的内存实现：
/// `token/` 签发令牌，其余路径要求有效 Bearer；
/// 只有管理员能变更，管理员和经理能列出用户。
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Rc<RefCell<BackendState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state.borrow_mut().next_id = 1;
        backend
    }

    pub fn with_user(self, username: &str, role: Role, password: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.users.push(UserRecord {
                id,
                username: username.to_string(),
                email: format!("{}@example.com", username),
                role,
            });
            state
                .passwords
                .insert(username.to_string(), password.to_string());
        }
        self
    }

    /// 直接为某个用户签发令牌（模拟上次会话留下的令牌）
    pub fn issue_token(&self, username: &str) -> String {
        let mut state = self.state.borrow_mut();
        let id = state
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.id)
            .expect("unknown user");
        issue(&mut state, id)
    }

    pub fn revoke_all_tokens(&self) {
        self.state.borrow_mut().tokens.clear();
    }

    pub fn fail_next(&self, failure: Failure) {
        self.state.borrow_mut().failures.push_back(failure);
    }

    /// 挂起下一次请求，直到返回的 `Notify` 被触发后才应答
    pub fn hold_next(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.state.borrow_mut().hold = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.state.borrow().users.clone()
    }

    pub fn id_of(&self, username: &str) -> UserId {
        self.state
            .borrow()
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.id)
            .expect("unknown user")
    }
}

fn issue(state: &mut BackendState, id: UserId) -> String {
    state.issued += 1;
    let token = format!("tok-{}-{}", id, state.issued);
    state.tokens.insert(token.clone(), id);
    token
}

fn respond(status: u16, body: serde_json::Value) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

fn not_found() -> Result<HttpResponse, HttpError> {
    respond(404, json!({ "detail": "Not found." }))
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FakeBackend {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.requests.push(req.clone());
            state.hold.take()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.borrow_mut();
        if let Some(failure) = state.failures.pop_front() {
            return match failure {
                Failure::Network => Err(HttpError::NetworkError("connection refused".to_string())),
                Failure::Status(status, body) => Ok(HttpResponse { status, body }),
            };
        }

        let Some(path) = req.url.strip_prefix(BASE_URL) else {
            return not_found();
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        // 公开端点
        if let (HttpMethod::Post, ["token"]) = (req.method, segments.as_slice()) {
            let body = req.body.as_deref().unwrap_or_default();
            let creds: Credentials = match serde_json::from_str(body) {
                Ok(c) => c,
                Err(_) => return respond(400, json!({ "detail": "malformed" })),
            };
            let valid = state.passwords.get(&creds.username) == Some(&creds.password);
            if !valid {
                return respond(
                    401,
                    json!({ "detail": "No active account found with the given credentials" }),
                );
            }
            let id = state
                .users
                .iter()
                .find(|u| u.username == creds.username)
                .map(|u| u.id)
                .expect("password without user");
            let token = issue(&mut state, id);
            return respond(200, json!({ "access": token }));
        }

        // 其余端点都需要有效令牌
        let caller = req
            .header(HEADER_AUTHORIZATION)
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .and_then(|t| state.tokens.get(t).copied())
            .and_then(|id| state.users.iter().find(|u| u.id == id).cloned());
        let Some(caller) = caller else {
            return respond(401, json!({ "detail": "Given token not valid" }));
        };

        match (req.method, segments.as_slice()) {
            (HttpMethod::Get, ["me"]) => respond(200, json!(caller)),

            (HttpMethod::Get, ["users"]) => {
                if caller.role == Role::User {
                    return respond(403, json!({ "detail": "forbidden" }));
                }
                respond(200, json!(state.users))
            }

            (HttpMethod::Post, ["users"]) => {
                if caller.role != Role::Admin {
                    return respond(403, json!({ "detail": "forbidden" }));
                }
                let body = req.body.as_deref().unwrap_or_default();
                let new_user: CreateUserRequest = match serde_json::from_str(body) {
                    Ok(u) => u,
                    Err(_) => return respond(400, json!({ "detail": "malformed" })),
                };
                if state.users.iter().any(|u| u.username == new_user.username) {
                    return respond(
                        400,
                        json!({ "username": ["A user with that username already exists."] }),
                    );
                }
                let id = state.next_id;
                state.next_id += 1;
                let record = UserRecord {
                    id,
                    username: new_user.username.clone(),
                    email: new_user.email,
                    role: new_user.role,
                };
                state.users.push(record.clone());
                state.passwords.insert(new_user.username, new_user.password);
                respond(201, json!(record))
            }

            (HttpMethod::Put, ["users", id]) => {
                if caller.role != Role::Admin {
                    return respond(403, json!({ "detail": "forbidden" }));
                }
                let Ok(id) = id.parse::<UserId>() else {
                    return not_found();
                };
                let body: serde_json::Value =
                    serde_json::from_str(req.body.as_deref().unwrap_or("{}")).unwrap_or_default();
                let Some(role) = body
                    .get("role")
                    .and_then(|r| serde_json::from_value::<Role>(r.clone()).ok())
                else {
                    return respond(400, json!({ "role": ["This field is required."] }));
                };
                match state.users.iter_mut().find(|u| u.id == id) {
                    Some(user) => {
                        user.role = role;
                        let updated = user.clone();
                        respond(200, json!(updated))
                    }
                    None => not_found(),
                }
            }

            (HttpMethod::Delete, ["users", id]) => {
                if caller.role != Role::Admin {
                    return respond(403, json!({ "detail": "forbidden" }));
                }
                let Ok(id) = id.parse::<UserId>() else {
                    return not_found();
                };
                let before = state.users.len();
                state.users.retain(|u| u.id != id);
                if state.users.len() == before {
                    return not_found();
                }
                Ok(HttpResponse {
                    status: 204,
                    body: String::new(),
                })
            }

            _ => not_found(),
        }
    }
}

// =========================================================
// 内存令牌存储
// =========================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore(Rc<RefCell<Option<String>>>);

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self(Rc::new(RefCell::new(Some(token.to_string()))))
    }

    pub fn current(&self) -> Option<String> {
        self.0.borrow().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.0.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.0.borrow_mut() = None;
    }
}

// =========================================================
// 内存会话单元
// =========================================================

/// 记录每一次状态写入，便于断言状态机的转移序列
#[derive(Debug, Clone, Default)]
pub struct MemorySessionCell {
    history: Rc<RefCell<Vec<SessionState>>>,
}

impl MemorySessionCell {
    pub fn history(&self) -> Vec<SessionState> {
        self.history.borrow().clone()
    }
}

impl SessionCell for MemorySessionCell {
    fn snapshot(&self) -> SessionState {
        self.history.borrow().last().cloned().unwrap_or_default()
    }

    fn replace(&self, state: SessionState) {
        self.history.borrow_mut().push(state);
    }
}

// =========================================================
// 辅助函数
// =========================================================

pub fn test_api(backend: &FakeBackend, tokens: &MemoryTokenStore) -> TestApi {
    ApiClient::new(BASE_URL, backend.clone(), tokens.clone())
}

pub fn test_session(backend: &FakeBackend, tokens: &MemoryTokenStore) -> TestSession {
    SessionStore::new(test_api(backend, tokens), MemorySessionCell::default())
}

/// 预置的三人后端：admin / manager / user，密码均为 "good-pw"
pub fn seeded_backend() -> FakeBackend {
    FakeBackend::new()
        .with_user("alice", Role::Admin, "good-pw")
        .with_user("amy", Role::Manager, "good-pw")
        .with_user("bob", Role::User, "good-pw")
}
