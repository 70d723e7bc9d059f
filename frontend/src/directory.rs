//! 用户目录
//!
//! 管理员 / 经理面板共用的数据流：
//! - `UserDirectory`：先变更、后整表重新拉取，从不在本地打补丁
//! - `DirectoryState`：面板本地持有的快照和按动作划分的加载标记
//! - `RoleFilter`：只对已拉取快照做投影的角色过滤

use std::collections::BTreeSet;

use rolegate_shared::{CreateUserRequest, Role, UserId, UserRecord};

use crate::api::{ApiClient, ApiError, ApiResult, TokenStore};
use crate::web::http::HttpClient;

/// 变更之后那次整表拉取的结果
pub type Refetch = ApiResult<Vec<UserRecord>>;

// =========================================================
// 远端操作
// =========================================================

#[derive(Debug, Clone)]
pub struct UserDirectory<C, S> {
    api: ApiClient<C, S>,
}

impl<C: HttpClient, S: TokenStore> UserDirectory<C, S> {
    pub fn new(api: ApiClient<C, S>) -> Self {
        Self { api }
    }

    /// 拉取全部用户
    pub async fn list_users(&self) -> Refetch {
        self.api.list_users().await
    }

    /// 创建用户，成功后重新拉取列表
    ///
    /// 客户端只校验字段非空，其余交给服务端。
    pub async fn create_user(&self, req: &CreateUserRequest) -> ApiResult<Refetch> {
        validate_presence(req)?;
        let created = self.api.create_user(req).await?;
        log_info!("[Directory] created user #{} ({})", created.id, created.username);
        Ok(self.list_users().await)
    }

    /// 只修改角色，成功后重新拉取列表
    pub async fn set_user_role(&self, id: UserId, role: Role) -> ApiResult<Refetch> {
        self.api.update_role(id, role).await?;
        log_info!("[Directory] user #{} is now {}", id, role);
        Ok(self.list_users().await)
    }

    /// 删除用户
    ///
    /// 先调用 `confirm` 同步询问；取消时返回 `None` 且不发出任何请求。
    pub async fn delete_user(
        &self,
        id: UserId,
        confirm: impl FnOnce() -> bool,
    ) -> Option<ApiResult<Refetch>> {
        if !confirm() {
            return None;
        }

        let outcome = match self.api.delete_user(id).await {
            Ok(()) => {
                log_info!("[Directory] deleted user #{}", id);
                Ok(self.list_users().await)
            }
            Err(e) => Err(e),
        };
        Some(outcome)
    }
}

/// 四个字段都必须非空
pub fn validate_presence(req: &CreateUserRequest) -> ApiResult<()> {
    let missing: Vec<&str> = [
        ("username", req.username.as_str()),
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Please fill in: {}",
            missing.join(", ")
        )));
    }
    if req.role == Role::Unknown {
        return Err(ApiError::Validation("Please choose a role".to_string()));
    }
    Ok(())
}

// =========================================================
// 本地快照
// =========================================================

/// 面板的本地视图状态
///
/// 快照只会被一次成功的整表拉取整体替换；任何失败都保留上一次的快照。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryState {
    users: Vec<UserRecord>,
    loaded: bool,
    listing: bool,
    creating: bool,
    busy_rows: BTreeSet<UserId>,
}

impl DirectoryState {
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// 是否已经有过一次成功的拉取
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_listing(&self) -> bool {
        self.listing
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn is_busy(&self, id: UserId) -> bool {
        self.busy_rows.contains(&id)
    }

    pub fn begin_list(&mut self) {
        self.listing = true;
    }

    pub fn finish_list(&mut self, result: Refetch) -> Option<ApiError> {
        self.listing = false;
        self.settle(result)
    }

    /// 已有创建请求在途时返回 false
    pub fn try_begin_create(&mut self) -> bool {
        if self.creating {
            return false;
        }
        self.creating = true;
        true
    }

    pub fn finish_create(&mut self, outcome: ApiResult<Refetch>) -> Option<ApiError> {
        self.creating = false;
        outcome.map_or_else(Some, |refetch| self.settle(refetch))
    }

    /// 同一行已有请求在途时返回 false
    pub fn try_begin_row(&mut self, id: UserId) -> bool {
        self.busy_rows.insert(id)
    }

    pub fn finish_row(&mut self, id: UserId, outcome: ApiResult<Refetch>) -> Option<ApiError> {
        self.busy_rows.remove(&id);
        outcome.map_or_else(Some, |refetch| self.settle(refetch))
    }

    /// 取消的动作只需释放行标记
    pub fn release_row(&mut self, id: UserId) {
        self.busy_rows.remove(&id);
    }

    fn settle(&mut self, result: Refetch) -> Option<ApiError> {
        match result {
            Ok(users) => {
                self.users = users;
                self.loaded = true;
                None
            }
            Err(e) => Some(e),
        }
    }
}

// =========================================================
// 角色过滤
// =========================================================

/// 经理面板的角色过滤器，纯客户端投影
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub const OPTIONS: [RoleFilter; 4] = [
        RoleFilter::All,
        RoleFilter::Only(Role::Admin),
        RoleFilter::Only(Role::Manager),
        RoleFilter::Only(Role::User),
    ];

    pub fn matches(&self, record: &UserRecord) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(role) => record.role == *role,
        }
    }

    /// 按快照原有顺序返回匹配的记录
    pub fn apply(&self, users: &[UserRecord]) -> Vec<UserRecord> {
        users.iter().filter(|u| self.matches(u)).cloned().collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoleFilter::All => "All",
            RoleFilter::Only(role) => role.label(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RoleFilter::All)
    }

    /// 列表底部的计数说明
    pub fn summary(&self, shown: usize, total: usize) -> String {
        match self {
            RoleFilter::All => format!("Showing {} of {} users", shown, total),
            RoleFilter::Only(role) => format!(
                "Showing {} of {} users (filtered by {} role)",
                shown, total, role
            ),
        }
    }

    /// 过滤结果为空时的提示
    pub fn empty_hint(&self) -> String {
        match self {
            RoleFilter::All => "There are no users in the system".to_string(),
            RoleFilter::Only(role) => format!("No users with {} role", role),
        }
    }
}

/// 各角色人数统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleCounts {
    pub total: usize,
    pub admins: usize,
    pub managers: usize,
    pub users: usize,
}

impl RoleCounts {
    pub fn tally(records: &[UserRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut counts, record| {
                match record.role {
                    Role::Admin => counts.admins += 1,
                    Role::Manager => counts.managers += 1,
                    Role::User => counts.users += 1,
                    Role::Unknown => {}
                }
                counts
            },
        )
    }
}
