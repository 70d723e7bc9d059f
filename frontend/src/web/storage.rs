//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，
//! 并在其上实现会话令牌的持久化。

use crate::api::TokenStore;

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回操作是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 存放在 LocalStorage 指定键下的会话令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTokenStore {
    key: String,
}

impl LocalTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenStore for LocalTokenStore {
    fn load(&self) -> Option<String> {
        LocalStorage::get(&self.key).filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        if !LocalStorage::set(&self.key, token) {
            log_warn!("[Storage] failed to persist session token");
        }
    }

    fn clear(&self) {
        if !LocalStorage::delete(&self.key) {
            log_warn!("[Storage] failed to remove session token");
        }
    }
}
