use reqwest::Method;
use serde_json::Value;
use validator::Validate;

use super::{encode, ApiClient, ApiRequest};
use crate::entities::user::{GoogleLoginRequest, LoginRequest, RegisterRequest};
use crate::error::AppResult;

pub const ADMIN_LOGIN_PATH: &str = "/api/auth/admin-login";
pub const ADMIN_LOGOUT_PATH: &str = "/api/auth/admin-logout";
pub const VERIFY_PATH: &str = "/api/auth/verify";
pub const USER_LOGIN_PATH: &str = "/api/auth/user/login";
pub const USER_REGISTER_PATH: &str = "/api/auth/user/register";
pub const USER_GOOGLE_PATH: &str = "/api/auth/user/google";

// The session itself travels as an httpOnly cookie held by the transport;
// response bodies are passed through untouched.
impl ApiClient {
    pub async fn admin_login(&self, request: &LoginRequest) -> AppResult<Value> {
        request.validate()?;
        self.call(ApiRequest::new(Method::POST, ADMIN_LOGIN_PATH).json(encode(request)?))
            .await
    }

    pub async fn admin_logout(&self) -> AppResult<Value> {
        self.call(ApiRequest::new(Method::POST, ADMIN_LOGOUT_PATH)).await
    }

    pub async fn verify(&self) -> AppResult<Value> {
        self.call(ApiRequest::get(VERIFY_PATH)).await
    }

    pub async fn user_login(&self, request: &LoginRequest) -> AppResult<Value> {
        request.validate()?;
        self.call(ApiRequest::new(Method::POST, USER_LOGIN_PATH).json(encode(request)?))
            .await
    }

    pub async fn user_register(&self, request: &RegisterRequest) -> AppResult<Value> {
        request.validate()?;
        self.call(ApiRequest::new(Method::POST, USER_REGISTER_PATH).json(encode(request)?))
            .await
    }

    pub async fn user_google(&self, request: &GoogleLoginRequest) -> AppResult<Value> {
        request.validate()?;
        self.call(ApiRequest::new(Method::POST, USER_GOOGLE_PATH).json(encode(request)?))
            .await
    }
}
