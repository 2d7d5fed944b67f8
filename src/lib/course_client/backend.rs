use std::sync::{Mutex, PoisonError};

use log::{debug, info};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{
    error::ApiError,
    models::{
        auth_model::{AuthResponse, LoginRequest, User},
        course_model::{
            Assignment, AssignmentGroupDetail, Course, CourseCollections, CourseEdit, GroupId,
            NewAssignment,
        },
    },
};

/// A trait, necessary for every entity that will answer the client's remote calls.
#[allow(async_fn_in_trait)]
pub trait CourseBackend {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn load_user(&self) -> Result<User, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn get_courses(&self) -> Result<CourseCollections, ApiError>;
    async fn get_assignment_group(&self, id: GroupId) -> Result<AssignmentGroupDetail, ApiError>;
    async fn delete_assignment_group(&self, id: GroupId) -> Result<(), ApiError>;
    async fn create_assignment(&self, record: &NewAssignment) -> Result<Assignment, ApiError>;
    async fn edit_course(&self, record: &CourseEdit) -> Result<Course, ApiError>;
}

/// Talks to the course manager over HTTP, keeping the session token between calls.
#[derive(Debug)]
pub struct RestBackend {
    http_client: Client,
    base_url: String,
    token: Mutex<Option<String>>,
}

impl RestBackend {
    pub fn new(http_client: Client, base_url: &str) -> Self {
        RestBackend {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: Mutex::new(None),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.header("Authorization", format!("Token {}", token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, login: bool) -> Result<Response, ApiError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!("Backend answered {} with {}", status, body);
        Err(ApiError::from_status(status, body, login))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(request, false).await?.json().await?)
    }
}

/// Allows to use RestBackend for every remote call via requests to the course manager API.
impl CourseBackend for RestBackend {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        info!("Logging in as {}", username);
        let request = self
            .http_client
            .post(self.url("auth/login"))
            .json(&LoginRequest { username, password });
        let auth: AuthResponse = self.send(request, true).await?.json().await?;
        self.set_token(Some(auth.token.clone()));
        Ok(auth)
    }

    async fn load_user(&self) -> Result<User, ApiError> {
        self.send_json(self.http_client.get(self.url("auth/user")))
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.http_client.post(self.url("auth/logout")), false)
            .await?;
        self.set_token(None);
        Ok(())
    }

    async fn get_courses(&self) -> Result<CourseCollections, ApiError> {
        self.send_json(self.http_client.get(self.url("courses/")))
            .await
    }

    async fn get_assignment_group(&self, id: GroupId) -> Result<AssignmentGroupDetail, ApiError> {
        info!("Getting assignment group {}", id);
        let url = self.url(&format!("assignment-groups/{}/", id));
        self.send_json(self.http_client.get(url)).await
    }

    async fn delete_assignment_group(&self, id: GroupId) -> Result<(), ApiError> {
        info!("Deleting assignment group {}", id);
        let url = self.url(&format!("assignment-groups/{}/", id));
        self.send(self.http_client.delete(url), false).await?;
        Ok(())
    }

    async fn create_assignment(&self, record: &NewAssignment) -> Result<Assignment, ApiError> {
        info!("Creating assignment {} in group {}", record.title, record.group);
        let request = self.http_client.post(self.url("assignments/")).json(record);
        self.send_json(request).await
    }

    async fn edit_course(&self, record: &CourseEdit) -> Result<Course, ApiError> {
        info!("Editing course {}", record.id);
        let url = self.url(&format!("courses/{}/", record.id));
        self.send_json(self.http_client.put(url).json(record)).await
    }
}

#[cfg(test)]
#[path = "tests/backend.rs"]
mod tests;
