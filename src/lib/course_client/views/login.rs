use std::{fmt, str::FromStr};

use super::UnknownField;
use crate::course_client::{
    backend::CourseBackend, intents::Intents, routes::Route, store::Store, tasks::TaskScope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

impl FromStr for LoginField {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "username" => Ok(LoginField::Username),
            "password" => Ok(LoginField::Password),
            other => Err(UnknownField(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginScreen {
    Redirect(Route),
    Form { username: String, password_len: usize },
}

impl fmt::Display for LoginScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginScreen::Redirect(route) => write!(f, "Redirecting to {}", route),
            LoginScreen::Form {
                username,
                password_len,
            } => {
                writeln!(f, "Login")?;
                writeln!(f, "WUSTL Key: {}", username)?;
                writeln!(f, "Password: {}", "*".repeat(*password_len))?;
                write!(f, "Don't have an account? Register at {}", Route::Register)
            }
        }
    }
}

#[derive(Default)]
pub struct LoginView {
    username: String,
    password: String,
    scope: TaskScope,
}

impl fmt::Debug for LoginView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginView")
            .field("username", &self.username)
            .field("password", &"*".repeat(self.password.chars().count()))
            .field("scope", &self.scope)
            .finish()
    }
}

impl LoginView {
    pub fn new() -> Self {
        LoginView::default()
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }

    pub fn on_change(&mut self, field: LoginField, value: &str) {
        match field {
            LoginField::Username => self.username = value.to_owned(),
            LoginField::Password => self.password = value.to_owned(),
        }
    }

    pub fn render(&self, store: &Store) -> LoginScreen {
        if store.is_authenticated() {
            return LoginScreen::Redirect(Route::Home);
        }
        LoginScreen::Form {
            username: self.username.clone(),
            password_len: self.password.chars().count(),
        }
    }

    /// Makes a single login attempt with the current form values.
    pub async fn on_submit<B: CourseBackend>(&self, intents: &Intents<B>) -> bool {
        self.scope
            .run(intents.login(&self.username, &self.password))
            .await
            .flatten()
            .is_some()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}
