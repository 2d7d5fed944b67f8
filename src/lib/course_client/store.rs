//! The client's state tree.
//!
//! Every slice is changed only by its own [`Reducer`], a pure function of the previous
//! slice and an [`Action`]. [`StoreHandle`] is the one writer: it applies actions in the
//! order they are dispatched and publishes a revision number after each of them, so
//! views know when to render again.
use std::{
    mem,
    sync::{Arc, Mutex, PoisonError},
};

use log::debug;
use tokio::sync::watch;

use super::{
    error::ErrorPayload,
    models::{
        auth_model::{AuthResponse, User},
        course_model::{
            Assignment, AssignmentGroup, AssignmentGroupDetail, Course, CourseCollections,
            CourseId, GroupId,
        },
    },
    permissions::{Role, RoleIndex},
};

/// A description of a state change, produced when a remote call completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoginSucceeded(AuthResponse),
    LoginFailed,
    UserLoaded(User),
    AuthFailed,
    LogoutSucceeded,
    CoursesLoaded(CourseCollections),
    CourseEdited(Course),
    AssignmentGroupRequested(GroupId),
    AssignmentGroupLoaded(AssignmentGroupDetail),
    AssignmentGroupDeleted(GroupId),
    AssignmentCreated(Assignment),
    ErrorReported(ErrorPayload),
    MessageCreated(String),
}

impl Action {
    /// Name for logs; payloads may carry tokens.
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoginSucceeded(_) => "LOGIN_SUCCESS",
            Action::LoginFailed => "LOGIN_FAIL",
            Action::UserLoaded(_) => "USER_LOADED",
            Action::AuthFailed => "AUTH_ERROR",
            Action::LogoutSucceeded => "LOGOUT_SUCCESS",
            Action::CoursesLoaded(_) => "GET_COURSES",
            Action::CourseEdited(_) => "EDIT_COURSE",
            Action::AssignmentGroupRequested(_) => "GET_ASSIGNMENT_GROUP_START",
            Action::AssignmentGroupLoaded(_) => "GET_ASSIGNMENT_GROUP",
            Action::AssignmentGroupDeleted(_) => "DELETE_ASSIGNMENT_GROUP",
            Action::AssignmentCreated(_) => "CREATE_ASSIGNMENT",
            Action::ErrorReported(_) => "GET_ERRORS",
            Action::MessageCreated(_) => "CREATE_MESSAGE",
        }
    }

    fn ends_session(&self) -> bool {
        matches!(
            self,
            Action::LoginFailed | Action::AuthFailed | Action::LogoutSucceeded
        )
    }
}

pub trait Reducer: Sized {
    fn reduce(self, action: &Action) -> Self;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorsState {
    pub latest: Option<ErrorPayload>,
}

impl Reducer for ErrorsState {
    fn reduce(self, action: &Action) -> Self {
        match action {
            Action::ErrorReported(payload) => ErrorsState {
                latest: Some(payload.clone()),
            },
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesState {
    pub latest: Option<String>,
}

impl Reducer for MessagesState {
    fn reduce(self, action: &Action) -> Self {
        match action {
            Action::MessageCreated(msg) => MessagesState {
                latest: Some(msg.clone()),
            },
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub user: Option<User>,
}

impl Reducer for AuthState {
    fn reduce(self, action: &Action) -> Self {
        match action {
            Action::LoginSucceeded(auth) => AuthState {
                token: Some(auth.token.clone()),
                is_authenticated: true,
                user: Some(auth.user.clone()),
            },
            Action::UserLoaded(user) => AuthState {
                is_authenticated: true,
                user: Some(user.clone()),
                ..self
            },
            action if action.ends_session() => AuthState::default(),
            _ => self,
        }
    }
}

/// The viewer's courses. `revision` grows on every change of the collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursesState {
    pub collections: CourseCollections,
    pub revision: u64,
}

impl CoursesState {
    /// Drops repeated ids so that each course sits in exactly one partition,
    /// keeping the highest role.
    fn partitioned(mut collections: CourseCollections) -> CourseCollections {
        let mut seen = std::collections::HashSet::new();
        for list in [
            &mut collections.instructor_courses,
            &mut collections.ta_courses,
            &mut collections.student_courses,
        ] {
            list.retain(|course| seen.insert(course.id));
        }
        collections
    }
}

impl Reducer for CoursesState {
    fn reduce(self, action: &Action) -> Self {
        let revision = self.revision + 1;
        match action {
            Action::CoursesLoaded(collections) => CoursesState {
                collections: Self::partitioned(collections.clone()),
                revision,
            },
            Action::CourseEdited(edited) => {
                let mut collections = self.collections;
                for course in collections
                    .instructor_courses
                    .iter_mut()
                    .filter(|course| course.id == edited.id)
                {
                    *course = edited.clone();
                }
                CoursesState {
                    collections,
                    revision,
                }
            }
            action if action.ends_session() => CoursesState {
                collections: CourseCollections::default(),
                revision,
            },
            _ => self,
        }
    }
}

/// The assignment group of the current route, absent until its fetch completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentsState {
    pub assignment_group: Option<AssignmentGroup>,
    pub assignments: Vec<Assignment>,
}

impl Reducer for AssignmentsState {
    fn reduce(self, action: &Action) -> Self {
        match action {
            Action::AssignmentGroupRequested(_) => AssignmentsState::default(),
            Action::AssignmentGroupLoaded(detail) => AssignmentsState {
                assignment_group: Some(detail.group.clone()),
                assignments: detail.assignments.clone(),
            },
            Action::AssignmentGroupDeleted(id)
                if self.assignment_group.as_ref().map(|group| group.id) == Some(*id) =>
            {
                AssignmentsState::default()
            }
            Action::AssignmentCreated(assignment)
                if self.assignment_group.as_ref().map(|group| group.id)
                    == Some(assignment.group) =>
            {
                let mut assignments = self.assignments;
                assignments.push(assignment.clone());
                AssignmentsState {
                    assignments,
                    ..self
                }
            }
            action if action.ends_session() => AssignmentsState::default(),
            _ => self,
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub errors: ErrorsState,
    pub messages: MessagesState,
    pub auth: AuthState,
    pub courses: CoursesState,
    pub assignments: AssignmentsState,
    role_index: RoleIndex,
}

impl Store {
    pub fn apply(&mut self, action: &Action) {
        self.errors = mem::take(&mut self.errors).reduce(action);
        self.messages = mem::take(&mut self.messages).reduce(action);
        self.auth = mem::take(&mut self.auth).reduce(action);
        self.courses = mem::take(&mut self.courses).reduce(action);
        self.assignments = mem::take(&mut self.assignments).reduce(action);
        self.role_index
            .refresh(self.courses.revision, &self.courses.collections);
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated
    }

    pub fn role_for(&self, course_id: CourseId) -> Role {
        self.role_index.role(course_id)
    }

    pub fn role_index(&self) -> &RoleIndex {
        &self.role_index
    }

    /// The course record from the partition matching the viewer's role.
    pub fn course(&self, course_id: CourseId) -> Option<&Course> {
        let collections = &self.courses.collections;
        let list = match self.role_for(course_id) {
            Role::Instructor => &collections.instructor_courses,
            Role::Ta => &collections.ta_courses,
            Role::Student => &collections.student_courses,
            Role::None => return None,
        };
        list.iter().find(|course| course.id == course_id)
    }
}

#[derive(Debug)]
struct Shared {
    store: Mutex<Store>,
    revision: watch::Sender<u64>,
}

/// Cloneable handle to one [`Store`], passed to whoever needs to read or dispatch.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    shared: Arc<Shared>,
}

impl Default for StoreHandle {
    fn default() -> Self {
        StoreHandle::new(Store::default())
    }
}

impl StoreHandle {
    pub fn new(store: Store) -> Self {
        let (revision, _) = watch::channel(0);
        StoreHandle {
            shared: Arc::new(Shared {
                store: Mutex::new(store),
                revision,
            }),
        }
    }

    pub fn dispatch(&self, action: Action) {
        debug!("Dispatching {}", action.name());
        self.shared
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(&action);
        self.shared.revision.send_modify(|revision| *revision += 1);
    }

    pub fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        let store = self
            .shared
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&*store)
    }

    /// Number of actions applied so far.
    pub fn revision(&self) -> u64 {
        *self.shared.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
