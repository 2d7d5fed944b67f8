use log::{info, warn};

use super::{
    backend::CourseBackend,
    error::{ApiError, ErrorPayload},
    models::{
        auth_model::User,
        course_model::{Assignment, AssignmentGroup, Course, CourseEdit, GroupId, NewAssignment},
    },
    store::{Action, StoreHandle},
};

/// Remote calls whose results are folded into the store.
///
/// Every intent reports failures through the `errors` slice and answers `None`/`false`.
/// The group fetch also hands the error back, so a view can tell a missing or forbidden
/// group from a failed request.
pub struct Intents<B> {
    backend: B,
    store: StoreHandle,
}

impl<B: CourseBackend> Intents<B> {
    pub fn new(backend: B, store: StoreHandle) -> Self {
        Intents { backend, store }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Puts an error into the `errors` slice without calling the backend.
    pub fn report(&self, err: &ApiError) {
        warn!("{}", err);
        self.store.dispatch(Action::ErrorReported(ErrorPayload::from(err)));
    }

    fn message(&self, msg: &str) {
        self.store.dispatch(Action::MessageCreated(msg.to_owned()));
    }

    pub async fn login(&self, username: &str, password: &str) -> Option<User> {
        match self.backend.login(username, password).await {
            Ok(auth) => {
                info!("Logged in as {}", auth.user.username);
                let user = auth.user.clone();
                self.store.dispatch(Action::LoginSucceeded(auth));
                Some(user)
            }
            Err(err) => {
                self.report(&err);
                self.store.dispatch(Action::LoginFailed);
                None
            }
        }
    }

    pub async fn load_user(&self) -> Option<User> {
        match self.backend.load_user().await {
            Ok(user) => {
                self.store.dispatch(Action::UserLoaded(user.clone()));
                Some(user)
            }
            Err(err) => {
                self.report(&err);
                self.store.dispatch(Action::AuthFailed);
                None
            }
        }
    }

    pub async fn logout(&self) -> bool {
        match self.backend.logout().await {
            Ok(()) => {
                self.store.dispatch(Action::LogoutSucceeded);
                true
            }
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    pub async fn load_courses(&self) -> bool {
        match self.backend.get_courses().await {
            Ok(collections) => {
                info!(
                    "Loaded {} instructor, {} TA and {} student course(s)",
                    collections.instructor_courses.len(),
                    collections.ta_courses.len(),
                    collections.student_courses.len()
                );
                self.store.dispatch(Action::CoursesLoaded(collections));
                true
            }
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    pub async fn get_assignment_group(&self, id: GroupId) -> Result<AssignmentGroup, ApiError> {
        self.store.dispatch(Action::AssignmentGroupRequested(id));
        match self.backend.get_assignment_group(id).await {
            Ok(detail) => {
                let group = detail.group.clone();
                self.store.dispatch(Action::AssignmentGroupLoaded(detail));
                Ok(group)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    pub async fn delete_assignment_group(&self, id: GroupId) -> bool {
        match self.backend.delete_assignment_group(id).await {
            Ok(()) => {
                self.store.dispatch(Action::AssignmentGroupDeleted(id));
                self.message("Assignment group deleted");
                true
            }
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    pub async fn create_assignment(&self, record: &NewAssignment) -> Option<Assignment> {
        match self.backend.create_assignment(record).await {
            Ok(assignment) => {
                self.store
                    .dispatch(Action::AssignmentCreated(assignment.clone()));
                self.message("Assignment created");
                Some(assignment)
            }
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    pub async fn edit_course(&self, record: &CourseEdit) -> Option<Course> {
        match self.backend.edit_course(record).await {
            Ok(course) => {
                self.store.dispatch(Action::CourseEdited(course.clone()));
                self.message("Course updated");
                Some(course)
            }
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }
}
