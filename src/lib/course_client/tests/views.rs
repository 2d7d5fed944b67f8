use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, Mutex,
};

use tokio::sync::Notify;

use super::{
    assignment_group::{
        AssignmentField, AssignmentGroupScreen, AssignmentGroupView, AssignmentRow, GroupPhase,
        EMPTY_GROUP,
    },
    edit_course::{CourseField, EditCourseScreen, EditCourseView, EditPhase},
    login::{LoginField, LoginScreen, LoginView},
};
use crate::course_client::{
    backend::CourseBackend,
    error::ApiError,
    intents::Intents,
    models::{
        auth_model::{AuthResponse, User},
        course_model::{
            Assignment, AssignmentGroup, AssignmentGroupDetail, Course, CourseCollections,
            CourseEdit, GroupId, NewAssignment,
        },
    },
    routes::Route,
    store::StoreHandle,
};

#[derive(Default)]
struct FakeBackend {
    collections: CourseCollections,
    groups: Vec<AssignmentGroupDetail>,
    reject_create: bool,
    reject_delete: bool,
    fetch_error: Option<ApiError>,
    hold: Option<Arc<Notify>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: AtomicU32,
}

impl FakeBackend {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl CourseBackend for FakeBackend {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.record("login");
        if password != "pass" {
            return Err(ApiError::Auth("Incorrect Credentials".to_string()));
        }
        Ok(AuthResponse {
            user: User {
                id: 1,
                username: username.to_string(),
            },
            token: "token".to_string(),
        })
    }

    async fn load_user(&self) -> Result<User, ApiError> {
        self.record("load_user");
        Err(ApiError::Auth("no session".to_string()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        Ok(())
    }

    async fn get_courses(&self) -> Result<CourseCollections, ApiError> {
        self.record("get_courses");
        Ok(self.collections.clone())
    }

    async fn get_assignment_group(&self, id: GroupId) -> Result<AssignmentGroupDetail, ApiError> {
        self.record("get_assignment_group");
        if let Some(err) = &self.fetch_error {
            return Err(err.clone());
        }
        self.groups
            .iter()
            .find(|detail| detail.group.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("group {}", id)))
    }

    async fn delete_assignment_group(&self, _id: GroupId) -> Result<(), ApiError> {
        self.record("delete_assignment_group");
        if self.reject_delete {
            return Err(ApiError::Transport("503 Service Unavailable".to_string()));
        }
        Ok(())
    }

    async fn create_assignment(&self, record: &NewAssignment) -> Result<Assignment, ApiError> {
        self.record("create_assignment");
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if self.reject_create {
            return Err(ApiError::Validation("title: already exists".to_string()));
        }
        Ok(Assignment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 100,
            group: record.group,
            title: record.title.clone(),
            points: record.points,
            due_date: record.due_date,
        })
    }

    async fn edit_course(&self, record: &CourseEdit) -> Result<Course, ApiError> {
        self.record("edit_course");
        Ok(Course {
            id: record.id,
            course_id: record.course_id.clone(),
            title: record.title.clone(),
        })
    }
}

fn course(id: u32, code: &str) -> Course {
    Course {
        id,
        course_id: code.to_string(),
        title: format!("{} title", code),
    }
}

fn backend() -> FakeBackend {
    FakeBackend {
        collections: CourseCollections {
            instructor_courses: vec![course(1, "CSE131")],
            ta_courses: vec![course(2, "CSE247")],
            student_courses: vec![course(3, "CSE330")],
        },
        groups: vec![
            AssignmentGroupDetail {
                group: AssignmentGroup {
                    id: 5,
                    course: 1,
                    title: "Labs".to_string(),
                },
                assignments: Vec::new(),
            },
            AssignmentGroupDetail {
                group: AssignmentGroup {
                    id: 6,
                    course: 3,
                    title: "Quizzes".to_string(),
                },
                assignments: Vec::new(),
            },
        ],
        ..Default::default()
    }
}

async fn session(backend: FakeBackend) -> Intents<FakeBackend> {
    let intents = Intents::new(backend, StoreHandle::default());
    assert!(intents.login("warhol", "pass").await.is_some());
    assert!(intents.load_courses().await);
    intents
}

fn render_group(view: &AssignmentGroupView, intents: &Intents<FakeBackend>) -> AssignmentGroupScreen {
    intents.store().read(|store| view.render(store))
}

fn fill_lab0(view: &mut AssignmentGroupView) {
    view.on_change(AssignmentField::Title, "Lab0");
    view.on_change("points".parse().unwrap(), "10");
    view.on_change("dueDate".parse().unwrap(), "2024-01-01T00:00");
}

#[tokio::test]
async fn login_success_redirects_home() {
    let intents = Intents::new(backend(), StoreHandle::default());
    let mut view = LoginView::new();
    view.on_change(LoginField::Username, "warhol");
    view.on_change("password".parse().unwrap(), "pass");
    assert!(matches!(
        intents.store().read(|store| view.render(store)),
        LoginScreen::Form { .. }
    ));

    assert!(view.on_submit(&intents).await);
    assert!(intents.store().read(|store| store.is_authenticated()));
    assert_eq!(
        intents.store().read(|store| view.render(store)),
        LoginScreen::Redirect(Route::Home)
    );
}

#[tokio::test]
async fn login_failure_reports_auth_error_once() {
    let intents = Intents::new(backend(), StoreHandle::default());
    let mut view = LoginView::new();
    view.on_change(LoginField::Username, "warhol");
    view.on_change(LoginField::Password, "wrong");

    assert!(!view.on_submit(&intents).await);
    assert_eq!(intents.backend().calls(), ["login"]);
    let error = intents.store().read(|store| store.errors.latest.clone()).unwrap();
    assert_eq!(error.status, 401);
    assert_eq!(
        intents.store().read(|store| view.render(store)),
        LoginScreen::Form {
            username: "warhol".to_string(),
            password_len: 5
        }
    );
}

#[tokio::test]
async fn instructor_adds_first_assignment_to_empty_group() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 5);
    assert_eq!(render_group(&view, &intents), AssignmentGroupScreen::Loading);

    assert!(view.mount(&intents).await);
    let AssignmentGroupScreen::Loaded(page) = render_group(&view, &intents) else {
        panic!("group should be loaded");
    };
    assert_eq!(page.heading, "CSE131: Labs");
    assert!(page.rows.is_empty());
    assert!(render_group(&view, &intents).to_string().contains(EMPTY_GROUP));

    fill_lab0(&mut view);
    assert!(view.on_submit(&intents).await);

    let AssignmentGroupScreen::Loaded(page) = render_group(&view, &intents) else {
        panic!("group should stay loaded");
    };
    assert_eq!(
        page.rows,
        vec![AssignmentRow {
            title: "Lab0".to_string(),
            points: 10
        }]
    );
    assert!(view.form().is_empty());
    assert_eq!(page.add_form, Some(Default::default()));
}

#[tokio::test]
async fn rejected_assignment_keeps_form() {
    let intents = session(FakeBackend {
        reject_create: true,
        ..backend()
    })
    .await;
    let mut view = AssignmentGroupView::new(1, 5);
    view.mount(&intents).await;
    fill_lab0(&mut view);
    let before = view.form().clone();

    assert!(!view.on_submit(&intents).await);
    assert_eq!(view.form(), &before);
    let error = intents.store().read(|store| store.errors.latest.clone()).unwrap();
    assert_eq!(error.status, 400);
}

#[tokio::test]
async fn unparsable_points_never_reach_backend() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 5);
    view.mount(&intents).await;
    fill_lab0(&mut view);
    view.on_change(AssignmentField::Points, "40000");

    assert!(!view.on_submit(&intents).await);
    assert!(!intents.backend().calls().contains(&"create_assignment"));
    assert_eq!(view.form().points, "40000");
    assert!(intents.store().read(|store| store.errors.latest.is_some()));
}

#[tokio::test]
async fn students_see_no_form_and_cannot_create() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(3, 6);
    view.mount(&intents).await;
    let AssignmentGroupScreen::Loaded(page) = render_group(&view, &intents) else {
        panic!("students may view the group");
    };
    assert!(page.add_form.is_none());
    assert!(page.edit_route.is_none());

    fill_lab0(&mut view);
    assert!(!view.on_submit(&intents).await);
    assert!(!intents.store().read(|store| view.on_request_delete(store)));
    assert!(!view.on_confirm_delete(&intents).await);
    assert!(!intents.backend().calls().contains(&"create_assignment"));
    assert!(!intents.backend().calls().contains(&"delete_assignment_group"));
}

#[tokio::test]
async fn delete_fires_only_after_confirmation() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 5);
    view.mount(&intents).await;

    assert!(!view.on_confirm_delete(&intents).await);
    assert!(!intents.backend().calls().contains(&"delete_assignment_group"));

    assert!(intents.store().read(|store| view.on_request_delete(store)));
    assert!(!intents.backend().calls().contains(&"delete_assignment_group"));
    assert!(render_group(&view, &intents).to_string().contains("Are you sure"));

    assert!(view.on_confirm_delete(&intents).await);
    assert!(intents.backend().calls().contains(&"delete_assignment_group"));
    assert_eq!(
        intents.store().read(|store| view.phase(store)),
        GroupPhase::Deleted
    );
    assert_eq!(
        render_group(&view, &intents),
        AssignmentGroupScreen::Redirect(Route::CourseView(1))
    );
}

#[tokio::test]
async fn cancelled_confirmation_blocks_delete() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 5);
    view.mount(&intents).await;

    intents.store().read(|store| view.on_request_delete(store));
    assert!(view.is_confirming());
    view.on_cancel_delete();
    assert!(!view.is_confirming());
    assert!(!view.on_confirm_delete(&intents).await);
    assert!(!intents.backend().calls().contains(&"delete_assignment_group"));
}

#[tokio::test]
async fn course_without_role_is_denied_whether_or_not_group_exists() {
    let intents = session(backend()).await;
    let mut existing = AssignmentGroupView::new(9, 5);
    let mut missing = AssignmentGroupView::new(9, 77);
    assert_eq!(render_group(&existing, &intents), AssignmentGroupScreen::Denied);

    existing.mount(&intents).await;
    assert_eq!(render_group(&existing, &intents), AssignmentGroupScreen::Denied);
    missing.mount(&intents).await;
    assert_eq!(render_group(&missing, &intents), AssignmentGroupScreen::Denied);
}

#[tokio::test]
async fn group_of_another_course_is_denied() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 6);
    view.mount(&intents).await;
    assert_eq!(render_group(&view, &intents), AssignmentGroupScreen::Denied);
}

#[tokio::test]
async fn missing_or_forbidden_group_is_denied() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 77);
    assert!(!view.mount(&intents).await);
    assert!(view.fetch_failed());
    assert_eq!(render_group(&view, &intents), AssignmentGroupScreen::Denied);
    let error = intents.store().read(|store| store.errors.latest.clone()).unwrap();
    assert_eq!(error.status, 404);

    let intents = session(FakeBackend {
        fetch_error: Some(ApiError::Permission("not yours".to_string())),
        ..backend()
    })
    .await;
    let mut view = AssignmentGroupView::new(1, 5);
    assert!(!view.mount(&intents).await);
    assert_eq!(render_group(&view, &intents), AssignmentGroupScreen::Denied);
}

#[tokio::test]
async fn failed_request_stays_loading() {
    let intents = session(FakeBackend {
        fetch_error: Some(ApiError::Transport("connection reset".to_string())),
        ..backend()
    })
    .await;
    let mut view = AssignmentGroupView::new(1, 5);
    assert!(!view.mount(&intents).await);
    assert!(view.fetch_failed());
    assert_eq!(render_group(&view, &intents), AssignmentGroupScreen::Loading);
    let error = intents.store().read(|store| store.errors.latest.clone()).unwrap();
    assert_eq!(error.status, 0);
}

#[tokio::test]
async fn nothing_changes_before_the_group_loads() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 5);
    assert_eq!(
        intents.store().read(|store| view.phase(store)),
        GroupPhase::Loading
    );

    assert!(!intents.store().read(|store| view.on_request_delete(store)));
    assert!(!view.on_confirm_delete(&intents).await);
    fill_lab0(&mut view);
    assert!(!view.on_submit(&intents).await);
    assert_eq!(intents.backend().calls(), ["login", "get_courses"]);
    assert_eq!(view.form().title, "Lab0");
}

#[tokio::test]
async fn group_of_another_course_cannot_be_changed() {
    let intents = session(backend()).await;
    let mut view = AssignmentGroupView::new(1, 6);
    assert!(view.mount(&intents).await);
    assert_eq!(
        intents.store().read(|store| view.phase(store)),
        GroupPhase::Denied
    );

    assert!(!intents.store().read(|store| view.on_request_delete(store)));
    assert!(!view.on_confirm_delete(&intents).await);
    fill_lab0(&mut view);
    assert!(!view.on_submit(&intents).await);
    let calls = intents.backend().calls();
    assert!(!calls.contains(&"delete_assignment_group"));
    assert!(!calls.contains(&"create_assignment"));
}

#[tokio::test]
async fn failed_delete_keeps_confirmation_open() {
    let intents = session(FakeBackend {
        reject_delete: true,
        ..backend()
    })
    .await;
    let mut view = AssignmentGroupView::new(1, 5);
    view.mount(&intents).await;

    assert!(intents.store().read(|store| view.on_request_delete(store)));
    assert!(!view.on_confirm_delete(&intents).await);
    assert!(view.is_confirming());
    assert_eq!(
        intents.store().read(|store| view.phase(store)),
        GroupPhase::Loaded
    );
    assert!(render_group(&view, &intents).to_string().contains("Are you sure"));
    let error = intents.store().read(|store| store.errors.latest.clone()).unwrap();
    assert_eq!(error.status, 0);
}

#[test]
fn login_debug_masks_password() {
    let mut view = LoginView::new();
    view.on_change(LoginField::Username, "warhol");
    view.on_change(LoginField::Password, "campbell");
    let debug = format!("{:?}", view);
    assert!(debug.contains("warhol"));
    assert!(!debug.contains("campbell"));
}

#[tokio::test]
async fn protected_views_redirect_to_login_when_signed_out() {
    let intents = Intents::new(backend(), StoreHandle::default());
    let view = AssignmentGroupView::new(1, 5);
    assert_eq!(
        render_group(&view, &intents),
        AssignmentGroupScreen::Redirect(Route::Login)
    );
    let edit = intents.store().read(|store| EditCourseView::new(1, store));
    assert_eq!(
        intents.store().read(|store| edit.render(store)),
        EditCourseScreen::Redirect {
            to: Route::Login,
            cause: EditPhase::Unauthorized
        }
    );
}

#[tokio::test]
async fn teardown_before_completion_leaves_store_and_form_alone() {
    let hold = Arc::new(Notify::new());
    let intents = session(FakeBackend {
        hold: Some(hold.clone()),
        ..backend()
    })
    .await;
    let mut view = AssignmentGroupView::new(1, 5);
    view.mount(&intents).await;
    fill_lab0(&mut view);
    let revision = intents.store().revision();

    let teardown = view.scope().clone();
    let (submitted, _) = tokio::join!(view.on_submit(&intents), async {
        teardown.teardown();
        hold.notify_one();
    });

    assert!(!submitted);
    assert_eq!(intents.store().revision(), revision);
    assert!(intents.store().read(|store| store.assignments.assignments.is_empty()));
    assert_eq!(view.form().title, "Lab0");
}

#[tokio::test]
async fn edit_course_is_prefilled_and_render_dispatches_nothing() {
    let intents = session(backend()).await;
    let view = intents.store().read(|store| EditCourseView::new(1, store));
    let revision = intents.store().revision();
    let calls = intents.backend().calls().len();

    let first = intents.store().read(|store| view.render(store));
    let second = intents.store().read(|store| view.render(store));
    assert_eq!(first, second);
    assert_eq!(
        first,
        EditCourseScreen::Form {
            course_id: "CSE131".to_string(),
            title: "CSE131 title".to_string()
        }
    );
    assert_eq!(intents.store().revision(), revision);
    assert_eq!(intents.backend().calls().len(), calls);
}

#[tokio::test]
async fn edit_course_completes_and_updates_store() {
    let intents = session(backend()).await;
    let mut view = intents.store().read(|store| EditCourseView::new(1, store));
    view.on_change("title".parse().unwrap(), "Intro to Computer Science");
    view.on_change(CourseField::CourseId, "CSE 131");

    assert!(view.on_submit(&intents).await);
    assert_eq!(
        intents.store().read(|store| view.render(store)),
        EditCourseScreen::Redirect {
            to: Route::CourseView(1),
            cause: EditPhase::Completed
        }
    );
    let course = intents
        .store()
        .read(|store| store.course(1).cloned())
        .unwrap();
    assert_eq!(course.course_id, "CSE 131");
    assert_eq!(course.title, "Intro to Computer Science");
    assert!(!view.on_submit(&intents).await);
}

#[tokio::test]
async fn non_instructor_edit_is_unauthorized() {
    let intents = session(backend()).await;
    let mut view = intents.store().read(|store| EditCourseView::new(2, store));
    assert_eq!(
        intents.store().read(|store| view.phase(store)),
        EditPhase::Unauthorized
    );
    assert_eq!(view.record().course_id, "");
    assert!(!view.on_submit(&intents).await);
    assert!(!intents.backend().calls().contains(&"edit_course"));
    assert_eq!(
        intents.store().read(|store| view.render(store)),
        EditCourseScreen::Redirect {
            to: Route::CourseView(2),
            cause: EditPhase::Unauthorized
        }
    );
}

#[tokio::test]
async fn logout_clears_roles() {
    let intents = session(backend()).await;
    assert!(intents.logout().await);
    assert!(!intents.store().read(|store| store.is_authenticated()));
    let view = AssignmentGroupView::new(1, 5);
    assert_eq!(
        render_group(&view, &intents),
        AssignmentGroupScreen::Redirect(Route::Login)
    );
}

#[test]
fn unknown_field_names_are_rejected() {
    assert!("grade".parse::<AssignmentField>().is_err());
    assert!("id".parse::<CourseField>().is_err());
    assert!("email".parse::<LoginField>().is_err());
}
