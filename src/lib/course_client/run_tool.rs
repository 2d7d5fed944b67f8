use std::{error::Error, io::Write, path::Path};

use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use futures::future;
use log::{info, warn};

use super::{
    backend::CourseBackend,
    intents::Intents,
    models::{Command, Config},
    permissions::Role,
    store::{Store, StoreHandle},
    views::{
        assignment_group::{AssignmentField, AssignmentGroupView},
        edit_course::{CourseField, EditCourseView},
        login::{LoginField, LoginView},
    },
};

/// Reads `config.json`, letting `CM_`-prefixed environment variables override it.
pub fn read_config(config_json_path: &Path) -> Result<Config, Box<dyn Error>> {
    let config: Config = Figment::new()
        .merge(Json::file(config_json_path))
        .merge(Env::prefixed("CM_"))
        .extract()?;
    info!(
        "Read config.json from {}",
        std::path::absolute(config_json_path)?.display()
    );
    Ok(config)
}

/// Global error and message lines, as shown above every screen.
pub fn banner(store: &Store) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(error) = &store.errors.latest {
        lines.push(format!("Error: {}", error.msg));
    }
    if let Some(msg) = &store.messages.latest {
        lines.push(msg.clone());
    }
    lines
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Instructor => "instructor",
        Role::Ta => "TA",
        Role::Student => "student",
        Role::None => "none",
    }
}

/// Logs in with the configured account and drives the screen picked by `command`,
/// writing what it renders into `out`.
pub async fn run<B: CourseBackend, W: Write>(
    backend: B,
    command: &Command,
    config: &Config,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let store = StoreHandle::default();
    let intents = Intents::new(backend, store.clone());

    let mut login = LoginView::new();
    login.on_change(LoginField::Username, &config.username);
    login.on_change(LoginField::Password, &config.password);
    if !login.on_submit(&intents).await {
        for line in store.read(banner) {
            writeln!(out, "{}", line)?;
        }
        return Err(format!("could not log in as {}", config.username).into());
    }
    writeln!(out, "{}", store.read(|store| login.render(store)))?;
    login.teardown();

    match command {
        Command::Courses => {
            intents.load_courses().await;
            let rows = store.read(|store| {
                let collections = &store.courses.collections;
                collections
                    .instructor_courses
                    .iter()
                    .chain(&collections.ta_courses)
                    .chain(&collections.student_courses)
                    .map(|course| {
                        format!(
                            "{:>6} {:<12} {:<40} {}",
                            course.id,
                            course.course_id,
                            course.title,
                            role_name(store.role_for(course.id))
                        )
                    })
                    .collect::<Vec<_>>()
            });
            info!("Listing {} course(s)", rows.len());
            for row in rows {
                writeln!(out, "{}", row)?;
            }
        }
        Command::Group { course, group } => {
            let mut view = AssignmentGroupView::new(*course, *group);
            future::join(intents.load_courses(), view.mount(&intents)).await;
            writeln!(out, "{}", store.read(|store| view.render(store)))?;
            view.teardown();
        }
        Command::AddAssignment {
            course,
            group,
            title,
            points,
            due_date,
        } => {
            let mut view = AssignmentGroupView::new(*course, *group);
            future::join(intents.load_courses(), view.mount(&intents)).await;
            view.on_change(AssignmentField::Title, title);
            view.on_change(AssignmentField::Points, points);
            view.on_change(AssignmentField::DueDate, due_date);
            if !view.on_submit(&intents).await {
                warn!("Assignment {} was not created", title);
            }
            writeln!(out, "{}", store.read(|store| view.render(store)))?;
            view.teardown();
        }
        Command::DeleteGroup { course, group, yes } => {
            let mut view = AssignmentGroupView::new(*course, *group);
            future::join(intents.load_courses(), view.mount(&intents)).await;
            store.read(|store| view.on_request_delete(store));
            if *yes {
                view.on_confirm_delete(&intents).await;
            } else {
                info!("Deletion of group {} needs --yes", group);
            }
            writeln!(out, "{}", store.read(|store| view.render(store)))?;
            view.teardown();
        }
        Command::EditCourse {
            id,
            course_id,
            title,
        } => {
            intents.load_courses().await;
            let mut view = store.read(|store| EditCourseView::new(*id, store));
            if let Some(course_id) = course_id {
                view.on_change(CourseField::CourseId, course_id);
            }
            if let Some(title) = title {
                view.on_change(CourseField::Title, title);
            }
            view.on_submit(&intents).await;
            writeln!(out, "{}", store.read(|store| view.render(store)))?;
            view.teardown();
        }
    }

    for line in store.read(banner) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
