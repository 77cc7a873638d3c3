//! Roster CLI
//!
//! Terminal front-end for the student and department admin backend.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use roster::{
    controllers::{
        DepartmentForm, DialogState, FormStatus, ListController, ListResource, Navigation,
        StudentField, StudentForm, SubmitOutcome,
    },
    error::{AppError, Result},
    models::{Config, Department, ExportFormat, Student},
    query::{QueryState, StatusFilter},
    routes::Route,
    services::{HttpGateway, RemoteGateway},
    storage::{Theme, ThemeStore, theme},
    utils::{log as console, table},
};

/// Roster - Student & Department Administration
#[derive(Parser, Debug)]
#[command(
    name = "roster",
    version,
    about = "Student and department administration client"
)]
struct Cli {
    /// Path to config file (default: {storage_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to storage directory for client state
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Student records
    Students {
        #[command(subcommand)]
        action: StudentCommand,
    },

    /// Department records
    Departments {
        #[command(subcommand)]
        action: DepartmentCommand,
    },

    /// List courses, optionally of one department
    Courses {
        #[arg(short, long)]
        department: Option<i64>,
    },

    /// Light/dark preference
    Theme {
        #[command(subcommand)]
        action: ThemeCommand,
    },

    /// Resolve a client route
    Route { path: String },

    /// Validate configuration file
    Validate,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Page size (must be one of the configured options)
    #[arg(long)]
    size: Option<u32>,

    /// Sort column; repeat to toggle direction like a header click
    #[arg(long)]
    sort: Vec<String>,

    /// Filter text
    #[arg(short, long, default_value = "")]
    filter: String,

    /// all, active or inactive
    #[arg(long)]
    status: Option<StatusFilter>,
}

#[derive(Subcommand, Debug)]
enum StudentCommand {
    List(ListArgs),

    Show { student_id: String },

    /// Download the filtered list as a file
    Export {
        /// xlsx, csv or pdf
        format: ExportFormat,

        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        #[arg(short, long, default_value = "")]
        filter: String,

        #[arg(long, default_value = "active")]
        status: StatusFilter,
    },

    Create {
        student_id: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: Option<i64>,
        /// Course ids, comma separated
        #[arg(long, value_delimiter = ',')]
        courses: Vec<i64>,
    },

    Edit {
        student_id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Changing the department clears the course selection
        #[arg(long)]
        department: Option<i64>,
        #[arg(long, value_delimiter = ',')]
        courses: Option<Vec<i64>>,
    },

    /// Activate or deactivate a student
    Toggle {
        student_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum DepartmentCommand {
    List(ListArgs),

    /// Active departments (as offered in the student form)
    Active,

    Show { id: i64 },

    Create {
        name: String,
        /// Course as `name` or `name:description`; repeatable
        #[arg(long = "course")]
        courses: Vec<String>,
    },

    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Activate or deactivate a department and its courses
    Toggle {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    Show,
    Toggle,
    Set { theme: Theme },
}

/// Initialize logging based on verbosity flag.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.storage_dir.join("config.toml"));
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        Config::load(&config_path)
            .map(|config| config.logging.level)
            .unwrap_or_else(|_| "info".to_string())
    };
    init_logging(&level);

    let config = Config::load_or_default(&config_path);
    log::debug!("Using configuration from {}", config_path.display());

    match cli.command {
        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            console::success("Config OK");
        }

        Command::Route { path } => {
            let route = Route::parse(&path);
            console::summary(
                route.title(),
                &[
                    ("Path", route.to_string()),
                    ("Returns to", route.list_route().to_string()),
                ],
            );
        }

        Command::Theme { action } => {
            let fallback = theme::os_preference().unwrap_or_default();
            let mut store = ThemeStore::load(config.theme_path(&cli.storage_dir), fallback).await;
            match action {
                ThemeCommand::Show => {}
                ThemeCommand::Toggle => {
                    store.toggle().await?;
                }
                ThemeCommand::Set { theme } => {
                    store.set(theme).await?;
                }
            }
            println!("{}", store.current());
        }

        Command::Courses { department } => {
            let gateway = HttpGateway::from_config(&config.api)?;
            let courses = gateway.list_courses(department).await?;
            println!("{}", table::courses_table(&courses));
        }

        Command::Students { action } => {
            let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::from_config(&config.api)?);
            run_students(action, gateway, &config).await?;
        }

        Command::Departments { action } => {
            let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::from_config(&config.api)?);
            run_departments(action, gateway, &config).await?;
        }
    }

    Ok(())
}

/// Build the query a list view would reach through the same interactions.
fn list_query(args: &ListArgs, mut query: QueryState, config: &Config) -> Result<QueryState> {
    if let Some(size) = args.size {
        if !config.list.page_size_options.contains(&size) {
            return Err(AppError::validation(format!(
                "page size must be one of {:?}",
                config.list.page_size_options
            )));
        }
        query.set_size(size);
    }
    if let Some(status) = args.status {
        query.set_status(status);
    }
    query.set_filter(args.filter.trim());
    for column in &args.sort {
        query.toggle_sort(column);
    }
    query.set_page(args.page);
    Ok(query)
}

/// Fetch one page and print it, or the view's error.
async fn show_list<E: ListResource>(
    gateway: Arc<dyn RemoteGateway>,
    query: QueryState,
    render: fn(&[E]) -> comfy_table::Table,
    title: &str,
) -> Result<()> {
    let mut controller = ListController::<E>::new(gateway, query);
    controller.refresh().await;
    let view = controller.view();

    if let Some(error) = &view.error {
        console::failure(error);
        return Err(AppError::reported(error));
    }

    console::header(title);
    println!("{}", render(&view.items));
    let query = controller.query();
    console::summary(
        title,
        &[
            ("Total", view.total_elements.to_string()),
            (
                "Page",
                format!("{} of {}", query.page + 1, view.total_pages.max(1)),
            ),
            ("Sort", format!("{} {}", query.sort_by, query.sort_dir)),
            ("Status", query.status.as_str().to_string()),
        ],
    );
    Ok(())
}

/// Ask the user to confirm, unless `--yes` was given.
fn confirm(title: &str, message: &str, yes: bool) -> Result<bool> {
    console::header(title);
    println!("{}", message);
    if yes {
        return Ok(true);
    }
    print!("Proceed? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Gate a status toggle behind the confirmation prompt.
async fn toggle_with_confirmation<E: ListResource>(
    gateway: Arc<dyn RemoteGateway>,
    item: E,
    yes: bool,
) -> Result<Option<E>> {
    let mut dialog = DialogState::default();
    dialog.open(item.toggle_prompt(), item);

    let Some(prompt) = dialog.prompt().cloned() else {
        return Ok(None);
    };
    if !confirm(&prompt.title, &prompt.message, yes)? {
        dialog.cancel();
        console::sub_item("Cancelled");
        return Ok(None);
    }
    match dialog.confirm() {
        Some(item) => Ok(Some(E::toggle_status(gateway, item).await?)),
        None => Ok(None),
    }
}

/// Report a submit outcome; after a save, wait out the redirect and show the list.
async fn finish_submit(
    outcome: SubmitOutcome,
    status: &FormStatus,
    gateway: Arc<dyn RemoteGateway>,
    config: &Config,
) -> Result<()> {
    console::form_status(status);
    match outcome {
        SubmitOutcome::Invalid => Err(AppError::validation("form has invalid fields")),
        SubmitOutcome::Rejected(message) => Err(AppError::reported(message)),
        SubmitOutcome::Saved(Navigation { route, after }) => {
            tokio::time::sleep(after).await;
            let size = config.list.page_size;
            match route {
                Route::Departments => {
                    show_list::<Department>(
                        gateway,
                        QueryState::departments(size),
                        table::departments_table,
                        route.title(),
                    )
                    .await
                }
                _ => {
                    show_list::<Student>(
                        gateway,
                        QueryState::students(size),
                        table::students_table,
                        route.title(),
                    )
                    .await
                }
            }
        }
    }
}

fn print_student_errors(form: &StudentForm) {
    for which in StudentField::ALL {
        for error in form.field(which).visible_errors() {
            console::failure(&format!("{}: {}", which.label(), error));
        }
    }
    if form.department_touched() && form.department_error() {
        console::failure("Department: This field is required.");
    }
}

async fn run_students(
    action: StudentCommand,
    gateway: Arc<dyn RemoteGateway>,
    config: &Config,
) -> Result<()> {
    let delay = config.form.redirect_delay();
    match action {
        StudentCommand::List(args) => {
            let query = list_query(&args, QueryState::students(config.list.page_size), config)?;
            show_list::<Student>(gateway, query, table::students_table, "Student List").await
        }

        StudentCommand::Show { student_id } => {
            let student = gateway.get_student(&student_id).await?;
            print_student(&student);
            Ok(())
        }

        StudentCommand::Export {
            format,
            out,
            filter,
            status,
        } => {
            let mut query = QueryState::students(config.list.page_size);
            query.set_filter(filter.trim());
            query.set_status(status);
            let mut controller = ListController::<Student>::new(gateway, query);
            let path = controller
                .export(format, &out, Local::now().date_naive())
                .await?;
            console::success(&format!("Saved {}", path.display()));
            Ok(())
        }

        StudentCommand::Create {
            student_id,
            first_name,
            last_name,
            email,
            department,
            courses,
        } => {
            let mut form = StudentForm::create(Arc::clone(&gateway), delay);
            form.load().await?;
            form.set(StudentField::StudentId, student_id);
            form.set(StudentField::FirstName, first_name);
            form.set(StudentField::LastName, last_name);
            form.set(StudentField::Email, email);
            if department.is_some() {
                form.select_department(department).await;
            }
            for course in courses {
                form.toggle_course(course);
            }
            submit_student(form, gateway, config).await
        }

        StudentCommand::Edit {
            student_id,
            first_name,
            last_name,
            email,
            department,
            courses,
        } => {
            let mut form = StudentForm::edit(Arc::clone(&gateway), student_id, delay);
            form.load().await?;
            if let Some(value) = first_name {
                form.set(StudentField::FirstName, value);
            }
            if let Some(value) = last_name {
                form.set(StudentField::LastName, value);
            }
            if let Some(value) = email {
                form.set(StudentField::Email, value);
            }
            if department.is_some() && department != form.department_id() {
                form.select_department(department).await;
            }
            if let Some(courses) = courses {
                form.set_courses(courses);
            }
            submit_student(form, gateway, config).await
        }

        StudentCommand::Toggle { student_id, yes } => {
            let student = gateway.get_student(&student_id).await?;
            if let Some(updated) = toggle_with_confirmation(gateway, student, yes).await? {
                console::success(&format!(
                    "{} is now {}",
                    updated.full_name(),
                    if updated.active { "active" } else { "inactive" }
                ));
            }
            Ok(())
        }
    }
}

async fn submit_student(
    mut form: StudentForm,
    gateway: Arc<dyn RemoteGateway>,
    config: &Config,
) -> Result<()> {
    let outcome = form.submit().await?;
    if outcome == SubmitOutcome::Invalid {
        print_student_errors(&form);
    }
    finish_submit(outcome, form.status(), gateway, config).await
}

fn print_student(student: &Student) {
    console::summary(
        &student.full_name(),
        &[
            ("Student ID", student.student_id.clone()),
            ("Email", student.email.clone()),
            (
                "Department",
                student
                    .department
                    .as_ref()
                    .map(|d| d.name.replace('_', " "))
                    .unwrap_or_default(),
            ),
            ("Courses", student.course_names()),
            (
                "Status",
                if student.active { "Active" } else { "Inactive" }.to_string(),
            ),
            ("Updated", student.updated_at.clone()),
        ],
    );
}

async fn run_departments(
    action: DepartmentCommand,
    gateway: Arc<dyn RemoteGateway>,
    config: &Config,
) -> Result<()> {
    let delay = config.form.redirect_delay();
    match action {
        DepartmentCommand::List(args) => {
            let query = list_query(&args, QueryState::departments(config.list.page_size), config)?;
            show_list::<Department>(gateway, query, table::departments_table, "Department List")
                .await
        }

        DepartmentCommand::Active => {
            let departments = gateway.active_departments().await?;
            println!("{}", table::departments_table(&departments));
            Ok(())
        }

        DepartmentCommand::Show { id } => {
            let department = gateway.get_department(id).await?;
            console::header(&department.display_name());
            println!("{}", table::courses_table(&department.courses));
            Ok(())
        }

        DepartmentCommand::Create { name, courses } => {
            let mut form = DepartmentForm::create(Arc::clone(&gateway), delay);
            form.set_name(name);
            for (index, course) in courses.iter().enumerate() {
                let (course_name, description) =
                    course.split_once(':').unwrap_or((course.as_str(), ""));
                form.add_course();
                form.set_course_name(index, course_name);
                form.set_course_description(index, description);
            }
            submit_department(form, gateway, config).await
        }

        DepartmentCommand::Edit { id, name, active } => {
            let mut form = DepartmentForm::edit(Arc::clone(&gateway), id, delay);
            form.load().await?;
            if let Some(name) = name {
                form.set_name(name);
            }
            if let Some(active) = active {
                form.set_active(active);
            }
            submit_department(form, gateway, config).await
        }

        DepartmentCommand::Toggle { id, yes } => {
            let department = gateway.get_department(id).await?;
            if let Some(updated) = toggle_with_confirmation(gateway, department, yes).await? {
                console::success(&format!(
                    "{} is now {}",
                    updated.display_name(),
                    if updated.active { "active" } else { "inactive" }
                ));
            }
            Ok(())
        }
    }
}

async fn submit_department(
    mut form: DepartmentForm,
    gateway: Arc<dyn RemoteGateway>,
    config: &Config,
) -> Result<()> {
    let outcome = form.submit().await?;
    if outcome == SubmitOutcome::Invalid {
        for error in form.name().visible_errors() {
            console::failure(&format!("Name: {}", error));
        }
        for (index, entry) in form.courses().iter().enumerate() {
            for error in entry.name().visible_errors() {
                console::failure(&format!("Course {}: {}", index + 1, error));
            }
        }
    }
    finish_submit(outcome, form.status(), gateway, config).await
}
