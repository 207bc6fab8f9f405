use std::path::PathBuf;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use super::super::form::TaskField;
use super::input::Command;
use super::{App, Mode};
use crate::capture::TaskInput;
use crate::config::AppConfig;
use crate::db::Database;
use crate::model::Priority;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(app: &mut App, code: KeyCode) {
    app.on_key(key(code));
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn seed(app: &App, date: NaiveDate, description: &str, priority: Priority) -> i64 {
    app.database
        .add_task(
            date,
            &app.context,
            &TaskInput::new(description, priority, "1h"),
        )
        .unwrap()
}

fn app_on(date: NaiveDate) -> App {
    app_in_context(date, "default")
}

fn app_in_context(date: NaiveDate, context: &str) -> App {
    let config = AppConfig::from_data_dir(PathBuf::from("/tmp/gtd-tests"));
    let database = Database::open_in_memory().unwrap();
    App::new(config, database, date, context.to_string()).unwrap()
}

fn descriptions(app: &App) -> Vec<String> {
    app.tasks()
        .iter()
        .map(|task| task.description.clone())
        .collect()
}

#[test]
fn add_form_saves_with_default_priority() {
    let mut app = app_on(day(1));

    press(&mut app, KeyCode::Char('a'));
    assert!(matches!(app.mode(), Mode::AddForm(_)));
    type_text(&mut app, "Buy milk");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "10m");
    press(&mut app, KeyCode::Enter);

    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(descriptions(&app), vec!["Buy milk"]);
    assert_eq!(app.tasks()[0].priority, Priority::B);
    assert_eq!(app.tasks()[0].time_estimate, "10m");
    assert_eq!(app.selected(), Some(0));
    assert_eq!(app.status_text(), Some("Added 'Buy milk'"));
}

#[test]
fn add_form_keeps_invalid_input_open() {
    let mut app = app_on(day(1));

    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "1h");
    press(&mut app, KeyCode::Enter);

    match app.mode() {
        Mode::AddForm(form) => {
            assert_eq!(form.error(), Some("Description is required"));
            assert_eq!(form.focus(), TaskField::Description);
        }
        other => panic!("expected add form, got {:?}", other),
    }
    assert!(app.tasks().is_empty());
}

#[test]
fn escape_discards_the_form() {
    let mut app = app_on(day(1));

    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Half typed");
    press(&mut app, KeyCode::Esc);

    assert!(matches!(app.mode(), Mode::Browsing));
    assert!(app.tasks().is_empty());
}

#[test]
fn toggle_done_flips_completion() {
    let mut app = app_on(day(1));
    seed(&app, day(1), "Fix server", Priority::A);
    app.refresh().unwrap();

    press(&mut app, KeyCode::Char(' '));
    assert!(app.tasks()[0].is_completed);
    assert_eq!(app.summary().to_string(), "1/1 tasks completed");

    press(&mut app, KeyCode::Char('d'));
    assert!(!app.tasks()[0].is_completed);
}

#[test]
fn actions_on_an_empty_day_only_report() {
    let mut app = app_on(day(1));

    for code in [KeyCode::Char(' '), KeyCode::Char('e'), KeyCode::Char('x')] {
        press(&mut app, code);
        assert!(matches!(app.mode(), Mode::Browsing));
        assert_eq!(app.status_text(), Some("No task selected"));
    }
}

#[test]
fn edit_form_is_prefilled_and_updates_in_place() {
    let mut app = app_on(day(1));
    seed(&app, day(1), "First", Priority::B);
    let id = seed(&app, day(1), "Original", Priority::C);
    app.refresh().unwrap();

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('e'));
    match app.mode() {
        Mode::EditForm { id: editing, form } => {
            assert_eq!(*editing, id);
            assert_eq!(form.description().as_str(), "Original");
            assert_eq!(form.priority(), Priority::C);
        }
        other => panic!("expected edit form, got {:?}", other),
    }

    type_text(&mut app, " v2");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);

    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(descriptions(&app), vec!["Original v2", "First"]);
    assert_eq!(app.selected(), Some(0));
    assert_eq!(app.tasks()[0].id, id);
}

#[test]
fn delete_requires_confirmation() {
    let mut app = app_on(day(1));
    seed(&app, day(1), "Keep", Priority::A);
    seed(&app, day(1), "Drop", Priority::B);
    app.refresh().unwrap();

    press(&mut app, KeyCode::End);
    press(&mut app, KeyCode::Char('x'));
    assert!(matches!(app.mode(), Mode::ConfirmDelete { .. }));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.tasks().len(), 2);
    assert_eq!(app.status_text(), Some("Deletion cancelled"));

    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Enter);

    assert_eq!(descriptions(&app), vec!["Keep"]);
    assert_eq!(app.selected(), Some(0));
}

#[test]
fn selection_keeps_its_place_after_changes() {
    let mut app = app_on(day(1));
    seed(&app, day(1), "First", Priority::A);
    seed(&app, day(1), "Second", Priority::B);
    seed(&app, day(1), "Third", Priority::C);
    app.refresh().unwrap();

    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected(), Some(1));

    press(&mut app, KeyCode::Char(' '));
    assert!(app.tasks()[1].is_completed);
    assert_eq!(app.selected(), Some(1));

    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(descriptions(&app), vec!["First", "Third"]);
    assert_eq!(app.selected(), Some(1));
    assert_eq!(app.status_text(), Some("Deleted 'Second'"));

    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(descriptions(&app), vec!["First"]);
    assert_eq!(app.selected(), Some(0));
}

#[test]
fn carry_over_copies_open_tasks_once() {
    let mut app = app_on(day(1));
    seed(&app, day(1), "Fix server", Priority::A);
    seed(&app, day(1), "Write notes", Priority::C);
    let done = seed(&app, day(1), "Buy milk", Priority::B);
    app.database.mark_complete(done).unwrap();
    app.refresh().unwrap();

    press(&mut app, KeyCode::Char('c'));
    match app.mode() {
        Mode::ConfirmCarry {
            candidates, target, ..
        } => {
            assert_eq!(candidates.len(), 2);
            assert_eq!(*target, day(2));
        }
        other => panic!("expected carry confirmation, got {:?}", other),
    }
    press(&mut app, KeyCode::Enter);

    let carried = app.database.tasks_for_date(day(2), "default").unwrap();
    assert_eq!(carried.len(), 2);
    assert!(carried.iter().all(|task| task.was_carried_over()));
    assert_eq!(app.tasks().len(), 3);

    press(&mut app, KeyCode::Char('c'));
    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(
        app.status_text(),
        Some("All incomplete tasks already carried over to Monday, 02 June 2025")
    );
    assert_eq!(
        app.database.tasks_for_date(day(2), "default").unwrap().len(),
        2
    );
}

#[test]
fn carry_over_with_everything_done() {
    let mut app = app_on(day(1));
    let id = seed(&app, day(1), "Done already", Priority::A);
    app.database.mark_complete(id).unwrap();
    app.refresh().unwrap();

    press(&mut app, KeyCode::Char('c'));

    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(app.status_text(), Some("Nothing incomplete to carry over"));
}

#[test]
fn empty_day_offers_import_from_latest_open_day() {
    let mut app = app_on(day(5));
    seed(&app, day(1), "Old", Priority::B);
    seed(&app, day(3), "Recent", Priority::A);
    app.refresh().unwrap();

    assert_eq!(
        app.hint().as_deref(),
        Some("Open tasks remain on Tuesday, 03 June 2025. Press 'i' to import them.")
    );

    press(&mut app, KeyCode::Char('i'));

    assert_eq!(descriptions(&app), vec!["Recent"]);
    assert!(app.tasks()[0].was_carried_over());
    assert_eq!(app.hint(), None);
}

#[test]
fn import_is_refused_on_a_day_with_tasks() {
    let mut app = app_on(day(5));
    seed(&app, day(3), "Earlier", Priority::A);
    seed(&app, day(5), "Today", Priority::A);
    app.refresh().unwrap();

    press(&mut app, KeyCode::Char('i'));

    assert_eq!(descriptions(&app), vec!["Today"]);
    assert_eq!(
        app.status_text(),
        Some("Import is only available on a day with no tasks")
    );
}

#[test]
fn view_date_form_switches_day() {
    let mut app = app_on(day(1));
    seed(&app, day(15), "Later", Priority::B);

    press(&mut app, KeyCode::Char('g'));
    type_text(&mut app, "nonsense");
    press(&mut app, KeyCode::Enter);
    match app.mode() {
        Mode::ViewDateForm(form) => assert!(form.error().is_some()),
        other => panic!("expected date form, got {:?}", other),
    }
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.date(), day(1));

    press(&mut app, KeyCode::Char('g'));
    type_text(&mut app, "15/06/2025");
    press(&mut app, KeyCode::Enter);

    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(app.date(), day(15));
    assert_eq!(descriptions(&app), vec!["Later"]);
}

#[test]
fn day_navigation_keys_step_one_day() {
    let mut app = app_on(day(10));

    press(&mut app, KeyCode::Char(']'));
    assert_eq!(app.date(), day(11));
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Char('['));
    assert_eq!(app.date(), day(9));
}

#[test]
fn contexts_are_isolated() {
    let mut work = app_in_context(day(1), "work");
    work.database
        .add_task(day(1), "default", &TaskInput::new("Home chore", Priority::A, "1h"))
        .unwrap();
    seed(&work, day(1), "Ship release", Priority::A);
    work.refresh().unwrap();

    assert_eq!(work.context(), "work");
    assert_eq!(descriptions(&work), vec!["Ship release"]);
}

#[test]
fn store_failures_surface_in_the_status_line() {
    let mut app = app_on(day(1));
    let id = seed(&app, day(1), "Vanishing", Priority::A);
    app.refresh().unwrap();
    app.database.delete_task(id).unwrap();

    press(&mut app, KeyCode::Char(' '));

    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(app.status_text(), Some(format!("task {} not found", id).as_str()));
    assert!(!app.should_quit());
}

#[test]
fn quit_keys_stop_the_loop() {
    let mut app = app_on(day(1));
    press(&mut app, KeyCode::Char('a'));
    app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());

    let mut app = app_on(day(1));
    app.dispatch(Command::Quit).unwrap();
    assert!(app.should_quit());
}

#[test]
fn help_overlay_swallows_commands_but_not_quit() {
    let mut app = app_on(day(1));

    press(&mut app, KeyCode::Char('?'));
    assert!(app.show_help);
    press(&mut app, KeyCode::Char('a'));
    assert!(matches!(app.mode(), Mode::Browsing));
    assert!(app.show_help);

    press(&mut app, KeyCode::Esc);
    assert!(!app.show_help);

    press(&mut app, KeyCode::Char('h'));
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit());
}

#[test]
fn draw_renders_tasks_and_summary() {
    let mut app = app_on(day(1));
    seed(&app, day(1), "Fix server", Priority::A);
    let done = seed(&app, day(1), "Buy milk", Priority::B);
    app.database.mark_complete(done).unwrap();
    app.refresh().unwrap();

    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();

    let buffer = terminal.backend().buffer().clone();
    let rendered: String = buffer
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect::<String>();
    assert!(rendered.contains("Fix server"));
    assert!(rendered.contains("Buy milk"));
    assert!(rendered.contains("1/2 tasks completed"));
}
