use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const STATUS_ENTER_ADD: &str =
    "New task: Tab/Enter moves between fields, Enter on Time estimate saves (Esc to cancel)";
pub(crate) const STATUS_ENTER_EDIT: &str =
    "Edit task: Enter on Time estimate saves • Esc to cancel";
pub(crate) const STATUS_ENTER_DATE: &str =
    "Jump to a day: dd/mm/yyyy, yyyy-mm-dd, today, tomorrow, +3d, fri";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion: arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_CONFIRM_CARRY: &str =
    "Carry over: y/Enter copies the tasks, n/Esc cancels";
pub(crate) const STATUS_REFRESHED: &str = "Refreshed tasks";
pub(crate) const STATUS_NOTHING_SELECTED: &str = "No task selected";
pub(crate) const STATUS_NOTHING_TO_CARRY: &str = "Nothing incomplete to carry over";
pub(crate) const STATUS_IMPORT_NEEDS_EMPTY_DAY: &str =
    "Import is only available on a day with no tasks";
pub(crate) const STATUS_NOTHING_TO_IMPORT: &str = "No earlier day has open tasks";
