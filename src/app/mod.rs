mod forms;
mod loader;
mod state;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::month::YearMonth;

pub use forms::{
    AccountField, AccountModal, CategoryField, CategoryModal, ConfirmDelete, DeleteAccountPopup,
    TagModal,
};
use loader::{LoadKind, LoadOutcome, LoadRequest, Loader};
pub use state::{
    ACCOUNT_DELETED, App, DASHBOARD_LOAD_FAILED, DashboardContent, Loadable, SETTINGS_LOAD_FAILED,
};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Dashboard,
    Settings,
    Help,
}

/// Views reachable from the tab bar, in display order.
pub const TABS: [AppView; 2] = [AppView::Dashboard, AppView::Settings];

impl AppView {
    pub fn title(self) -> &'static str {
        match self {
            AppView::Dashboard => "Dashboard",
            AppView::Settings => "Settings",
            AppView::Help => "Help",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsSection {
    Categories,
    Tags,
    Accounts,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 3] = [
        SettingsSection::Categories,
        SettingsSection::Tags,
        SettingsSection::Accounts,
    ];

    pub fn index(self) -> usize {
        match self {
            SettingsSection::Categories => 0,
            SettingsSection::Tags => 1,
            SettingsSection::Accounts => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            SettingsSection::Categories => "Categories",
            SettingsSection::Tags => "Tags",
            SettingsSection::Accounts => "Accounts",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            SettingsSection::Categories => "Category",
            SettingsSection::Tags => "Tag",
            SettingsSection::Accounts => "Account",
        }
    }

    /// Lowercase noun used in messages, e.g. "Failed to delete tag."
    pub fn noun(self) -> &'static str {
        match self {
            SettingsSection::Categories => "category",
            SettingsSection::Tags => "tag",
            SettingsSection::Accounts => "account",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Transient message shown in the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

impl Notice {
    pub const LIFETIME: Duration = Duration::from_secs(4);

    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            expires_at: Instant::now() + Self::LIFETIME,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Startup settings handed over from config and command line.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub export_dir: PathBuf,
    pub export_scale: u32,
    pub currency_symbol: String,
    pub backend_label: String,
    pub start_month: YearMonth,
    /// Opens Settings with the add-category form pre-filled.
    pub new_category: Option<String>,
}
