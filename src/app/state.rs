use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::api::{ExpenseApi, SettingsData};
use crate::export;
use crate::month::YearMonth;
use crate::types::{Category, CategoryId, DashboardData};

use super::forms::PASSWORD_REQUIRED;
use super::{
    AccountModal, AppEvent, AppOptions, AppView, CategoryField, CategoryModal, ConfirmDelete,
    DeleteAccountPopup, LoadKind, LoadOutcome, LoadRequest, Loader, Notice, NoticeKind,
    SettingsSection, TABS, TagModal,
};

pub const DASHBOARD_LOAD_FAILED: &str =
    "Could not load dashboard data. Please ensure the backend is running and try again.";
pub const SETTINGS_LOAD_FAILED: &str =
    "Failed to load settings data. Please ensure the backend is running.";
const SAVE_FAILED: &str = "An error occurred while saving.";
const ACCOUNT_DELETE_FAILED: &str = "Failed to delete account. Incorrect password?";
pub const ACCOUNT_DELETED: &str = "Account deleted successfully. Logging you out.";
const LOGOUT_DELAY: Duration = Duration::from_secs(1);

/// Data of a screen that is fetched in the background.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Loaded(T),
    Failed,
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardContent {
    pub data: DashboardData,
    /// Full category list, for names and icons of recent transactions.
    pub categories: Vec<Category>,
}

impl DashboardContent {
    pub fn category(&self, id: Option<CategoryId>) -> Option<&Category> {
        let id = id?;
        self.categories.iter().find(|category| category.id == id)
    }
}

#[derive(Clone, Debug)]
pub struct DashboardScreen {
    pub month: YearMonth,
    pub content: Loadable<DashboardContent>,
}

#[derive(Clone, Debug)]
pub struct SettingsScreen {
    pub data: Loadable<SettingsData>,
    pub section: SettingsSection,
    selected: [usize; 3],
}

impl SettingsScreen {
    pub fn selected_index(&self, section: SettingsSection) -> usize {
        self.selected[section.index()]
    }

    fn section_len(&self, section: SettingsSection) -> usize {
        let Some(data) = self.data.loaded() else {
            return 0;
        };
        match section {
            SettingsSection::Categories => data.categories.len(),
            SettingsSection::Tags => data.tags.len(),
            SettingsSection::Accounts => data.accounts.len(),
        }
    }

    fn clamp_selection(&mut self) {
        for section in SettingsSection::ALL {
            let len = self.section_len(section);
            let selected = &mut self.selected[section.index()];
            if *selected >= len {
                *selected = len.saturating_sub(1);
            }
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.section_len(self.section);
        if len == 0 {
            return;
        }
        let selected = &mut self.selected[self.section.index()];
        *selected = if down {
            (*selected + 1) % len
        } else if *selected == 0 {
            len - 1
        } else {
            *selected - 1
        };
    }
}

/// The top-level application state.
pub struct App {
    pub running: bool,
    /// Set once the signed-in user deleted their account.
    pub session_ended: bool,
    api: Arc<dyn ExpenseApi>,
    loader: Loader,
    pub options: AppOptions,
    pub view: AppView,
    view_history: Vec<AppView>,
    pub dashboard: DashboardScreen,
    pub settings: SettingsScreen,
    pub category_modal: Option<CategoryModal>,
    pub tag_modal: Option<TagModal>,
    pub account_modal: Option<AccountModal>,
    pub confirm_delete: Option<ConfirmDelete>,
    pub delete_account_popup: Option<DeleteAccountPopup>,
    pub notice: Option<Notice>,
    pending_new_category: Option<String>,
    exit_at: Option<Instant>,
}

impl App {
    pub fn new(api: Arc<dyn ExpenseApi>, options: AppOptions) -> std::io::Result<Self> {
        let loader = Loader::spawn(api.clone())?;
        let pending_new_category = options.new_category.clone();
        let view = if pending_new_category.is_some() {
            AppView::Settings
        } else {
            AppView::Dashboard
        };
        let mut app = Self {
            running: true,
            session_ended: false,
            api,
            loader,
            dashboard: DashboardScreen {
                month: options.start_month,
                content: Loadable::Loading,
            },
            settings: SettingsScreen {
                data: Loadable::Loading,
                section: SettingsSection::Categories,
                selected: [0; 3],
            },
            options,
            view,
            view_history: Vec::new(),
            category_modal: None,
            tag_modal: None,
            account_modal: None,
            confirm_delete: None,
            delete_account_popup: None,
            notice: None,
            pending_new_category,
            exit_at: None,
        };
        app.load_content_for_view();
        Ok(app)
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(Instant::now()),
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending(LoadKind::Dashboard) || self.loader.is_pending(LoadKind::Settings)
    }

    fn on_tick(&mut self, now: Instant) {
        while let Some(outcome) = self.loader.poll() {
            self.apply_outcome(outcome);
        }
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
        if self.exit_at.is_some_and(|at| now >= at) {
            self.running = false;
        }
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Dashboard { month, result } => {
                if month != self.dashboard.month {
                    return;
                }
                self.dashboard.content = match result {
                    Ok((data, categories)) => Loadable::Loaded(DashboardContent { data, categories }),
                    Err(err) => {
                        tracing::error!(%month, error = %err, "dashboard load failed");
                        Loadable::Failed
                    }
                };
            }
            LoadOutcome::Settings(result) => {
                self.settings.data = match result {
                    Ok(data) => Loadable::Loaded(data),
                    Err(err) => {
                        tracing::error!(error = %err, "settings load failed");
                        Loadable::Failed
                    }
                };
                self.settings.clamp_selection();
                self.open_pending_new_category();
            }
        }
    }

    fn open_pending_new_category(&mut self) {
        let Some(data) = self.settings.data.loaded() else {
            return;
        };
        if let Some(name) = self.pending_new_category.take() {
            self.category_modal = Some(CategoryModal::add(&data.categories, Some(&name)));
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some(Notice::new(kind, message));
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.exit_at.is_some() {
            return;
        }
        if self.delete_account_popup.is_some() {
            self.handle_delete_account_key(key);
            return;
        }
        if self.confirm_delete.is_some() {
            self.handle_confirm_delete_key(key);
            return;
        }
        if self.category_modal.is_some() {
            self.handle_category_modal_key(key);
            return;
        }
        if self.tag_modal.is_some() {
            self.handle_tag_modal_key(key);
            return;
        }
        if self.account_modal.is_some() {
            self.handle_account_modal_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('d') => self.navigate_to(AppView::Dashboard),
            KeyCode::Char('s') => self.navigate_to(AppView::Settings),
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.go_back();
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('r') => self.load_content_for_view(),
            _ => match self.view {
                AppView::Dashboard => self.handle_dashboard_key(key),
                AppView::Settings => self.handle_settings_key(key),
                AppView::Help => {}
            },
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view != view {
            self.view_history.push(self.view);
            self.view = view;
            self.load_content_for_view();
        }
    }

    fn go_back(&mut self) {
        if let Some(view) = self.view_history.pop() {
            self.view = view;
        }
    }

    /// Index into [`TABS`] of the current view, if it has a tab.
    pub fn selected_tab_index(&self) -> Option<usize> {
        TABS.iter().position(|view| *view == self.view)
    }

    fn load_content_for_view(&mut self) {
        match self.view {
            AppView::Dashboard => self.load_dashboard(),
            AppView::Settings => self.load_settings(),
            AppView::Help => {}
        }
    }

    fn load_dashboard(&mut self) {
        self.dashboard.content = Loadable::Loading;
        self.loader
            .request(LoadRequest::Dashboard(self.dashboard.month));
    }

    fn load_settings(&mut self) {
        self.settings.data = Loadable::Loading;
        self.loader.request(LoadRequest::Settings);
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left | KeyCode::Char('[') => {
                self.dashboard.month = self.dashboard.month.prev();
                self.load_dashboard();
            }
            KeyCode::Right | KeyCode::Char(']') => {
                self.dashboard.month = self.dashboard.month.next();
                self.load_dashboard();
            }
            KeyCode::Char('e') => self.export_chart(),
            _ => {}
        }
    }

    fn export_chart(&mut self) {
        let Some(content) = self.dashboard.content.loaded() else {
            self.notify(NoticeKind::Info, "Nothing to export yet.");
            return;
        };
        match export::export_chart(
            &content.data.top_spending_categories,
            self.dashboard.month,
            &self.options.export_dir,
            self.options.export_scale,
        ) {
            Ok(path) => self.notify(
                NoticeKind::Success,
                format!("Chart saved to {}", path.display()),
            ),
            Err(err) => {
                tracing::error!(error = %err, "chart export failed");
                self.notify(NoticeKind::Error, format!("Export failed: {err}"));
            }
        }
    }

    fn handle_settings_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Tab | KeyCode::Right => self.settings.section = self.settings.section.next(),
            KeyCode::BackTab | KeyCode::Left => {
                self.settings.section = self.settings.section.prev()
            }
            KeyCode::Up => self.settings.move_selection(false),
            KeyCode::Down => self.settings.move_selection(true),
            KeyCode::Char('a') | KeyCode::Char('n') => self.open_add_modal(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_modal(),
            KeyCode::Char('x') | KeyCode::Delete => self.open_confirm_delete(),
            KeyCode::Char('D') => {
                self.delete_account_popup = Some(DeleteAccountPopup::default());
            }
            _ => {}
        }
    }

    fn open_add_modal(&mut self) {
        let Some(data) = self.settings.data.loaded() else {
            return;
        };
        match self.settings.section {
            SettingsSection::Categories => {
                self.category_modal = Some(CategoryModal::add(&data.categories, None));
            }
            SettingsSection::Tags => self.tag_modal = Some(TagModal::default()),
            SettingsSection::Accounts => self.account_modal = Some(AccountModal::default()),
        }
    }

    fn open_edit_modal(&mut self) {
        let Some(data) = self.settings.data.loaded() else {
            return;
        };
        let index = self.settings.selected_index(self.settings.section);
        match self.settings.section {
            SettingsSection::Categories => {
                if let Some(category) = data.categories.get(index) {
                    self.category_modal = Some(CategoryModal::edit(&data.categories, category));
                }
            }
            SettingsSection::Tags => {
                if let Some(tag) = data.tags.get(index) {
                    self.tag_modal = Some(TagModal::edit(tag));
                }
            }
            SettingsSection::Accounts => {
                if let Some(account) = data.accounts.get(index) {
                    self.account_modal = Some(AccountModal::edit(account));
                }
            }
        }
    }

    fn open_confirm_delete(&mut self) {
        let Some(data) = self.settings.data.loaded() else {
            return;
        };
        let section = self.settings.section;
        let index = self.settings.selected_index(section);
        let target = match section {
            SettingsSection::Categories => data.categories.get(index).map(|c| (c.id, &c.name)),
            SettingsSection::Tags => data.tags.get(index).map(|t| (t.id, &t.name)),
            SettingsSection::Accounts => data.accounts.get(index).map(|a| (a.id, &a.name)),
        };
        if let Some((id, name)) = target {
            self.confirm_delete = Some(ConfirmDelete {
                section,
                id,
                name: name.clone(),
            });
        }
    }

    fn handle_category_modal_key(&mut self, key: KeyCode) {
        let Some(modal) = self.category_modal.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.category_modal = None,
            KeyCode::Enter => self.save_category(),
            KeyCode::Tab | KeyCode::BackTab => modal.toggle_field(),
            KeyCode::Left if modal.field == CategoryField::Icon => modal.prev_icon(),
            KeyCode::Right if modal.field == CategoryField::Icon => modal.next_icon(),
            KeyCode::Backspace | KeyCode::Delete => {
                if modal.field == CategoryField::Name {
                    modal.name.pop();
                }
            }
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                if modal.field == CategoryField::Name {
                    modal.name.push(ch);
                }
            }
            _ => {}
        }
    }

    fn save_category(&mut self) {
        let Some(mut modal) = self.category_modal.take() else {
            return;
        };
        let payload = match modal.payload() {
            Ok(payload) => payload,
            Err(message) => {
                modal.error = Some(message.to_string());
                self.category_modal = Some(modal);
                return;
            }
        };
        let result = match &modal.editing {
            Some(category) => self.api.update_category(category.id, &payload),
            None => self.api.create_category(&payload),
        };
        match result {
            Ok(category) => {
                tracing::info!(id = category.id, name = %category.name, "category saved");
                let verb = if modal.editing.is_some() { "updated" } else { "created" };
                self.notify(NoticeKind::Success, format!("Category {verb}."));
                self.load_settings();
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving category failed");
                modal.error = Some(err.user_message(SAVE_FAILED));
                self.category_modal = Some(modal);
            }
        }
    }

    fn handle_tag_modal_key(&mut self, key: KeyCode) {
        let Some(modal) = self.tag_modal.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.tag_modal = None,
            KeyCode::Enter => self.save_tag(),
            KeyCode::Backspace | KeyCode::Delete => {
                modal.name.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    modal.name.push(ch);
                }
            }
            _ => {}
        }
    }

    fn save_tag(&mut self) {
        let Some(mut modal) = self.tag_modal.take() else {
            return;
        };
        let payload = match modal.payload() {
            Ok(payload) => payload,
            Err(message) => {
                modal.error = Some(message.to_string());
                self.tag_modal = Some(modal);
                return;
            }
        };
        let result = match &modal.editing {
            Some(tag) => self.api.update_tag(tag.id, &payload),
            None => self.api.create_tag(&payload),
        };
        match result {
            Ok(_) => {
                self.notify(NoticeKind::Success, "Tag saved.");
                self.load_settings();
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving tag failed");
                modal.error = Some(err.user_message(SAVE_FAILED));
                self.tag_modal = Some(modal);
            }
        }
    }

    fn handle_account_modal_key(&mut self, key: KeyCode) {
        let Some(modal) = self.account_modal.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.account_modal = None,
            KeyCode::Enter => self.save_account(),
            KeyCode::Tab | KeyCode::Down => modal.field = modal.field.next(),
            KeyCode::BackTab | KeyCode::Up => modal.field = modal.field.prev(),
            KeyCode::Backspace | KeyCode::Delete => {
                modal.active_value_mut().pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    modal.active_value_mut().push(ch);
                }
            }
            _ => {}
        }
    }

    fn save_account(&mut self) {
        let Some(mut modal) = self.account_modal.take() else {
            return;
        };
        let payload = match modal.payload() {
            Ok(payload) => payload,
            Err(message) => {
                modal.error = Some(message.to_string());
                self.account_modal = Some(modal);
                return;
            }
        };
        let result = match &modal.editing {
            Some(account) => self.api.update_account(account.id, &payload),
            None => self.api.create_account(&payload),
        };
        match result {
            Ok(_) => {
                self.notify(NoticeKind::Success, "Account saved.");
                self.load_settings();
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving account failed");
                modal.error = Some(err.user_message(SAVE_FAILED));
                self.account_modal = Some(modal);
            }
        }
    }

    fn handle_confirm_delete_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => self.apply_confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => self.confirm_delete = None,
            _ => {}
        }
    }

    fn apply_confirm_delete(&mut self) {
        let Some(target) = self.confirm_delete.take() else {
            return;
        };
        let result = match target.section {
            SettingsSection::Categories => self.api.delete_category(target.id),
            SettingsSection::Tags => self.api.delete_tag(target.id),
            SettingsSection::Accounts => self.api.delete_account(target.id),
        };
        let noun = target.section.noun();
        match result {
            Ok(()) => {
                tracing::info!(kind = noun, id = target.id, "deleted");
                self.notify(
                    NoticeKind::Success,
                    format!("{} deleted!", target.section.singular()),
                );
                self.load_settings();
            }
            Err(err) => {
                tracing::warn!(kind = noun, id = target.id, error = %err, "delete failed");
                self.notify(NoticeKind::Error, format!("Failed to delete {noun}."));
            }
        }
    }

    fn handle_delete_account_key(&mut self, key: KeyCode) {
        let Some(popup) = self.delete_account_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.delete_account_popup = None,
            KeyCode::Enter => self.delete_my_account(),
            KeyCode::Backspace | KeyCode::Delete => {
                popup.password.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    popup.password.push(ch);
                }
            }
            _ => {}
        }
    }

    fn delete_my_account(&mut self) {
        let Some(mut popup) = self.delete_account_popup.take() else {
            return;
        };
        if popup.password.is_empty() {
            popup.error = Some(PASSWORD_REQUIRED.to_string());
            self.delete_account_popup = Some(popup);
            return;
        }
        match self.api.delete_my_account(&popup.password) {
            Ok(()) => {
                tracing::info!("user account deleted, ending session");
                self.notify(NoticeKind::Success, ACCOUNT_DELETED);
                self.session_ended = true;
                self.exit_at = Some(Instant::now() + LOGOUT_DELAY);
            }
            Err(err) => {
                tracing::warn!(error = %err, "account deletion failed");
                self.notify(NoticeKind::Error, err.user_message(ACCOUNT_DELETE_FAILED));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::api::{LocalStore, RestClient};
    use crate::types::{CategoryPayload, TagPayload};

    const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

    fn options(new_category: Option<&str>) -> AppOptions {
        AppOptions {
            export_dir: PathBuf::from("."),
            export_scale: 1,
            currency_symbol: "₹".to_string(),
            backend_label: "local".to_string(),
            start_month: YearMonth::new(2025, 3).unwrap(),
            new_category: new_category.map(str::to_string),
        }
    }

    fn app_with(store: Arc<LocalStore>, new_category: Option<&str>) -> App {
        let mut app = App::new(store, options(new_category)).unwrap();
        settle(&mut app);
        app
    }

    fn settle(app: &mut App) {
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        while app.is_loading() && Instant::now() < deadline {
            app.update(AppEvent::Tick);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.is_loading(), "load did not settle");
    }

    fn press(app: &mut App, key: KeyCode) {
        app.update(AppEvent::KeyPress(key));
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn open_settings(store: &Arc<LocalStore>) -> App {
        let mut app = app_with(store.clone(), None);
        press(&mut app, KeyCode::Char('s'));
        settle(&mut app);
        app
    }

    fn notice(app: &App) -> &str {
        app.notice.as_ref().map(|n| n.message.as_str()).unwrap_or("")
    }

    #[test]
    fn dashboard_loads_on_start() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let app = app_with(store, None);
        assert_eq!(app.view, AppView::Dashboard);
        assert!(matches!(app.dashboard.content, Loadable::Loaded(_)));
    }

    #[test]
    fn unreachable_backend_fails_dashboard() {
        let api = Arc::new(RestClient::new("http://127.0.0.1:9", None).unwrap());
        let mut app = App::new(api, options(None)).unwrap();
        settle(&mut app);
        assert_eq!(app.dashboard.content, Loadable::Failed);
    }

    #[test]
    fn month_keys_reload_dashboard() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let mut app = app_with(store, None);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.dashboard.month, YearMonth::new(2025, 2).unwrap());
        assert_eq!(app.dashboard.content, Loadable::Loading);
        settle(&mut app);
        assert!(app.dashboard.content.loaded().is_some());
    }

    #[test]
    fn empty_category_name_shows_inline_error() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let mut app = open_settings(&store);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        let modal = app.category_modal.as_ref().unwrap();
        assert_eq!(modal.error.as_deref(), Some("Category name cannot be empty."));
    }

    #[test]
    fn category_is_created_from_modal() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let mut app = open_settings(&store);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Groceries");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert!(app.category_modal.is_none());
        settle(&mut app);

        let categories = &app.settings.data.loaded().unwrap().categories;
        assert_eq!(categories[0].name, "Groceries");
        assert_eq!(categories[0].icon_name.as_deref(), Some("utensils"));
    }

    #[test]
    fn server_rejection_keeps_modal_open() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        store
            .create_category(&CategoryPayload {
                name: "Food".to_string(),
                icon_name: None,
                is_income: false,
            })
            .unwrap();
        let mut app = open_settings(&store);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Food");
        press(&mut app, KeyCode::Enter);
        let modal = app.category_modal.as_ref().unwrap();
        assert_eq!(modal.error.as_deref(), Some("Category 'Food' already exists."));
    }

    #[test]
    fn editing_category_preserves_income_flag() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        store
            .create_category(&CategoryPayload {
                name: "Salary".to_string(),
                icon_name: None,
                is_income: true,
            })
            .unwrap();
        let mut app = open_settings(&store);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "!");
        press(&mut app, KeyCode::Enter);

        let categories = store.categories().unwrap();
        assert_eq!(categories[0].name, "Salary!");
        assert!(categories[0].is_income);
    }

    #[test]
    fn confirmed_delete_reports_success() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        store
            .create_tag(&TagPayload {
                name: "trip".to_string(),
            })
            .unwrap();
        let mut app = open_settings(&store);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.confirm_delete.as_ref().unwrap().name, "trip");
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(notice(&app), "Tag deleted!");
        assert!(store.tags().unwrap().is_empty());
    }

    #[test]
    fn failed_delete_reports_generic_message() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let mut app = open_settings(&store);
        app.confirm_delete = Some(ConfirmDelete {
            section: SettingsSection::Accounts,
            id: 99,
            name: "Ghost".to_string(),
        });
        press(&mut app, KeyCode::Enter);
        assert_eq!(notice(&app), "Failed to delete account.");
    }

    #[test]
    fn account_deletion_failure_shows_detail() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let mut app = open_settings(&store);
        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.delete_account_popup.as_ref().unwrap().error.as_deref(),
            Some(PASSWORD_REQUIRED)
        );
        type_text(&mut app, "secret");
        press(&mut app, KeyCode::Enter);

        assert!(app.delete_account_popup.is_none());
        assert!(!app.session_ended);
        assert_eq!(
            notice(&app),
            "Deleting your account is only possible against the server."
        );
    }

    #[test]
    fn suggested_category_opens_add_form() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let app = app_with(store, Some("Pets"));
        assert_eq!(app.view, AppView::Settings);
        let modal = app.category_modal.as_ref().unwrap();
        assert_eq!(modal.name, "Pets");
        assert!(modal.editing.is_none());
    }

    #[test]
    fn notices_expire() {
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let mut app = app_with(store, None);
        app.notify(NoticeKind::Info, "hello");
        app.on_tick(Instant::now());
        assert!(app.notice.is_some());
        app.on_tick(Instant::now() + Notice::LIFETIME + Duration::from_millis(1));
        assert!(app.notice.is_none());
    }

    #[test]
    fn export_writes_into_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalStore::in_memory().unwrap());
        let mut app = app_with(store, None);
        app.options.export_dir = dir.path().to_path_buf();
        press(&mut app, KeyCode::Char('e'));
        assert!(notice(&app).starts_with("Chart saved to"));
        assert!(dir.path().join("top-spending-categories-2025-03.png").exists());
    }
}
