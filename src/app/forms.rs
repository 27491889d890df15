//! Modal forms and dialogs of the settings screen.

use crate::icons::{self, filter_available_icons};
use crate::types::{Account, AccountPayload, Category, CategoryPayload, Tag, TagPayload};

use super::SettingsSection;

pub const CATEGORY_NAME_REQUIRED: &str = "Category name cannot be empty.";
pub const TAG_NAME_REQUIRED: &str = "Tag name cannot be empty.";
pub const ACCOUNT_NAME_REQUIRED: &str = "Account name cannot be empty.";
pub const ACCOUNT_TYPE_REQUIRED: &str = "Account type cannot be empty.";
pub const ACCOUNT_PROVIDER_REQUIRED: &str = "Provider cannot be empty.";
pub const PASSWORD_REQUIRED: &str = "Please enter your password.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Icon,
}

#[derive(Clone, Debug)]
pub struct CategoryModal {
    pub editing: Option<Category>,
    pub name: String,
    /// Icons the picker offers.
    pub icons: Vec<&'static str>,
    /// Index into `icons`; `None` means no icon.
    pub icon_index: Option<usize>,
    pub field: CategoryField,
    pub error: Option<String>,
}

impl CategoryModal {
    /// Add form, optionally pre-filled with a suggested name.
    pub fn add(categories: &[Category], initial_name: Option<&str>) -> Self {
        Self {
            editing: None,
            name: initial_name.unwrap_or_default().to_string(),
            icons: filter_available_icons(&icons::catalog(), categories, None),
            icon_index: None,
            field: CategoryField::Name,
            error: None,
        }
    }

    pub fn edit(categories: &[Category], category: &Category) -> Self {
        let icons = filter_available_icons(&icons::catalog(), categories, Some(category));
        let icon_index = category
            .icon_name
            .as_deref()
            .and_then(|own| icons.iter().position(|icon| *icon == own));
        Self {
            editing: Some(category.clone()),
            name: category.name.clone(),
            icons,
            icon_index,
            field: CategoryField::Name,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Category"
        } else {
            "Add New Category"
        }
    }

    pub fn selected_icon(&self) -> Option<&'static str> {
        self.icon_index.and_then(|index| self.icons.get(index).copied())
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            CategoryField::Name => CategoryField::Icon,
            CategoryField::Icon => CategoryField::Name,
        };
    }

    /// Steps through "no icon" followed by every offered icon.
    pub fn next_icon(&mut self) {
        self.icon_index = match self.icon_index {
            None if !self.icons.is_empty() => Some(0),
            Some(index) if index + 1 < self.icons.len() => Some(index + 1),
            _ => None,
        };
    }

    pub fn prev_icon(&mut self) {
        self.icon_index = match self.icon_index {
            None => self.icons.len().checked_sub(1),
            Some(0) => None,
            Some(index) => Some(index - 1),
        };
    }

    /// Validated payload. Editing keeps the category's income flag.
    pub fn payload(&self) -> Result<CategoryPayload, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CATEGORY_NAME_REQUIRED);
        }
        Ok(CategoryPayload {
            name: name.to_string(),
            icon_name: self.selected_icon().map(str::to_string),
            is_income: self.editing.as_ref().is_some_and(|c| c.is_income),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct TagModal {
    pub editing: Option<Tag>,
    pub name: String,
    pub error: Option<String>,
}

impl TagModal {
    pub fn edit(tag: &Tag) -> Self {
        Self {
            editing: Some(tag.clone()),
            name: tag.name.clone(),
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Tag"
        } else {
            "Add New Tag"
        }
    }

    pub fn payload(&self) -> Result<TagPayload, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TAG_NAME_REQUIRED);
        }
        Ok(TagPayload {
            name: name.to_string(),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccountField {
    #[default]
    Name,
    Kind,
    Provider,
    Number,
}

impl AccountField {
    pub fn next(self) -> Self {
        match self {
            AccountField::Name => AccountField::Kind,
            AccountField::Kind => AccountField::Provider,
            AccountField::Provider => AccountField::Number,
            AccountField::Number => AccountField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            AccountField::Name => AccountField::Number,
            AccountField::Kind => AccountField::Name,
            AccountField::Provider => AccountField::Kind,
            AccountField::Number => AccountField::Provider,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountField::Name => "Name",
            AccountField::Kind => "Type",
            AccountField::Provider => "Provider",
            AccountField::Number => "Account number",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AccountModal {
    pub editing: Option<Account>,
    pub name: String,
    pub kind: String,
    pub provider: String,
    pub account_number: String,
    pub field: AccountField,
    pub error: Option<String>,
}

impl AccountModal {
    pub fn edit(account: &Account) -> Self {
        Self {
            editing: Some(account.clone()),
            name: account.name.clone(),
            kind: account.kind.clone(),
            provider: account.provider.clone(),
            account_number: account.account_number.clone().unwrap_or_default(),
            field: AccountField::Name,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Account"
        } else {
            "Add New Account"
        }
    }

    pub fn value(&self, field: AccountField) -> &str {
        match field {
            AccountField::Name => &self.name,
            AccountField::Kind => &self.kind,
            AccountField::Provider => &self.provider,
            AccountField::Number => &self.account_number,
        }
    }

    pub fn active_value_mut(&mut self) -> &mut String {
        match self.field {
            AccountField::Name => &mut self.name,
            AccountField::Kind => &mut self.kind,
            AccountField::Provider => &mut self.provider,
            AccountField::Number => &mut self.account_number,
        }
    }

    pub fn payload(&self) -> Result<AccountPayload, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ACCOUNT_NAME_REQUIRED);
        }
        let kind = self.kind.trim();
        if kind.is_empty() {
            return Err(ACCOUNT_TYPE_REQUIRED);
        }
        let provider = self.provider.trim();
        if provider.is_empty() {
            return Err(ACCOUNT_PROVIDER_REQUIRED);
        }
        let number = self.account_number.trim();
        Ok(AccountPayload {
            name: name.to_string(),
            kind: kind.to_string(),
            provider: provider.to_string(),
            account_number: (!number.is_empty()).then(|| number.to_string()),
        })
    }
}

/// Pending "are you sure" for deleting a settings entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDelete {
    pub section: SettingsSection,
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct DeleteAccountPopup {
    pub password: String,
    pub error: Option<String>,
}

impl DeleteAccountPopup {
    pub fn masked(&self) -> String {
        "•".repeat(self.password.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, icon: Option<&str>, is_income: bool) -> Category {
        Category {
            id,
            name: name.to_string(),
            icon_name: icon.map(str::to_string),
            is_income,
        }
    }

    #[test]
    fn blank_category_name_is_rejected() {
        let mut modal = CategoryModal::add(&[], None);
        modal.name = "   ".to_string();
        assert_eq!(modal.payload(), Err(CATEGORY_NAME_REQUIRED));
    }

    #[test]
    fn add_form_takes_suggested_name_and_hides_used_icons() {
        let existing = [category(1, "Food", Some("utensils"), false)];
        let modal = CategoryModal::add(&existing, Some("Groceries"));
        assert_eq!(modal.name, "Groceries");
        assert!(!modal.icons.contains(&"utensils"));
        assert_eq!(modal.selected_icon(), None);
    }

    #[test]
    fn edit_form_selects_own_icon() {
        let food = category(1, "Food", Some("utensils"), false);
        let travel = category(2, "Travel", Some("plane"), false);
        let modal = CategoryModal::edit(&[food.clone(), travel], &food);
        assert_eq!(modal.selected_icon(), Some("utensils"));
        assert!(!modal.icons.contains(&"plane"));
    }

    #[test]
    fn editing_keeps_income_flag() {
        let salary = category(5, "Salary", None, true);
        let mut modal = CategoryModal::edit(&[salary.clone()], &salary);
        modal.name = " Pay ".to_string();
        let payload = modal.payload().unwrap();
        assert!(payload.is_income);
        assert_eq!(payload.name, "Pay");
    }

    #[test]
    fn icon_cycle_wraps_through_none() {
        let mut modal = CategoryModal::add(&[], None);
        modal.icons = vec!["a", "b"];
        modal.next_icon();
        assert_eq!(modal.selected_icon(), Some("a"));
        modal.next_icon();
        modal.next_icon();
        assert_eq!(modal.selected_icon(), None);
        modal.prev_icon();
        assert_eq!(modal.selected_icon(), Some("b"));
    }

    #[test]
    fn account_form_validates_in_field_order() {
        let mut modal = AccountModal::default();
        modal.name = "Card".to_string();
        assert_eq!(modal.payload(), Err(ACCOUNT_TYPE_REQUIRED));
        modal.kind = "credit".to_string();
        assert_eq!(modal.payload(), Err(ACCOUNT_PROVIDER_REQUIRED));
        modal.provider = "Amex".to_string();
        let payload = modal.payload().unwrap();
        assert_eq!(payload.account_number, None);
    }

    #[test]
    fn password_is_masked() {
        let popup = DeleteAccountPopup {
            password: "abc".to_string(),
            error: None,
        };
        assert_eq!(popup.masked(), "•••");
    }
}
