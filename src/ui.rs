//! UI collaborator interfaces: modal prompts and the update badge

#[cfg(test)]
use mockall::automock;

/// Buttons shown on a modal prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptButtons {
    Ok,
    YesNo,
}

/// Icon shown on a modal prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptIcon {
    Info,
    Warning,
    Error,
}

/// The button the user pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Ok,
    Yes,
    No,
}

/// Blocking modal dialog collaborator.
///
/// Backed by a native system-modal message box in the embedding plugin;
/// every call blocks until the user dismisses the dialog.
#[cfg_attr(test, automock)]
pub trait Prompter: Send + Sync {
    fn prompt(
        &self,
        text: &str,
        caption: &str,
        buttons: PromptButtons,
        icon: PromptIcon,
    ) -> PromptChoice;
}

/// Toggles the "update available" badge in the embedding plugin's UI.
#[cfg_attr(test, automock)]
pub trait UpdateNotifier: Send + Sync {
    fn set_update_badge_visible(&self, visible: bool);
}
