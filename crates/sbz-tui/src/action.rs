//! User actions for the TUI.
//!
//! Key events are mapped to an [`Action`] by the current mode, then the
//! action is applied by [`App::update`](crate::App::update):
//!
//! ```text
//! Key Event → App::handle_key → Action → App::update
//! ```

/// What a text input is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    /// Tag search text. Applied on every keystroke.
    Search,
    /// Name of a new tag.
    NewTag,
    /// New name for the selected tag.
    RenameTag,
}

impl InputPurpose {
    /// Title shown above the input box.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Search => " Search tags ",
            Self::NewTag => " New tag ",
            Self::RenameTag => " Rename tag ",
        }
    }
}

/// User-initiated actions in the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Action {
    // =========================================================================
    // Navigation
    // =========================================================================
    /// Move selection to the next item of the focused panel.
    NextItem,

    /// Move selection to the previous item.
    PreviousItem,

    /// Move selection to the first item.
    FirstItem,

    /// Move selection to the last item.
    LastItem,

    /// Move selection down by one page.
    PageDown,

    /// Move selection up by one page.
    PageUp,

    /// Expand the selected directory.
    Expand,

    /// Collapse the selected directory, or jump to the parent directory.
    Collapse,

    // =========================================================================
    // Focus Management
    // =========================================================================
    /// Focus the next panel.
    FocusNext,

    /// Focus the previous panel.
    FocusPrevious,

    // =========================================================================
    // Filtering
    // =========================================================================
    /// Add the selected tag to the include set.
    IncludeTag,

    /// Add the selected tag to the exclude set.
    ExcludeTag,

    /// Empty both filter sets.
    ResetFilter,

    // =========================================================================
    // Tag Editing
    // =========================================================================
    /// Assign the selected tag to the selected sound.
    AssignTag,

    /// Context action of the focused panel: expand/collapse in the tree,
    /// toggle assignment in the tag list, remove from a filter set or from
    /// the sound elsewhere.
    Activate,

    /// Remove the selected entry: delete the tag in the tag list, drop it
    /// from a filter set or from the sound elsewhere.
    RemoveSelected,

    /// Open a text input.
    BeginInput(InputPurpose),

    /// Confirm the text input.
    SubmitInput,

    /// Close the text input without applying it.
    CancelInput,

    // =========================================================================
    // Library
    // =========================================================================
    /// Start a rescan of every root.
    Rescan,

    /// Open the selected sound (or the visible sounds of the selected
    /// directory) with the open command.
    OpenSelected,

    // =========================================================================
    // UI State
    // =========================================================================
    /// Toggle the help panel.
    ToggleHelp,

    /// Hide the help panel.
    HideHelp,

    /// Show a status message.
    ShowStatus(String),

    /// Clear the status message.
    ClearStatus,

    // =========================================================================
    // Application Control
    // =========================================================================
    /// Quit the application.
    Quit,

    /// Render the UI.
    Render,

    /// Tick (periodic update).
    Tick,

    /// No operation.
    #[default]
    None,
}

impl Action {
    /// Returns `true` if this action requires a re-render.
    #[must_use]
    pub const fn needs_render(&self) -> bool {
        !matches!(self, Self::None | Self::Tick)
    }

    /// Returns `true` if this is a navigation action.
    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::NextItem
                | Self::PreviousItem
                | Self::FirstItem
                | Self::LastItem
                | Self::PageDown
                | Self::PageUp
                | Self::Expand
                | Self::Collapse
        )
    }

    /// Returns `true` if this action changes the filter.
    #[must_use]
    pub const fn modifies_filter(&self) -> bool {
        matches!(
            self,
            Self::IncludeTag | Self::ExcludeTag | Self::ResetFilter
        )
    }
}
