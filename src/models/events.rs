use crate::models::entry::Entry;

/// How far an open/close request should reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    Recursive,
    Local,
}

/// Hints for the rename affordance of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameRequest {
    pub cursor: Option<usize>,
    pub force: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TreeEvent {
    Clicked,
    RequestRename(RenameRequest),
    RequestFocusToggle,
    Renamed { from: String, to: String },
    Reparented,
    // Parent events
    Opening,
    Opened,
    Closing,
    Closed,
    ChildClicked {
        entry: Entry,
        index: usize,
    },
    ChildRenamed {
        entry: Entry,
        from: String,
        to: String,
        index: usize,
    },
    ChildAddFinalized {
        entry: Entry,
    },
    RequestOpen(Depth),
    RequestClose(Depth),
    RequestExpansionToggle(Depth),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Clicked,
    RequestRename,
    RequestFocusToggle,
    Renamed,
    Reparented,
    Opening,
    Opened,
    Closing,
    Closed,
    ChildClicked,
    ChildRenamed,
    ChildAddFinalized,
    RequestOpen,
    RequestClose,
    RequestExpansionToggle,
}

impl TreeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TreeEvent::Clicked => EventKind::Clicked,
            TreeEvent::RequestRename(_) => EventKind::RequestRename,
            TreeEvent::RequestFocusToggle => EventKind::RequestFocusToggle,
            TreeEvent::Renamed { .. } => EventKind::Renamed,
            TreeEvent::Reparented => EventKind::Reparented,
            TreeEvent::Opening => EventKind::Opening,
            TreeEvent::Opened => EventKind::Opened,
            TreeEvent::Closing => EventKind::Closing,
            TreeEvent::Closed => EventKind::Closed,
            TreeEvent::ChildClicked { .. } => EventKind::ChildClicked,
            TreeEvent::ChildRenamed { .. } => EventKind::ChildRenamed,
            TreeEvent::ChildAddFinalized { .. } => EventKind::ChildAddFinalized,
            TreeEvent::RequestOpen(_) => EventKind::RequestOpen,
            TreeEvent::RequestClose(_) => EventKind::RequestClose,
            TreeEvent::RequestExpansionToggle(_) => EventKind::RequestExpansionToggle,
        }
    }
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Clicked => "clicked",
            EventKind::RequestRename => "request rename",
            EventKind::RequestFocusToggle => "request focus toggle",
            EventKind::Renamed => "renamed",
            EventKind::Reparented => "reparented",
            EventKind::Opening => "opening",
            EventKind::Opened => "opened",
            EventKind::Closing => "closing",
            EventKind::Closed => "closed",
            EventKind::ChildClicked => "child clicked",
            EventKind::ChildRenamed => "child renamed",
            EventKind::ChildAddFinalized => "child add finalized",
            EventKind::RequestOpen => "request open",
            EventKind::RequestClose => "request close",
            EventKind::RequestExpansionToggle => "request expansion toggle",
        }
    }

    /// Events only roots and folders emit.
    pub fn is_parent_event(&self) -> bool {
        matches!(
            self,
            EventKind::Opening
                | EventKind::Opened
                | EventKind::Closing
                | EventKind::Closed
                | EventKind::ChildClicked
                | EventKind::ChildRenamed
                | EventKind::ChildAddFinalized
                | EventKind::RequestOpen
                | EventKind::RequestClose
                | EventKind::RequestExpansionToggle
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
