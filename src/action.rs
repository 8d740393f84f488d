use crate::domain::{HistoryPage, RecordIdentity};
use crate::store::LoadTicket;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    PageUp,
    PageDown,
    Back,

    // Vim chord
    EnterPendingG,

    // History
    LoadMore,
    OpenRecord(RecordIdentity),

    // UI
    OpenCommandInput,
    CloseOverlay,
    SubmitCommandInput(String),
    UpdateInputBuffer(String),
    ToggleHelp,

    // Data responses
    HistoryLoaded(LoadTicket, HistoryPage),
    HistoryLoadFailed(LoadTicket, String),

    // App control
    Refresh,
    Quit,
    Tick,
    ClearError,
}
