//! Action enum — all user-initiated intents and internal events.

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    /// Play the selected channel (routes through the browser's callback).
    PlaySelected,

    // ── Filter/search ────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,
    DismissNotice,
    CopyToClipboard(String), // text to copy

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
