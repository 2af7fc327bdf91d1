//! Slash-command parsing.

/// The fixed command set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    AddSubject,
    Mark,
    Undo,
    Status,
    CanIMiss,
    LeavePlanner,
    SetAttendance,
    PresetCyber,
    Cancel,
    Help,
    Unknown(String),
}

impl Command {
    /// Parse a leading-slash command. Returns `None` for non-command text.
    ///
    /// Group chats append the bot handle (`/mark@RollcallBot`); the suffix
    /// is tolerated and ignored. Anything after the first whitespace is
    /// dropped.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let word = rest.split_whitespace().next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("").to_lowercase();

        Some(match name.as_str() {
            "start" => Self::Start,
            "addsubject" => Self::AddSubject,
            "mark" => Self::Mark,
            "undo" => Self::Undo,
            "status" => Self::Status,
            "canimiss" => Self::CanIMiss,
            "leaveplanner" => Self::LeavePlanner,
            "setattendance" => Self::SetAttendance,
            "preset_cyber" => Self::PresetCyber,
            "cancel" => Self::Cancel,
            "help" => Self::Help,
            _ => Self::Unknown(name),
        })
    }
}
