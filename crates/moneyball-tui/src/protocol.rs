// Types passed between the input handler, the view state and the main loop.

use moneyball_core::session::SessionCommand;

/// Identifies the content shown in the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    Ranking,
    Radar,
    Scatter,
    Data,
}

impl TabId {
    pub const ALL: [TabId; 4] = [TabId::Ranking, TabId::Radar, TabId::Scatter, TabId::Data];
}

/// The panel that receives cursor and adjustment keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Main,
    Weights,
    Filters,
}

impl Panel {
    pub fn next(self) -> Panel {
        match self {
            Panel::Main => Panel::Weights,
            Panel::Weights => Panel::Filters,
            Panel::Filters => Panel::Main,
        }
    }

    pub fn previous(self) -> Panel {
        match self {
            Panel::Main => Panel::Filters,
            Panel::Weights => Panel::Main,
            Panel::Filters => Panel::Weights,
        }
    }
}

/// What a key press asks the main loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Forward to the session and recompute.
    Session(SessionCommand),
    Quit,
}
