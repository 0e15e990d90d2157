// Library root: the terminal front end over `moneyball_core`, exposed as a
// library so the binary and integration tests share it.

pub mod protocol;
pub mod tui;
