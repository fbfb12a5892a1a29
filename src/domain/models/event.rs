use tui_textarea::Input;

use super::ChatOutcome;
use super::HistoryOutcome;

pub enum Event {
    ChatResponse(ChatOutcome),
    HistoryResponse(HistoryOutcome),
    HealthCheckFailed(String),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardCTRLR(),
    KeyboardEsc(),
    KeyboardInput(Input),
    KeyboardPaste(String),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
