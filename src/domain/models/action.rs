use super::ChatRequest;

pub enum Action {
    LoadHistory(String),
    SendMessage(ChatRequest),
}
