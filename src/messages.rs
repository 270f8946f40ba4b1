//! WebSocket message types for client-server communication

use serde::{Deserialize, Serialize};

use crate::controllers::{ComparisonOutput, GeoMapOutput, OverviewOutput, ScatterOutput};
use crate::dashboard::{Action, RenderOutput};

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Render every view for the session's current state
    Init,

    SelectField { field: String },

    RefreshOverview,

    SelectStates { states: Vec<String> },

    RefreshComparison,

    SelectState { state: String },

    SetLogScale { enabled: bool },

    RefreshScatter,

    SetPriceRange { min: f64, max: f64 },

    SetShowNa { enabled: bool },
}

impl ClientMessage {
    /// The dashboard action carried by this message; `None` for `Init`.
    pub fn into_action(self) -> Option<Action> {
        let action = match self {
            ClientMessage::Init => return None,
            ClientMessage::SelectField { field } => Action::SelectField { field },
            ClientMessage::RefreshOverview => Action::RefreshOverview,
            ClientMessage::SelectStates { states } => Action::SelectStates { states },
            ClientMessage::RefreshComparison => Action::RefreshComparison,
            ClientMessage::SelectState { state } => Action::SelectState { state },
            ClientMessage::SetLogScale { enabled } => Action::SetLogScale { enabled },
            ClientMessage::RefreshScatter => Action::RefreshScatter,
            ClientMessage::SetPriceRange { min, max } => Action::SetPriceRange { min, max },
            ClientMessage::SetShowNa { enabled } => Action::SetShowNa { enabled },
        };
        Some(action)
    }

    /// Message type name, as sent on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Init => "Init",
            ClientMessage::SelectField { .. } => "SelectField",
            ClientMessage::RefreshOverview => "RefreshOverview",
            ClientMessage::SelectStates { .. } => "SelectStates",
            ClientMessage::RefreshComparison => "RefreshComparison",
            ClientMessage::SelectState { .. } => "SelectState",
            ClientMessage::SetLogScale { .. } => "SetLogScale",
            ClientMessage::RefreshScatter => "RefreshScatter",
            ClientMessage::SetPriceRange { .. } => "SetPriceRange",
            ClientMessage::SetShowNa { .. } => "SetShowNa",
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Serialize, Clone)]
#[serde(tag = "type")]
pub enum ServerMessage {
    Overview(OverviewOutput),

    StateComparison(ComparisonOutput),

    Scatter(ScatterOutput),

    GeoMap(GeoMapOutput),

    /// State change accepted; nothing to redraw until the view is refreshed
    Ack { action: String },

    /// Error occurred
    Error { message: String },
}

impl From<RenderOutput> for ServerMessage {
    fn from(output: RenderOutput) -> Self {
        match output {
            RenderOutput::Overview(o) => ServerMessage::Overview(o),
            RenderOutput::StateComparison(o) => ServerMessage::StateComparison(o),
            RenderOutput::Scatter(o) => ServerMessage::Scatter(o),
            RenderOutput::GeoMap(o) => ServerMessage::GeoMap(o),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::PriceBar;

    #[test]
    fn test_parse_client_messages() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Init"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Init);
        assert_eq!(msg.into_action(), None);

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"SelectStates","states":["Ohio","Iowa"]}"#).unwrap();
        assert_eq!(msg.kind(), "SelectStates");
        assert_eq!(
            msg.into_action(),
            Some(Action::SelectStates {
                states: vec!["Ohio".to_string(), "Iowa".to_string()]
            })
        );
    }

    #[test]
    fn test_reject_unknown_message() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"DeleteRow","row_index":1}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"SetLogScale"}"#).is_err());
    }

    #[test]
    fn test_server_message_tagging() {
        let msg = ServerMessage::from(RenderOutput::StateComparison(ComparisonOutput {
            selected_states: vec!["Ohio".to_string()],
            bars: vec![PriceBar {
                state: "Ohio".to_string(),
                avg_price: Some(1.5),
            }],
            state_choices: vec!["Ohio".to_string(), "Iowa".to_string()],
        }));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "StateComparison");
        assert_eq!(json["bars"][0]["avg_price"], 1.5);
        assert_eq!(json["state_choices"][1], "Iowa");

        let json = serde_json::to_value(ServerMessage::Ack {
            action: "SelectState".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "Ack", "action": "SelectState"}));
    }
}
