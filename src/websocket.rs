//! WebSocket session serving one dashboard

use actix::prelude::*;
use actix_web_actors::ws;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, SharedTables};
use crate::error::Result;
use crate::messages::{ClientMessage, ServerMessage};

/// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state for all WebSocket connections: read-only tables and the
/// defaults for new dashboards.
pub struct AppState {
    pub tables: SharedTables,
    pub config: DashboardConfig,
}

impl AppState {
    pub fn new(tables: SharedTables, config: DashboardConfig) -> Self {
        Self { tables, config }
    }

    /// A fresh dashboard for a new session
    pub fn dashboard(&self) -> Result<Dashboard> {
        Dashboard::new(&self.tables, &self.config)
    }
}

/// WebSocket connection actor; exclusively owns its dashboard
pub struct DashboardSession {
    hb: Instant,
    dashboard: Dashboard,
}

impl DashboardSession {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            hb: Instant::now(),
            dashboard,
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                warn!("WebSocket client heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMessage) {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Failed to encode server message: {}", e),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, message: String) {
        Self::send(ctx, &ServerMessage::Error { message });
    }

    fn handle_client_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let kind = msg.kind();
        debug!("Received {}", kind);

        let Some(action) = msg.into_action() else {
            for rendered in self.dashboard.render_all() {
                match rendered {
                    Ok(output) => Self::send(ctx, &output.into()),
                    Err(e) => Self::send_error(ctx, e.to_string()),
                }
            }
            return;
        };

        match self.dashboard.dispatch(action) {
            Ok(Some(output)) => Self::send(ctx, &output.into()),
            Ok(None) => Self::send(
                ctx,
                &ServerMessage::Ack {
                    action: kind.to_string(),
                },
            ),
            Err(e) => Self::send_error(ctx, e.to_string()),
        }
    }
}

impl Actor for DashboardSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("Dashboard session started");
        self.hb(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("Dashboard session closed");
    }
}

impl StreamHandler<std::result::Result<ws::Message, ws::ProtocolError>> for DashboardSession {
    fn handle(
        &mut self,
        msg: std::result::Result<ws::Message, ws::ProtocolError>,
        ctx: &mut Self::Context,
    ) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => self.handle_client_message(client_msg, ctx),
                Err(e) => Self::send_error(ctx, format!("Invalid message format: {}", e)),
            },
            Ok(ws::Message::Binary(_)) => {
                warn!("Unexpected binary message");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => ctx.stop(),
        }
    }
}
