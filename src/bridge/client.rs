use actix_web::rt;
use awc::{
    error::WsProtocolError,
    ws::{Frame, Message},
};
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::bridge::{
    node::handle_request,
    protocol::{BridgeOp, GET_PLAN_TYPE, OCCUPANCY_GRID_TYPE},
};
use crate::config::{Config, MAX_PAYLOAD_BYTES};
use crate::logic::planner::Planner;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("could not connect to rosbridge at {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("websocket protocol error: {0}")]
    Protocol(#[from] awc::error::WsProtocolError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    pub url: String,
    pub request_topic: String,
    pub response_topic: String,
}

impl BridgeSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.rosbridge_url(),
            request_topic: config.request_topic.clone(),
            response_topic: config.response_topic.clone(),
        }
    }

    /// Operations sent right after connecting.
    pub fn handshake(&self) -> Vec<BridgeOp> {
        vec![
            BridgeOp::Advertise {
                topic: self.response_topic.clone(),
                msg_type: OCCUPANCY_GRID_TYPE.into(),
            },
            BridgeOp::Subscribe {
                topic: self.request_topic.clone(),
                msg_type: GET_PLAN_TYPE.into(),
            },
        ]
    }

    /// Operations sent before closing.
    pub fn farewell(&self) -> Vec<BridgeOp> {
        vec![
            BridgeOp::Unsubscribe {
                topic: self.request_topic.clone(),
            },
            BridgeOp::Unadvertise {
                topic: self.response_topic.clone(),
            },
        ]
    }
}

fn text_frame(op: &BridgeOp) -> Option<Message> {
    match serde_json::to_string(op) {
        Ok(text) => Some(Message::Text(text.into())),
        Err(e) => {
            error!("could not encode rosbridge operation: {e}");
            None
        }
    }
}

/// Connects to rosbridge and serves plan requests until the connection
/// closes. Each request is planned on its own task; replies are funnelled
/// through a single writer.
///
/// Frames up to `MAX_PAYLOAD_BYTES` are accepted, the same bound as the HTTP
/// body limit. A frame that cannot be decoded is logged and skipped; only a
/// close or a broken socket ends the loop.
pub async fn run(settings: BridgeSettings, planner: Planner) -> Result<(), BridgeError> {
    let (_response, connection) = awc::Client::new()
        .ws(settings.url.as_str())
        .max_frame_size(MAX_PAYLOAD_BYTES)
        .connect()
        .await
        .map_err(|e| BridgeError::Connect {
            url: settings.url.clone(),
            reason: e.to_string(),
        })?;
    info!(
        "connected to rosbridge at {}: {} -> {}",
        settings.url, settings.request_topic, settings.response_topic
    );

    let (mut sink, mut stream) = connection.split();
    let (outbound, mut queue) = mpsc::unbounded_channel::<Message>();

    let writer = rt::spawn(async move {
        while let Some(message) = queue.recv().await {
            if let Err(e) = sink.send(message).await {
                error!("failed to write to rosbridge: {e}");
                break;
            }
        }
        let _ = sink.close().await;
    });

    for message in settings.handshake().iter().filter_map(text_frame) {
        let _ = outbound.send(message);
    }

    let mut outcome = Ok(());
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Frame::Text(bytes)) => dispatch(&settings, &planner, &outbound, &bytes),
            Ok(Frame::Ping(bytes)) => {
                let _ = outbound.send(Message::Pong(bytes));
            }
            Ok(Frame::Close(reason)) => {
                info!("rosbridge closed the connection: {reason:?}");
                break;
            }
            Ok(_) => {}
            Err(e @ WsProtocolError::Io(_)) => {
                error!("lost connection to rosbridge: {e}");
                outcome = Err(BridgeError::Protocol(e));
                break;
            }
            Err(e) => warn!("dropping unreadable rosbridge frame: {e}"),
        }
    }

    for message in settings.farewell().iter().filter_map(text_frame) {
        let _ = outbound.send(message);
    }
    let _ = outbound.send(Message::Close(None));
    drop(outbound);
    let _ = writer.await;
    outcome
}

fn dispatch(
    settings: &BridgeSettings,
    planner: &Planner,
    outbound: &UnboundedSender<Message>,
    text: &[u8],
) {
    let op = match serde_json::from_slice::<BridgeOp>(text) {
        Ok(op) => op,
        Err(e) => {
            warn!("ignoring unparsable rosbridge frame: {e}");
            return;
        }
    };
    let BridgeOp::Publish { topic, msg } = op else {
        return;
    };
    if topic != settings.request_topic {
        debug!("ignoring message on {topic}");
        return;
    }

    let planner = planner.clone();
    let outbound = outbound.clone();
    let response_topic = settings.response_topic.clone();
    rt::spawn(async move {
        let Some(grid) = handle_request(&planner, msg).await else {
            return;
        };
        let msg = match serde_json::to_value(&grid) {
            Ok(msg) => msg,
            Err(e) => {
                error!("could not encode planned grid: {e}");
                return;
            }
        };
        let publish = BridgeOp::Publish {
            topic: response_topic,
            msg,
        };
        if let Some(frame) = text_frame(&publish) {
            if outbound.send(frame).is_err() {
                warn!("connection closed before the planned grid could be published");
            }
        }
    });
}
