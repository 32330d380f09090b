//! Realtime Subscription
//!
//! Owns the websocket for one project's task channel. Dropping the
//! subscription leaves the channel, closes the socket, and stops the
//! heartbeat, so a view releases it simply by dropping it.

use std::rc::Rc;

use futures::channel::mpsc::UnboundedSender;
use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::protocol::{decode, topic_for, Inbound, PhoenixMessage, RefCounter};
use crate::board::TaskChange;
use crate::config::BackendConfig;
use crate::error::RealtimeError;
use crate::session::Session;

/// Phoenix drops sockets that stay silent for 60s
const HEARTBEAT_INTERVAL_MS: u32 = 25_000;

/// Delivered to the board view
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    Subscribed,
    Change(TaskChange),
    Failed(RealtimeError),
}

/// Tracks whether the view has already told the user the feed is down.
/// A socket error is usually followed by a close; only the first failure
/// is surfaced.
#[derive(Debug, Default)]
pub struct FeedHealth {
    reported: bool,
}

impl FeedHealth {
    /// True when `event` is the first failure seen
    pub fn should_report(&mut self, event: &RealtimeEvent) -> bool {
        if !matches!(event, RealtimeEvent::Failed(_)) || self.reported {
            return false;
        }
        self.reported = true;
        true
    }
}

fn forward_socket_error(events: &UnboundedSender<RealtimeEvent>) {
    log::warn!("[Realtime] Socket error");
    let _ = events.unbounded_send(RealtimeEvent::Failed(RealtimeError::Socket));
}

pub struct RealtimeSubscription {
    socket: WebSocket,
    topic: String,
    join_ref: String,
    refs: Rc<RefCounter>,
    _heartbeat: Interval,
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl RealtimeSubscription {
    /// Open the socket and join the project's task channel. Events arrive on
    /// `events` until the subscription is dropped.
    pub fn open(
        config: &BackendConfig,
        session: &Session,
        project_id: &str,
        events: UnboundedSender<RealtimeEvent>,
    ) -> Result<Self, RealtimeError> {
        let url = config
            .realtime_url()
            .map_err(|e| RealtimeError::Open(e.to_string()))?;
        let socket = WebSocket::new(&url).map_err(|e| RealtimeError::Open(format!("{:?}", e)))?;

        let topic = topic_for(project_id);
        let refs = Rc::new(RefCounter::default());
        let join_ref = refs.next();
        let join_frame = PhoenixMessage::join(&topic, project_id, &session.access_token, &join_ref).encode()?;

        let on_open = {
            let socket = socket.clone();
            let topic = topic.clone();
            Closure::<dyn FnMut()>::new(move || {
                log::debug!("[Realtime] Joining {}", topic);
                if let Err(e) = socket.send_with_str(&join_frame) {
                    log::warn!("[Realtime] Join send failed: {:?}", e);
                }
            })
        };

        let on_message = {
            let topic = topic.clone();
            let join_ref = join_ref.clone();
            let events = events.clone();
            Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
                let Some(text) = event.data().as_string() else {
                    return;
                };
                let forwarded = match decode(&text, &topic, &join_ref) {
                    Ok(Inbound::Change(change)) => Some(RealtimeEvent::Change(change)),
                    Ok(Inbound::Joined) => {
                        log::info!("[Realtime] Subscribed to {}", topic);
                        Some(RealtimeEvent::Subscribed)
                    }
                    Ok(Inbound::Rejected(reason)) => Some(RealtimeEvent::Failed(RealtimeError::Rejected(reason))),
                    Ok(Inbound::Closed) => Some(RealtimeEvent::Failed(RealtimeError::Closed)),
                    Ok(Inbound::Ignored) => None,
                    Err(e) => {
                        log::warn!("[Realtime] {}", e);
                        None
                    }
                };
                if let Some(event) = forwarded {
                    let _ = events.unbounded_send(event);
                }
            })
        };

        let on_error = {
            let events = events.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| forward_socket_error(&events))
        };

        let on_close = {
            let events = events.clone();
            Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
                log::info!("[Realtime] Socket closed (code {})", event.code());
                let _ = events.unbounded_send(RealtimeEvent::Failed(RealtimeError::Closed));
            })
        };

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let heartbeat = {
            let socket = socket.clone();
            let refs = refs.clone();
            Interval::new(HEARTBEAT_INTERVAL_MS, move || {
                if socket.ready_state() != WebSocket::OPEN {
                    return;
                }
                if let Ok(text) = PhoenixMessage::heartbeat(&refs.next()).encode() {
                    let _ = socket.send_with_str(&text);
                }
            })
        };

        Ok(Self {
            socket,
            topic,
            join_ref,
            refs,
            _heartbeat: heartbeat,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        })
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);

        if self.socket.ready_state() == WebSocket::OPEN {
            let leave = PhoenixMessage::leave(&self.topic, &self.refs.next(), &self.join_ref);
            if let Ok(text) = leave.encode() {
                let _ = self.socket.send_with_str(&text);
            }
        }
        let _ = self.socket.close();
        log::debug!("[Realtime] Released {}", self.topic);
    }
}
