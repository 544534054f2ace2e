/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! NETCONF-over-SSH session adapter.
//!
//! Thin plumbing around `russh`: password authentication, the `netconf` SSH
//! subsystem, the initial hello exchange and RFC 6242 end-of-message framing
//! (`]]>]]>`).  Everything above the framing — which RPCs to send, what the
//! payload means — lives in the plugins; everything below it belongs to the
//! SSH library.
//!
//! Each RPC round-trip is bounded by the opener's timeout; a timed-out RPC
//! surfaces as [`TransportError::Timeout`] for that target only.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{Datastore, ManagementSession, SessionOpener, TransportError, DEFAULT_RPC_TIMEOUT_SECS};
use crate::topology::DeviceTarget;

const NETCONF_BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
const EOM: &[u8] = b"]]>]]>";

// ── Frame builders ────────────────────────────────────────────────────────────

fn build_hello() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <hello xmlns=\"{NETCONF_BASE_NS}\">\
         <capabilities><capability>urn:ietf:params:netconf:base:1.0</capability></capabilities>\
         </hello>]]>]]>"
    )
}

fn build_rpc(message_id: u64, body: &str) -> String {
    format!("<rpc message-id=\"{message_id}\" xmlns=\"{NETCONF_BASE_NS}\">{body}</rpc>]]>]]>")
}

fn build_edit_config(datastore: Datastore, payload: &str) -> String {
    format!(
        "<edit-config><target><{ds}/></target>\
         <default-operation>merge</default-operation>\
         <config>{payload}</config></edit-config>",
        ds = datastore.wire_name()
    )
}

fn build_get_config(datastore: Datastore, filter: Option<&str>) -> String {
    let filter = filter
        .map(|f| format!("<filter type=\"subtree\">{f}</filter>"))
        .unwrap_or_default();
    format!(
        "<get-config><source><{ds}/></source>{filter}</get-config>",
        ds = datastore.wire_name()
    )
}

fn find_eom(buf: &[u8]) -> Option<usize> {
    buf.windows(EOM.len()).position(|w| w == EOM)
}

// ── SSH handler ───────────────────────────────────────────────────────────────

/// TSN switches in lab networks rotate host keys on factory reset; pinning is
/// handled at deployment level (known_hosts is not consulted here).
struct AcceptAllHostKeys;

#[async_trait]
impl client::Handler for AcceptAllHostKeys {
    type Error = russh::Error;

    async fn check_server_key(&mut self, _key: &key::PublicKey) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

// ── Opener ────────────────────────────────────────────────────────────────────

/// [`SessionOpener`] implementation connecting over SSH to the device's
/// `netconf` subsystem.
pub struct SshNetconfOpener {
    rpc_timeout: Duration,
}

impl SshNetconfOpener {
    pub fn new(rpc_timeout: Duration) -> Self {
        Self { rpc_timeout }
    }
}

impl Default for SshNetconfOpener {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS))
    }
}

#[async_trait]
impl SessionOpener for SshNetconfOpener {
    async fn open(
        &self,
        target: &DeviceTarget,
    ) -> Result<Box<dyn ManagementSession>, TransportError> {
        let endpoint = target.management.endpoint();
        let connect_err = |detail: String| TransportError::Connect {
            endpoint: endpoint.clone(),
            detail,
        };

        let config = Arc::new(client::Config::default());
        let mut handle = client::connect(
            config,
            (
                target.management.ip_address.as_str(),
                target.management.port,
            ),
            AcceptAllHostKeys,
        )
        .await
        .map_err(|e| connect_err(e.to_string()))?;

        let authenticated = handle
            .authenticate_password(&target.management.username, &target.secret)
            .await
            .map_err(|e| connect_err(e.to_string()))?;
        if !authenticated {
            return Err(TransportError::AuthRejected {
                endpoint: endpoint.clone(),
                username: target.management.username.clone(),
            });
        }

        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|e| connect_err(e.to_string()))?;
        channel
            .request_subsystem(true, "netconf")
            .await
            .map_err(|e| connect_err(format!("netconf subsystem: {e}")))?;

        let mut session = SshNetconfSession {
            endpoint,
            handle,
            channel,
            rpc_timeout: self.rpc_timeout,
            message_id: 0,
        };

        // Hello exchange: both sides announce capabilities before any RPC.
        session.send_frame(&build_hello()).await?;
        let server_hello = session.read_frame("hello").await?;
        debug!(endpoint = %session.endpoint, hello_len = server_hello.len(), "hello exchanged");

        Ok(Box::new(session))
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

struct SshNetconfSession {
    endpoint: String,
    handle: Handle<AcceptAllHostKeys>,
    channel: russh::Channel<client::Msg>,
    rpc_timeout: Duration,
    message_id: u64,
}

impl SshNetconfSession {
    async fn send_frame(&mut self, data: &str) -> Result<(), TransportError> {
        self.channel
            .data(data.as_bytes())
            .await
            .map_err(|e| TransportError::Rpc {
                rpc: "send",
                detail: e.to_string(),
            })
    }

    /// Accumulates channel data until the `]]>]]>` delimiter, bounded by the
    /// RPC timeout.
    async fn read_frame(&mut self, rpc: &'static str) -> Result<String, TransportError> {
        let seconds = self.rpc_timeout.as_secs();
        let channel = &mut self.channel;

        let read = async move {
            let mut buf: Vec<u8> = Vec::new();
            loop {
                match channel.wait().await {
                    Some(ChannelMsg::Data { data }) => {
                        buf.extend_from_slice(&data);
                        if let Some(pos) = find_eom(&buf) {
                            return Ok(String::from_utf8_lossy(&buf[..pos]).into_owned());
                        }
                    }
                    Some(ChannelMsg::Eof | ChannelMsg::Close) | None => {
                        return Err(TransportError::Closed);
                    }
                    Some(_) => {}
                }
            }
        };

        match timeout(self.rpc_timeout, read).await {
            Ok(frame) => frame,
            Err(_) => Err(TransportError::Timeout { rpc, seconds }),
        }
    }

    async fn rpc(&mut self, rpc: &'static str, body: &str) -> Result<String, TransportError> {
        self.message_id += 1;
        let frame = build_rpc(self.message_id, body);
        self.send_frame(&frame).await?;

        let reply = self.read_frame(rpc).await?;
        if reply.trim().is_empty() {
            return Err(TransportError::EmptyReply);
        }
        if reply.contains("<rpc-error") {
            let detail: String = reply.chars().take(512).collect();
            return Err(TransportError::Rpc { rpc, detail });
        }
        Ok(reply)
    }
}

#[async_trait]
impl ManagementSession for SshNetconfSession {
    async fn get_config(
        &mut self,
        datastore: Datastore,
        filter: Option<&str>,
    ) -> Result<String, TransportError> {
        self.rpc("get-config", &build_get_config(datastore, filter))
            .await
    }

    async fn edit_config(
        &mut self,
        datastore: Datastore,
        payload: &str,
    ) -> Result<(), TransportError> {
        self.rpc("edit-config", &build_edit_config(datastore, payload))
            .await
            .map(|_| ())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        // Best effort: the peer may already have torn the channel down.
        if let Err(e) = self.rpc("close-session", "<close-session/>").await {
            warn!(error = %e, "close-session RPC failed, dropping the channel");
        }
        let _ = self.channel.eof().await;
        let _ = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
