/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! gRPC front end — a thin request/response wrapper over the engine.
//!
//! The service carries no logic of its own: it resolves the request id into
//! an engine call and folds the resulting [`ApplyReport`] into the response
//! counters.  Store misses map to `NOT_FOUND`, everything else store-related
//! to `UNAVAILABLE`.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::info;

use crate::engine::{ConfigEngine, EngineError};
use crate::proto::cncconfig_v1::config_service_server::ConfigService;
use crate::proto::cncconfig_v1::{ConfigurationRequest, ConfigurationResponse};
use crate::store::StoreError;

pub use crate::proto::cncconfig_v1::config_service_server::ConfigServiceServer;

pub struct ConfigServiceImpl {
    engine: Arc<ConfigEngine>,
    secret: String,
}

impl ConfigServiceImpl {
    pub fn new(engine: Arc<ConfigEngine>, secret: impl Into<String>) -> Self {
        Self {
            engine,
            secret: secret.into(),
        }
    }
}

fn response_from_report(report: &crate::engine::ApplyReport) -> ConfigurationResponse {
    ConfigurationResponse {
        success: report.is_fully_applied(),
        message: report.summary(),
        targets_attempted: report.attempted() as u32,
        targets_succeeded: report.succeeded.len() as u32,
        targets_failed: report.failed.len() as u32,
    }
}

fn status_from_engine_error(err: &EngineError) -> Status {
    let store_error = match err {
        EngineError::Configuration { source, .. } | EngineError::Topology { source } => source,
    };
    match store_error {
        StoreError::NotFound { .. } => Status::not_found(err.to_string()),
        StoreError::Unavailable { .. } => Status::unavailable(err.to_string()),
    }
}

#[tonic::async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn apply_configuration(
        &self,
        request: Request<ConfigurationRequest>,
    ) -> Result<Response<ConfigurationResponse>, Status> {
        let id = request.into_inner().id;
        info!(%id, "ApplyConfiguration received");

        match self.engine.apply_configuration(&id, &self.secret).await {
            Ok(report) => Ok(Response::new(response_from_report(&report))),
            Err(e) => Err(status_from_engine_error(&e)),
        }
    }

    async fn ping(
        &self,
        _request: Request<ConfigurationRequest>,
    ) -> Result<Response<ConfigurationResponse>, Status> {
        Ok(Response::new(ConfigurationResponse {
            success: true,
            message: "pong".to_string(),
            ..Default::default()
        }))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
