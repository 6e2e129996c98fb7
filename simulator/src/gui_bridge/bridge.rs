use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use anyhow::{anyhow, Result};
use fmcwcore::SimulationConfig;
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

type SharedModel = Arc<RwLock<VisualizationModel>>;

/// Hosts the range-Doppler HTTP endpoint and reruns simulations posted by clients.
pub struct GuiBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            runner,
        }
    }

    /// Starts the HTTP server on a background thread with its own runtime.
    pub fn serve(&self, addr: SocketAddr) {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("rdm")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&*guard)
            });

        let post_route = warp::path("simulate")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: SimulationConfig, state: SharedModel, runner: Arc<Runner>| async move {
                    let outcome =
                        tokio::task::spawn_blocking(move || runner.execute_config(config))
                            .await
                            .map_err(|err| anyhow!("simulation task failed: {}", err))
                            .and_then(|result| result);
                    let reply = match outcome {
                        Ok(result) => {
                            let model = VisualizationModel::from_result(&result);
                            let body = json!({
                                "status": "ok",
                                "peaks": model.peaks,
                                "frames": model.frames,
                            });
                            *state.write().unwrap_or_else(PoisonError::into_inner) = model;
                            warp::reply::with_status(warp::reply::json(&body), StatusCode::OK)
                        }
                        Err(err) => {
                            error!("simulate request failed: {:#}", err);
                            warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "error",
                                    "message": format!("{:#}", err),
                                })),
                                StatusCode::BAD_REQUEST,
                            )
                        }
                    };
                    Ok::<_, warp::Rejection>(reply)
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(post_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build GUI bridge runtime: {}", err);
                    return;
                }
            };
            info!("GUI bridge listening on http://{}", addr);
            runtime.block_on(async move {
                warp::serve(routes).run(addr).await;
            });
        });
    }

    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("visualization state lock poisoned"))?;
        *guard = model.clone();
        info!(
            "[GUI] rdm {}x{}, peaks: {}, frames: {}",
            guard.velocity_axis.len(),
            guard.range_axis.len(),
            guard.peaks.len(),
            guard.frames
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state.read().unwrap().clone()
    }
}
