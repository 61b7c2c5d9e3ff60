//! Network actor - runs prediction requests in the Tokio async runtime

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, execute_batch, execute_health, execute_predict};

/// Network actor that executes one HTTP request per command.
///
/// In-flight requests are never cancelled; each reply carries the id of the
/// command that produced it.
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>, timeout: Duration) -> Self {
        NetworkActor {
            client: create_client(timeout),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Predict { id, endpoint, form }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, endpoint = %endpoint, fields = form.len(), "Requesting prediction");
                                let result = execute_predict(&client, &endpoint, &form, id).await;
                                tracing::info!(id, ok = result.is_ok(), "Prediction completed");
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::BatchPredict { id, endpoint, file }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, endpoint = %endpoint, file = %file.name, "Uploading batch");
                                let result = execute_batch(&client, &endpoint, &file, id).await;
                                tracing::info!(id, ok = result.is_ok(), "Batch completed");
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::CheckHealth { id, endpoint }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                let result = execute_health(&client, &endpoint, id).await;
                                tracing::debug!(id, ok = result.is_ok(), "Health check completed");
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}
