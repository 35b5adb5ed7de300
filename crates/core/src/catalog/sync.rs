use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::models::{Constructor, Driver};

use super::openf1::OpenF1Client;

/// Events emitted by the async catalog fetcher.
#[derive(Debug)]
pub enum CatalogEvent {
    /// Both lists were fetched.
    Loaded {
        /// Every draftable driver.
        drivers: Vec<Driver>,
        /// Every draftable team.
        constructors: Vec<Constructor>,
    },
    /// Fetching failed.
    Error(anyhow::Error),
}

/// Fetches the full catalog in the background.
pub struct CatalogSync {
    client: OpenF1Client,
}

impl CatalogSync {
    /// Fetcher using `client`.
    pub fn new(client: OpenF1Client) -> Self {
        Self { client }
    }

    /// Fetch drivers and constructors, sending the outcome to `sender`.
    pub async fn run(self, sender: mpsc::Sender<CatalogEvent>) -> Result<()> {
        let fetched = tokio::try_join!(self.client.drivers(), self.client.constructors());
        let event = match fetched {
            Ok((drivers, constructors)) => {
                info!(
                    drivers = drivers.len(),
                    constructors = constructors.len(),
                    "Catalog fetched"
                );
                CatalogEvent::Loaded {
                    drivers,
                    constructors,
                }
            }
            Err(err) => CatalogEvent::Error(err),
        };

        sender
            .send(event)
            .await
            .context("failed to send catalog event")?;
        Ok(())
    }
}
