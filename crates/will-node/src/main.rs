//! # Will Node
//!
//! Entry point running a will registry in-process.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `WILL_*` environment variables
//! 2. Validate it
//! 3. Install the log subscriber
//! 4. Wire the registry service to the in-memory ledger and event bus
//! 5. Forward bus events to the tracing sink on a background task
//! 6. Run the lifecycle walkthrough and print the settlement report

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use will_registry::telemetry::init_logging;
use will_registry::{
    AddBeneficiaryRequest, CreateWillRequest, InMemoryEventBus, InMemoryLedger, Principal,
    RegistryConfig, SystemTimeSource, TracingEventSink, WillEventPublisher, WillRegistryApi,
    WillRegistryService,
};

const OWNER: Principal = [0xEE; 20];
const TESTATOR: Principal = [0x01; 20];
const HEIR_A: Principal = [0xA1; 20];
const HEIR_B: Principal = [0xB0; 20];

#[tokio::main]
async fn main() -> Result<()> {
    let config = RegistryConfig::from_env().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    init_logging(&config)?;

    info!("===========================================");
    info!("  Will Node v{}", will_registry::VERSION);
    info!("===========================================");

    let ledger = Arc::new(InMemoryLedger::new());
    let bus = Arc::new(InMemoryEventBus::with_capacity(
        config.event_channel_capacity,
    ));
    let sink = Arc::new(TracingEventSink::new());

    let forwarder = {
        let mut events = bus.subscribe();
        let sink = sink.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        sink.publish(event).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Event forwarder lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    let service = WillRegistryService::new(
        OWNER,
        &config,
        ledger.clone(),
        bus,
        Arc::new(SystemTimeSource),
    );

    run_walkthrough(&service).await?;

    info!(
        heir_a = ledger.balance_of(&HEIR_A),
        heir_b = ledger.balance_of(&HEIR_B),
        held_balance = service.held_balance(),
        "Final balances"
    );

    // Dropping the service closes the bus and lets the forwarder finish.
    drop(service);
    forwarder.await.context("event forwarder panicked")?;
    info!(events_logged = sink.logged(), "Will node stopped");

    Ok(())
}

async fn run_walkthrough<S: WillRegistryApi>(service: &S) -> Result<()> {
    let will_id = service
        .create_will(
            TESTATOR,
            CreateWillRequest {
                testator_name: "Theodora".into(),
                execution_conditions: "upon death certificate".into(),
                deposited_value: 1000,
            },
        )
        .await?;

    service
        .add_beneficiary(TESTATOR, heir(will_id, HEIR_A, "Ada", 60))
        .await?;

    if let Err(e) = service
        .add_beneficiary(TESTATOR, heir(will_id, HEIR_B, "Basil", 50))
        .await
    {
        info!(error = %e, "Over-allocation refused as expected");
    }

    service
        .add_beneficiary(TESTATOR, heir(will_id, HEIR_B, "Basil", 40))
        .await?;

    let preview = service.preview_settlement(will_id)?;
    info!(
        will_id,
        distributed = preview.distributed,
        residual = preview.residual,
        "Settlement preview"
    );

    let report = service.execute_will(OWNER, will_id).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn heir(will_id: u64, recipient: Principal, name: &str, pct: u8) -> AddBeneficiaryRequest {
    AddBeneficiaryRequest {
        will_id,
        recipient,
        name: name.into(),
        allocation_percent: pct,
        asset_description: "estate share".into(),
    }
}
