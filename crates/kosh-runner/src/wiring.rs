//! # Composition Root
//!
//! Builds every service and registers the listener graph. Listeners are the
//! only inter-service coupling; the registration order here is the fan-out
//! order at runtime.
//!
//! ```text
//! Pricing ──▶ AlgoStreaming ──▶ Streaming ──▶ [hist streaming | publish 3004]
//!    └──▶ Gui
//! MarketData ──▶ AlgoExecution ──▶ Execution ──▶ [hist executions | publish 3005 | TradeBooking]
//! TradeBooking ──▶ Position ──▶ [hist positions | Risk ──▶ hist risk]
//! Inquiry ──▶ hist inquiries
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};

use kosh_core::{Connector, Service};
use kosh_models::{Bond, ExecutionOrder, Inquiry, Position, PriceStream, Pv01};
use kosh_risk::{RiskListener, RiskService};
use kosh_services::{
    AlgoExecutionListener, AlgoExecutionService, AlgoStreamingListener, AlgoStreamingService,
    ExecutionListener, ExecutionService, GuiListener, GuiService, HistoricalDataListener,
    HistoricalDataService, InquiryService, MarketDataService, PersistTarget, PositionListener,
    PositionService, PricingService, StreamingListener, StreamingService,
    TradeBookingExecutionListener, TradeBookingService,
};

/// Every wired service, shared with the ingress tasks and available for
/// inspection after a run.
pub struct Backbone {
    pub pricing: Arc<Mutex<PricingService>>,
    pub market_data: Arc<Mutex<MarketDataService>>,
    pub trade_booking: Arc<Mutex<TradeBookingService>>,
    pub inquiry: Arc<Mutex<InquiryService>>,
    pub algo_streaming: Arc<Mutex<AlgoStreamingService>>,
    pub algo_execution: Arc<Mutex<AlgoExecutionService>>,
    pub streaming: Arc<Mutex<StreamingService>>,
    pub execution: Arc<Mutex<ExecutionService>>,
    pub position: Arc<Mutex<PositionService>>,
    pub risk: Arc<Mutex<RiskService>>,
    pub gui: Arc<Mutex<GuiService>>,
    pub historical_positions: Arc<Mutex<HistoricalDataService<Position>>>,
    pub historical_risk: Arc<Mutex<HistoricalDataService<Pv01<Bond>>>>,
    pub historical_executions: Arc<Mutex<HistoricalDataService<ExecutionOrder>>>,
    pub historical_streams: Arc<Mutex<HistoricalDataService<PriceStream>>>,
    pub historical_inquiries: Arc<Mutex<HistoricalDataService<Inquiry>>>,
}

/// Wire the full service graph. The outbound connectors are injected so the
/// binary can hand in socket publishers and tests can hand in collectors.
pub fn wire(
    results_dir: &Path,
    stream_out: Arc<dyn Connector<PriceStream>>,
    execution_out: Arc<dyn Connector<ExecutionOrder>>,
) -> Backbone {
    // historical persisters, one results file each
    let historical_positions = Arc::new(Mutex::new(HistoricalDataService::new(
        PersistTarget::Positions,
        results_dir,
    )));
    let historical_risk = Arc::new(Mutex::new(HistoricalDataService::new(
        PersistTarget::Risk,
        results_dir,
    )));
    let historical_executions = Arc::new(Mutex::new(HistoricalDataService::new(
        PersistTarget::Executions,
        results_dir,
    )));
    let historical_streams = Arc::new(Mutex::new(HistoricalDataService::new(
        PersistTarget::Streaming,
        results_dir,
    )));
    let historical_inquiries = Arc::new(Mutex::new(HistoricalDataService::new(
        PersistTarget::Inquiries,
        results_dir,
    )));

    // risk chain, bottom-up
    let risk = Arc::new(Mutex::new(RiskService::new()));
    risk.lock()
        .unwrap()
        .add_listener(Arc::new(HistoricalDataListener::new(historical_risk.clone())));

    let position = Arc::new(Mutex::new(PositionService::new()));
    {
        let mut service = position.lock().unwrap();
        service.add_listener(Arc::new(HistoricalDataListener::new(
            historical_positions.clone(),
        )));
        service.add_listener(Arc::new(RiskListener::new(risk.clone())));
    }

    let trade_booking = Arc::new(Mutex::new(TradeBookingService::new()));
    trade_booking
        .lock()
        .unwrap()
        .add_listener(Arc::new(PositionListener::new(position.clone())));

    // execution chain
    let execution = Arc::new(Mutex::new(ExecutionService::new(execution_out)));
    {
        let mut service = execution.lock().unwrap();
        service.add_listener(Arc::new(HistoricalDataListener::new(
            historical_executions.clone(),
        )));
        service.add_listener(Arc::new(TradeBookingExecutionListener::new(
            trade_booking.clone(),
        )));
    }

    let algo_execution = Arc::new(Mutex::new(AlgoExecutionService::new()));
    algo_execution
        .lock()
        .unwrap()
        .add_listener(Arc::new(ExecutionListener::new(execution.clone())));

    let market_data = Arc::new(Mutex::new(MarketDataService::new()));
    market_data
        .lock()
        .unwrap()
        .add_listener(Arc::new(AlgoExecutionListener::new(algo_execution.clone())));

    // streaming chain
    let streaming = Arc::new(Mutex::new(StreamingService::new(stream_out)));
    streaming
        .lock()
        .unwrap()
        .add_listener(Arc::new(HistoricalDataListener::new(
            historical_streams.clone(),
        )));

    let algo_streaming = Arc::new(Mutex::new(AlgoStreamingService::new()));
    algo_streaming
        .lock()
        .unwrap()
        .add_listener(Arc::new(StreamingListener::new(streaming.clone())));

    let gui = Arc::new(Mutex::new(GuiService::new(results_dir)));

    let pricing = Arc::new(Mutex::new(PricingService::new()));
    {
        let mut service = pricing.lock().unwrap();
        service.add_listener(Arc::new(AlgoStreamingListener::new(algo_streaming.clone())));
        service.add_listener(Arc::new(GuiListener::new(gui.clone())));
    }

    // inquiries
    let inquiry = Arc::new(Mutex::new(InquiryService::new()));
    inquiry
        .lock()
        .unwrap()
        .add_listener(Arc::new(HistoricalDataListener::new(
            historical_inquiries.clone(),
        )));

    Backbone {
        pricing,
        market_data,
        trade_booking,
        inquiry,
        algo_streaming,
        algo_execution,
        streaming,
        execution,
        position,
        risk,
        gui,
        historical_positions,
        historical_risk,
        historical_executions,
        historical_streams,
        historical_inquiries,
    }
}
