use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::{
    AttendanceService, SeaOrmAttendanceService, SeaOrmShiftService, SeaOrmStatsService,
    SeaOrmTransactionService, ShiftService, StatsService, TransactionService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub attendance: Arc<dyn AttendanceService>,

    pub shifts: Arc<dyn ShiftService>,

    pub transactions: Arc<dyn TransactionService>,

    pub stats: Arc<dyn StatsService>,

    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        Self::with_event_bus(config, event_bus).await
    }

    pub async fn with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let shifts =
            Arc::new(SeaOrmShiftService::new(store.clone())) as Arc<dyn ShiftService>;

        let attendance = Arc::new(SeaOrmAttendanceService::new(store.clone(), shifts.clone()))
            as Arc<dyn AttendanceService>;

        let transactions =
            Arc::new(SeaOrmTransactionService::new(store.clone(), event_bus.clone()))
                as Arc<dyn TransactionService>;

        let stats = Arc::new(SeaOrmStatsService::new(store.clone())) as Arc<dyn StatsService>;

        Ok(Self {
            config,
            store,
            attendance,
            shifts,
            transactions,
            stats,
            event_bus,
        })
    }
}
