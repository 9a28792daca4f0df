use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{self, DbPool, OrmConn},
    services::pricing::PriceTable,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub prices: Arc<PriceTable>,
}

impl AppState {
    pub fn new(pool: DbPool, prices: PriceTable) -> Self {
        let orm = db::create_orm_conn(&pool);
        Self {
            pool,
            orm,
            prices: Arc::new(prices),
        }
    }

    /// Connect, migrate and build the price table from configuration.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::create_pool(&config.database_url).await?;
        db::run_migrations(&pool).await?;
        let prices =
            PriceTable::new(config.unit_price).with_event_prices(config.event_prices.clone());
        Ok(Self::new(pool, prices))
    }
}
