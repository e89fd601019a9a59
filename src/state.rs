use std::sync::Arc;

use crate::{
    cache::MemoCache,
    config::AppConfig,
    db::{DbPool, OrmConn},
    payment::{CardStubGateway, PaymentGateway},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub cache: MemoCache,
    pub jwt_secret: String,
    pub payment: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: DbPool, orm: OrmConn, cache: MemoCache) -> Self {
        Self {
            pool,
            orm,
            cache,
            jwt_secret: config.jwt_secret.clone(),
            payment: Arc::new(CardStubGateway),
        }
    }
}
