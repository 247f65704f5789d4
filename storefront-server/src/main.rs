//! Development entry point.
//!
//! Serves the invoice endpoint over an in-memory order store seeded with a
//! demo order. The production deployment wires the same router to the real
//! storage and auth collaborators.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

use storefront::catalog;
use storefront::order::{Order, OrderAggregate, OrderItem, OrderStatus};
use storefront::types::{Money, OrderId, OrderNumber, ProductId, Quantity, UserId};
use storefront_memory::InMemoryOrderStore;
use storefront_server::{router, AppState, StaticTokenVerifier};

fn demo_aggregate() -> Result<OrderAggregate> {
    let product_id = ProductId::try_new("truenav-pro".to_string())?;
    let product = catalog::find_product(&product_id)
        .ok_or_else(|| anyhow::anyhow!("demo product missing from catalogue"))?;
    let unit_price = product
        .price
        .ok_or_else(|| anyhow::anyhow!("demo product has no list price"))?;

    let quantity = Quantity::new(1)?;
    let subtotal = unit_price.multiply_by_quantity(quantity)?;
    let shipping = Money::from_paise(50_000)?;
    let tax = Money::from_paise(360_000)?;
    let total = subtotal.checked_add(shipping)?.checked_add(tax)?;

    Ok(OrderAggregate {
        order: Order {
            id: OrderId::new(),
            order_number: OrderNumber::try_new("SA-1001".to_string())?,
            status: OrderStatus::Confirmed,
            subtotal,
            shipping_cost: shipping,
            tax,
            total,
            shipping_address: None,
            expected_delivery: None,
            created_at: Utc::now(),
        },
        items: vec![OrderItem {
            id: Uuid::now_v7(),
            product_id: product.id,
            product_name: product.name,
            quantity,
            unit_price,
            total_price: subtotal,
        }],
        shipments: vec![],
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr: SocketAddr = std::env::var("STOREFRONT_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    let token =
        std::env::var("STOREFRONT_DEV_TOKEN").unwrap_or_else(|_| "dev-token".to_string());

    let user_id = UserId::new();
    let store = InMemoryOrderStore::new();
    let aggregate = demo_aggregate()?;
    let order_id = aggregate.order.id;
    store.insert(user_id, aggregate);

    let state = AppState {
        store: Arc::new(store),
        verifier: Arc::new(StaticTokenVerifier::new().with_token(token.clone(), user_id)),
    };

    info!(%addr, "starting storefront server");
    info!(%order_id, %token, "demo order seeded; pass the token as a bearer credential");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
