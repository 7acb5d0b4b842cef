//! Kitchen View Builder
//!
//! Projects the order documents into the per-stall slices the kitchen
//! screens render. The venue-wide view explodes each active parent
//! order into one slice per contributing tenant; the tenant view reads
//! the tenant's own sub-orders. Both are FIFO by checkout time.

use serde::{Deserialize, Serialize};
use shared::order::{CartItem, CustomerRef, OrderStatus, PaymentMethod, TenantItemStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{ParentOrder, SubOrder};
use crate::db::repository::{ParentOrderRepository, SubOrderRepository};
use crate::utils::{AppError, AppResult};

/// One tenant's portion of one order, as shown on a kitchen screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSlice {
    pub receipt_number: i64,
    pub tenant_id: String,
    pub tenant_name: String,
    pub items: Vec<CartItem>,
    /// This tenant's readiness
    pub slice_status: TenantItemStatus,
    /// The whole order's status
    pub order_status: OrderStatus,
    /// Present on the venue-wide view; the tenant view works from
    /// sub-orders, which do not carry customer or payment data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Epoch millis of the checkout
    pub created_at: i64,
}

#[derive(Clone)]
pub struct KitchenViewBuilder {
    db: Surreal<Db>,
}

impl KitchenViewBuilder {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Venue-wide kitchen view: every active order, one slice per
    /// contributing tenant
    pub async fn venue_view(&self, venue_id: &str) -> AppResult<Vec<OrderSlice>> {
        let orders = ParentOrderRepository::new(self.db.clone())
            .find_active_by_venue(venue_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Self::explode(&orders))
    }

    /// Tenant kitchen view: the stall's own active sub-orders
    pub async fn tenant_view(&self, tenant_id: &str) -> AppResult<Vec<OrderSlice>> {
        let sub_orders = SubOrderRepository::new(self.db.clone())
            .find_active_by_tenant(tenant_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Self::from_sub_orders(&sub_orders))
    }

    /// Explode parent orders into per-tenant slices, preserving the
    /// FIFO order of the input
    pub fn explode(orders: &[ParentOrder]) -> Vec<OrderSlice> {
        let mut slices = Vec::new();
        for order in orders {
            for (tenant_key, items) in
                crate::orders::FanOutService::partition_by_tenant(&order.items)
            {
                let slice_status = order
                    .items_status
                    .get(&tenant_key)
                    .copied()
                    .unwrap_or(TenantItemStatus::Processing);
                let tenant_name = items
                    .first()
                    .map(|i| i.store_name.clone())
                    .unwrap_or_default();
                slices.push(OrderSlice {
                    receipt_number: order.receipt_number,
                    tenant_id: tenant_key,
                    tenant_name,
                    items,
                    slice_status,
                    order_status: order.status,
                    customer: Some(order.customer.clone()),
                    payment_method: Some(order.payment_method),
                    created_at: order.created_at,
                });
            }
        }
        slices
    }

    /// Project sub-orders into slices, preserving the FIFO order of
    /// the input
    pub fn from_sub_orders(sub_orders: &[SubOrder]) -> Vec<OrderSlice> {
        sub_orders
            .iter()
            .map(|sub| OrderSlice {
                receipt_number: sub.receipt_number,
                tenant_id: sub.tenant.key().to_string(),
                tenant_name: sub
                    .items
                    .first()
                    .map(|i| i.store_name.clone())
                    .unwrap_or_default(),
                items: sub.items.clone(),
                slice_status: if sub.status == OrderStatus::ReadyForPickup {
                    TenantItemStatus::ReadyForPickup
                } else {
                    TenantItemStatus::Processing
                },
                order_status: sub.status,
                customer: None,
                payment_method: None,
                created_at: sub.created_at,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderTotals;
    use std::collections::BTreeMap;
    use surrealdb::RecordId;

    fn item(store: &str, product: &str) -> CartItem {
        CartItem {
            store_id: store.into(),
            store_name: format!("Stall {}", store.to_uppercase()),
            product_id: product.into(),
            name: product.into(),
            price: 10000.0,
            quantity: 1,
            note: None,
        }
    }

    fn parent(receipt: i64, items: Vec<CartItem>, created_at: i64) -> ParentOrder {
        let items_status: BTreeMap<String, TenantItemStatus> = items
            .iter()
            .map(|i| (i.store_id.clone(), TenantItemStatus::Processing))
            .collect();
        ParentOrder {
            id: Some(RecordId::from_table_key("parent_order", format!("o{receipt}"))),
            venue: RecordId::from_table_key("venue", "v"),
            receipt_number: receipt,
            customer: CustomerRef {
                id: "c1".into(),
                name: "Sari".into(),
                contact: None,
            },
            items,
            totals: OrderTotals::default(),
            status: OrderStatus::Processing,
            items_status,
            table: None,
            payment_method: PaymentMethod::PayAtCashier,
            intake: RecordId::from_table_key("intake_queue", format!("i{receipt}")),
            created_at,
            completed_at: None,
        }
    }

    #[test]
    fn test_explode_one_slice_per_tenant() {
        let order = parent(1, vec![item("a", "sate"), item("b", "es_teh"), item("a", "nasi")], 100);
        let slices = KitchenViewBuilder::explode(&[order]);
        assert_eq!(slices.len(), 2);
        let a = slices.iter().find(|s| s.tenant_id == "a").unwrap();
        assert_eq!(a.items.len(), 2);
        assert_eq!(a.tenant_name, "Stall A");
        assert_eq!(a.slice_status, TenantItemStatus::Processing);
        assert_eq!(a.customer.as_ref().unwrap().name, "Sari");
    }

    #[test]
    fn test_explode_reads_per_tenant_readiness() {
        let mut order = parent(2, vec![item("a", "sate"), item("b", "es_teh")], 100);
        order
            .items_status
            .insert("a".into(), TenantItemStatus::ReadyForPickup);
        let slices = KitchenViewBuilder::explode(&[order]);
        let a = slices.iter().find(|s| s.tenant_id == "a").unwrap();
        let b = slices.iter().find(|s| s.tenant_id == "b").unwrap();
        assert_eq!(a.slice_status, TenantItemStatus::ReadyForPickup);
        assert_eq!(b.slice_status, TenantItemStatus::Processing);
    }

    #[test]
    fn test_explode_preserves_fifo() {
        let older = parent(1, vec![item("a", "sate")], 100);
        let newer = parent(2, vec![item("a", "nasi")], 200);
        let slices = KitchenViewBuilder::explode(&[older, newer]);
        assert_eq!(slices[0].receipt_number, 1);
        assert_eq!(slices[1].receipt_number, 2);
    }

    #[test]
    fn test_sub_order_projection() {
        let sub = SubOrder {
            id: Some(RecordId::from_table_key("sub_order", "s1")),
            tenant: RecordId::from_table_key("tenant", "a"),
            venue: RecordId::from_table_key("venue", "v"),
            receipt_number: 7,
            items: vec![item("a", "sate")],
            status: OrderStatus::ReadyForPickup,
            created_at: 100,
        };
        let slices = KitchenViewBuilder::from_sub_orders(&[sub]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].tenant_id, "a");
        assert_eq!(slices[0].slice_status, TenantItemStatus::ReadyForPickup);
        assert_eq!(slices[0].order_status, OrderStatus::ReadyForPickup);
        assert!(slices[0].customer.is_none());
    }
}
