use std::collections::HashMap;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    AssembleOrderCommand, OrderItemView, OrderStatus, OrderView, PaymentSummary, ShippingAddress,
};
use crate::domain::ports::OrderStore;
use crate::domain::pricing;
use crate::schema::{order_items, orders, products};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, ProductRow};

pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_view(order: OrderRow, items: Vec<OrderItemRow>) -> OrderView {
        OrderView {
            id: order.id,
            buyer_email: order.buyer_email,
            shipping_address: ShippingAddress {
                name: order.ship_name,
                line1: order.ship_line1,
                line2: order.ship_line2,
                city: order.ship_city,
                state: order.ship_state,
                postal_code: order.ship_postal_code,
                country: order.ship_country,
            },
            payment_summary: PaymentSummary {
                brand: order.card_brand,
                last4: order.card_last4,
                exp_month: order.card_exp_month,
                exp_year: order.card_exp_year,
            },
            items: items
                .into_iter()
                .map(|i| OrderItemView {
                    product_id: i.product_id,
                    name: i.name,
                    picture_url: i.picture_url,
                    price: i.price,
                    quantity: i.quantity,
                })
                .collect(),
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            payment_intent_id: order.payment_intent_id,
            status: order.status,
            created_at: order.created_at,
        }
    }

    fn load_view(conn: &mut PgConnection, order_id: Uuid) -> Result<OrderView, DomainError> {
        let order = orders::table
            .find(order_id)
            .select(OrderRow::as_select())
            .first(conn)?;

        let items = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .order(order_items::created_at.asc())
            .select(OrderItemRow::as_select())
            .load(conn)?;

        Ok(Self::to_view(order, items))
    }

    /// Update path: the intent already has an order, so its item list and
    /// totals are replaced instead of inserting a duplicate.
    fn replace_items(
        conn: &mut PgConnection,
        existing: &OrderRow,
        subtotal: i64,
        delivery_fee: i64,
    ) -> Result<(), DomainError> {
        if existing.subtotal != subtotal || existing.delivery_fee != delivery_fee {
            // The payment provider authorized the old amount; the recomputed
            // totals differ, so the intent needs amending before capture.
            log::warn!(
                "order {} resubmitted with different totals: {} + {} -> {} + {} (intent {})",
                existing.id,
                existing.subtotal,
                existing.delivery_fee,
                subtotal,
                delivery_fee,
                existing.payment_intent_id
            );
        }

        diesel::delete(order_items::table.filter(order_items::order_id.eq(existing.id)))
            .execute(conn)?;

        let affected = diesel::update(orders::table.find(existing.id))
            .set((
                orders::subtotal.eq(subtotal),
                orders::delivery_fee.eq(delivery_fee),
            ))
            .execute(conn)?;
        if affected == 0 {
            return Err(DomainError::PersistenceFailure);
        }
        Ok(())
    }
}

impl OrderStore for DieselOrderStore {
    fn assemble(&self, cmd: &AssembleOrderCommand) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Lock the product rows for the whole check-decrement sequence.
            //    Locking in id order keeps concurrent assemblies deadlock-free.
            let mut ids: Vec<Uuid> = cmd.lines.iter().map(|l| l.product_id).collect();
            ids.sort_unstable();
            ids.dedup();

            let locked: Vec<ProductRow> = products::table
                .filter(products::id.eq_any(&ids))
                .order(products::id.asc())
                .select(ProductRow::as_select())
                .for_update()
                .load(conn)?;
            let by_id: HashMap<Uuid, &ProductRow> =
                locked.iter().map(|p| (p.id, p)).collect();

            // 2. Check every line before touching any stock. One short line
            //    fails the whole assembly.
            for line in &cmd.lines {
                let product = by_id.get(&line.product_id).ok_or(DomainError::NotFound)?;
                if product.quantity_in_stock < line.quantity {
                    return Err(DomainError::InsufficientStock {
                        product: product.name.clone(),
                    });
                }
            }

            // 3. Snapshot current product state and decrement stock. The rows
            //    are still locked, so the checked values cannot have moved.
            let mut snapshots = Vec::with_capacity(cmd.lines.len());
            for line in &cmd.lines {
                let product = by_id[&line.product_id];
                diesel::update(products::table.find(product.id))
                    .set(
                        products::quantity_in_stock
                            .eq(products::quantity_in_stock - line.quantity),
                    )
                    .execute(conn)?;
                snapshots.push(OrderItemView {
                    product_id: product.id,
                    name: product.name.clone(),
                    picture_url: product.picture_url.clone(),
                    price: product.price,
                    quantity: line.quantity,
                });
            }

            let subtotal =
                pricing::subtotal(snapshots.iter().map(|s| (s.price, s.quantity)));
            let delivery_fee = pricing::delivery_fee(subtotal);

            // 4. Upsert keyed by the payment-intent id.
            let existing = orders::table
                .filter(orders::payment_intent_id.eq(&cmd.payment_intent_id))
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;

            let order_id = match existing {
                Some(row) => {
                    Self::replace_items(conn, &row, subtotal, delivery_fee)?;
                    row.id
                }
                None => {
                    let order_id = Uuid::new_v4();
                    let affected = diesel::insert_into(orders::table)
                        .values(&NewOrderRow {
                            id: order_id,
                            buyer_email: cmd.buyer_email.clone(),
                            ship_name: cmd.shipping_address.name.clone(),
                            ship_line1: cmd.shipping_address.line1.clone(),
                            ship_line2: cmd.shipping_address.line2.clone(),
                            ship_city: cmd.shipping_address.city.clone(),
                            ship_state: cmd.shipping_address.state.clone(),
                            ship_postal_code: cmd.shipping_address.postal_code.clone(),
                            ship_country: cmd.shipping_address.country.clone(),
                            card_brand: cmd.payment_summary.brand.clone(),
                            card_last4: cmd.payment_summary.last4,
                            card_exp_month: cmd.payment_summary.exp_month,
                            card_exp_year: cmd.payment_summary.exp_year,
                            subtotal,
                            delivery_fee,
                            payment_intent_id: cmd.payment_intent_id.clone(),
                            status: OrderStatus::Pending.as_str().to_string(),
                        })
                        .on_conflict(orders::payment_intent_id)
                        .do_nothing()
                        .execute(conn)?;

                    if affected == 0 {
                        // Lost a duplicate-intent race: the winning assembly
                        // committed between our lookup and insert. Fall
                        // through to the update path against its row.
                        let row = orders::table
                            .filter(orders::payment_intent_id.eq(&cmd.payment_intent_id))
                            .select(OrderRow::as_select())
                            .for_update()
                            .first(conn)
                            .optional()?
                            .ok_or(DomainError::PersistenceFailure)?;
                        Self::replace_items(conn, &row, subtotal, delivery_fee)?;
                        row.id
                    } else {
                        order_id
                    }
                }
            };

            let item_rows: Vec<NewOrderItemRow> = snapshots
                .iter()
                .map(|s| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: s.product_id,
                    name: s.name.clone(),
                    picture_url: s.picture_url.clone(),
                    price: s.price,
                    quantity: s.quantity,
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&item_rows)
                .execute(conn)?;

            Self::load_view(conn, order_id)
        })
    }

    fn find_for_buyer(
        &self,
        id: Uuid,
        buyer_email: &str,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::buyer_email.eq(buyer_email))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .order(order_items::created_at.asc())
            .select(OrderItemRow::as_select())
            .load(&mut conn)?;

        Ok(Some(Self::to_view(order, items)))
    }

    fn list_for_buyer(&self, buyer_email: &str) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::buyer_email.eq(buyer_email))
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        let items: Vec<OrderItemRow> = OrderItemRow::belonging_to(&rows)
            .select(OrderItemRow::as_select())
            .load(&mut conn)?;

        Ok(items
            .grouped_by(&rows)
            .into_iter()
            .zip(rows)
            .map(|(items, order)| Self::to_view(order, items))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::DieselOrderStore;
    use crate::domain::errors::DomainError;
    use crate::domain::order::{
        AssembleOrderCommand, PaymentSummary, RequestedLine, ShippingAddress,
    };
    use crate::domain::ports::OrderStore;
    use crate::infrastructure::testsupport::{insert_product, setup_db};
    use crate::schema::{orders, products};

    fn command(intent: &str, lines: Vec<(Uuid, i32)>) -> AssembleOrderCommand {
        AssembleOrderCommand {
            buyer_email: "buyer@test.com".to_string(),
            payment_intent_id: intent.to_string(),
            lines: lines
                .into_iter()
                .map(|(product_id, quantity)| RequestedLine {
                    product_id,
                    quantity,
                })
                .collect(),
            shipping_address: ShippingAddress {
                name: "Jo Buyer".to_string(),
                line1: "1 Test Street".to_string(),
                line2: None,
                city: "Testville".to_string(),
                state: None,
                postal_code: "12345".to_string(),
                country: "US".to_string(),
            },
            payment_summary: PaymentSummary {
                brand: "visa".to_string(),
                last4: 4242,
                exp_month: 12,
                exp_year: 2030,
            },
        }
    }

    fn stock_of(pool: &crate::db::DbPool, id: Uuid) -> i32 {
        let mut conn = pool.get().expect("Failed to get connection");
        products::table
            .find(id)
            .select(products::quantity_in_stock)
            .first(&mut conn)
            .expect("product should exist")
    }

    fn order_count(pool: &crate::db::DbPool) -> i64 {
        let mut conn = pool.get().expect("Failed to get connection");
        orders::table
            .count()
            .get_result(&mut conn)
            .expect("count failed")
    }

    #[tokio::test]
    async fn assemble_persists_order_and_decrements_stock() {
        let (_container, pool) = setup_db().await;
        let product = insert_product(&pool, 2_500, 5);
        let store = DieselOrderStore::new(pool.clone());

        let order = store
            .assemble(&command("pi_1", vec![(product, 3)]))
            .expect("assemble failed");

        assert_eq!(order.subtotal, 7_500);
        assert_eq!(order.delivery_fee, 500);
        assert_eq!(order.status, "Pending");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, 2_500);
        assert_eq!(stock_of(&pool, product), 2);
    }

    #[tokio::test]
    async fn insufficient_stock_rolls_back_everything() {
        let (_container, pool) = setup_db().await;
        let plenty = insert_product(&pool, 1_000, 10);
        let scarce = insert_product(&pool, 2_000, 5);
        let store = DieselOrderStore::new(pool.clone());

        let err = store
            .assemble(&command("pi_1", vec![(plenty, 2), (scarce, 6)]))
            .expect_err("should fail on stock");

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(stock_of(&pool, plenty), 10);
        assert_eq!(stock_of(&pool, scarce), 5);
        assert_eq!(order_count(&pool), 0);
    }

    #[tokio::test]
    async fn resubmission_updates_instead_of_duplicating() {
        let (_container, pool) = setup_db().await;
        let product = insert_product(&pool, 2_500, 10);
        let store = DieselOrderStore::new(pool.clone());

        let first = store
            .assemble(&command("pi_1", vec![(product, 2)]))
            .expect("first assemble failed");
        let second = store
            .assemble(&command("pi_1", vec![(product, 1)]))
            .expect("second assemble failed");

        assert_eq!(first.id, second.id);
        assert_eq!(order_count(&pool), 1);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].quantity, 1);
        assert_eq!(second.subtotal, 2_500);
        // Both submissions reserved stock against the live count.
        assert_eq!(stock_of(&pool, product), 7);
    }

    #[tokio::test]
    async fn unknown_product_fails_without_order() {
        let (_container, pool) = setup_db().await;
        let store = DieselOrderStore::new(pool.clone());

        let err = store
            .assemble(&command("pi_1", vec![(Uuid::new_v4(), 1)]))
            .expect_err("unknown product should fail");

        assert!(matches!(err, DomainError::NotFound));
        assert_eq!(order_count(&pool), 0);
    }

    #[tokio::test]
    async fn orders_are_scoped_to_their_buyer() {
        let (_container, pool) = setup_db().await;
        let product = insert_product(&pool, 1_000, 10);
        let store = DieselOrderStore::new(pool.clone());

        let order = store
            .assemble(&command("pi_1", vec![(product, 1)]))
            .expect("assemble failed");

        let found = store
            .find_for_buyer(order.id, "buyer@test.com")
            .expect("find failed");
        assert!(found.is_some());

        let not_yours = store
            .find_for_buyer(order.id, "someone@else.com")
            .expect("find failed");
        assert!(not_yours.is_none());

        let listed = store
            .list_for_buyer("buyer@test.com")
            .expect("list failed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].items.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_assemblies_never_oversell() {
        const CONTENDERS: usize = 4;
        let (_container, pool) = setup_db().await;
        let product = insert_product(&pool, 1_000, CONTENDERS as i32 - 1);

        let handles: Vec<_> = (0..CONTENDERS)
            .map(|i| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    DieselOrderStore::new(pool)
                        .assemble(&command(&format!("pi_{}", i), vec![(product, 1)]))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let stock_failures = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::InsufficientStock { .. })))
            .count();

        assert_eq!(successes, CONTENDERS - 1);
        assert_eq!(stock_failures, 1);
        assert_eq!(stock_of(&pool, product), 0);
        assert_eq!(order_count(&pool), (CONTENDERS - 1) as i64);
    }
}
