use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::basket::{BasketItemView, BasketView};
use crate::domain::errors::DomainError;
use crate::domain::ports::BasketStore;
use crate::schema::{basket_items, baskets, products};

use super::models::{BasketItemRow, BasketRow, NewBasketItemRow, NewBasketRow, ProductRow};

pub struct DieselBasketStore {
    pool: DbPool,
}

impl DieselBasketStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn load_view(
        conn: &mut PgConnection,
        basket_id: &str,
    ) -> Result<Option<BasketView>, DomainError> {
        let basket = baskets::table
            .find(basket_id)
            .select(BasketRow::as_select())
            .first(conn)
            .optional()?;

        let Some(basket) = basket else {
            return Ok(None);
        };

        let lines: Vec<(BasketItemRow, ProductRow)> = basket_items::table
            .inner_join(products::table)
            .filter(basket_items::basket_id.eq(&basket.id))
            .order(basket_items::created_at.asc())
            .select((BasketItemRow::as_select(), ProductRow::as_select()))
            .load(conn)?;

        Ok(Some(BasketView {
            id: basket.id,
            items: lines
                .into_iter()
                .map(|(item, product)| BasketItemView {
                    product_id: product.id,
                    product_name: product.name,
                    picture_url: product.picture_url,
                    unit_price: product.price,
                    quantity: item.quantity,
                })
                .collect(),
            payment_intent_id: basket.payment_intent_id,
            client_secret: basket.client_secret,
        }))
    }
}

impl BasketStore for DieselBasketStore {
    fn get_basket_with_items(&self, basket_id: &str) -> Result<Option<BasketView>, DomainError> {
        let mut conn = self.pool.get()?;
        Self::load_view(&mut conn, basket_id)
    }

    fn add_item(
        &self,
        basket_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<BasketView, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::Internal(
                "quantity must be positive".to_string(),
            ));
        }
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let product_exists: i64 = products::table
                .filter(products::id.eq(product_id))
                .count()
                .get_result(conn)?;
            if product_exists == 0 {
                return Err(DomainError::NotFound);
            }

            // Basket created on first interaction.
            diesel::insert_into(baskets::table)
                .values(&NewBasketRow {
                    id: basket_id.to_string(),
                })
                .on_conflict(baskets::id)
                .do_nothing()
                .execute(conn)?;

            // Merge into an existing line for the same product.
            diesel::insert_into(basket_items::table)
                .values(&NewBasketItemRow {
                    id: Uuid::new_v4(),
                    basket_id: basket_id.to_string(),
                    product_id,
                    quantity,
                })
                .on_conflict((basket_items::basket_id, basket_items::product_id))
                .do_update()
                .set(basket_items::quantity.eq(basket_items::quantity + quantity))
                .execute(conn)?;

            Self::load_view(conn, basket_id)?.ok_or(DomainError::NotFound)
        })
    }

    fn remove_item(
        &self,
        basket_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<BasketView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let line = basket_items::table
                .filter(basket_items::basket_id.eq(basket_id))
                .filter(basket_items::product_id.eq(product_id))
                .select(BasketItemRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound)?;

            if line.quantity > quantity {
                diesel::update(basket_items::table.find(line.id))
                    .set(basket_items::quantity.eq(line.quantity - quantity))
                    .execute(conn)?;
            } else {
                diesel::delete(basket_items::table.find(line.id)).execute(conn)?;
            }

            Self::load_view(conn, basket_id)?.ok_or(DomainError::NotFound)
        })
    }

    fn set_payment_intent(
        &self,
        basket_id: &str,
        payment_intent_id: &str,
        client_secret: &str,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::update(baskets::table.find(basket_id))
            .set((
                baskets::payment_intent_id.eq(payment_intent_id),
                baskets::client_secret.eq(client_secret),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
