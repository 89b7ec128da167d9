use sea_orm::*;
use thiserror::Error;
use uuid::Uuid;

use crate::models::payment_items;
use crate::models::payments::{self, CheckoutItem, PaymentStatus, PaymentWithItems};
use crate::models::users;

#[derive(Debug, Error)]
pub enum FulfillError {
    #[error("Payment not found")]
    PaymentNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Insert a Pending payment with its line items, atomically.
pub async fn insert_payment(
    db: &DatabaseConnection,
    user_id: Uuid,
    method: &str,
    items: Vec<CheckoutItem>,
) -> Result<PaymentWithItems, TransactionError<DbErr>> {
    let method = method.to_string();

    db.transaction::<_, PaymentWithItems, DbErr>(move |txn| {
        Box::pin(async move {
            let payment = payments::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                status: Set(PaymentStatus::Pending),
                method: Set(method),
                created_at: Set(chrono::Utc::now()),
            }
            .insert(txn)
            .await?;

            let mut inserted = Vec::with_capacity(items.len());
            for item in items {
                let row = payment_items::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    payment_id: Set(payment.id),
                    name: Set(item.name),
                    amount: Set(item.amount),
                    quantity: Set(1),
                }
                .insert(txn)
                .await?;
                inserted.push(row);
            }

            Ok(PaymentWithItems {
                payment,
                items: inserted,
            })
        })
    })
    .await
}

/// Mark a payment Success and credit the sum of its item amounts to the
/// user's points balance, atomically.
///
/// Idempotent: a payment that is already Success is returned unchanged, so
/// webhook retries cannot double-credit. The payment and user rows are read
/// with `SELECT ... FOR UPDATE`, so a concurrent redelivery blocks until
/// this transaction commits and then sees the Success status.
pub async fn fulfill_payment(
    db: &DatabaseConnection,
    payment_id: Uuid,
) -> Result<payments::Model, TransactionError<FulfillError>> {
    db.transaction::<_, payments::Model, FulfillError>(move |txn| {
        Box::pin(async move {
            let payment = payments::Entity::find_by_id(payment_id)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(FulfillError::Db)?
                .ok_or(FulfillError::PaymentNotFound)?;

            if payment.status == PaymentStatus::Success {
                return Ok(payment);
            }

            let items = payment_items::Entity::find()
                .filter(payment_items::Column::PaymentId.eq(payment.id))
                .all(txn)
                .await
                .map_err(FulfillError::Db)?;
            let credit: f64 = items.iter().map(|i| i.amount * i.quantity as f64).sum();

            let user = users::Entity::find_by_id(payment.user_id)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(FulfillError::Db)?
                .ok_or(FulfillError::UserNotFound)?;

            let balance = user.points + credit;
            let mut user_active: users::ActiveModel = user.into();
            user_active.points = Set(balance);
            user_active.update(txn).await.map_err(FulfillError::Db)?;

            let mut payment_active: payments::ActiveModel = payment.into();
            payment_active.status = Set(PaymentStatus::Success);

            Ok(payment_active.update(txn).await.map_err(FulfillError::Db)?)
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn already_successful_payment_is_not_credited_again() {
        let payment = payments::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: PaymentStatus::Success,
            method: "card".to_string(),
            created_at: chrono::Utc::now(),
        };

        // Only the payment read is stubbed: if fulfillment tried to load the
        // items or touch the user's balance, the transaction would fail on
        // the empty result buffer.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[payment.clone()]])
            .into_connection();

        let result = fulfill_payment(&db, payment.id).await.unwrap();
        assert_eq!(result, payment);
    }

    #[tokio::test]
    async fn missing_payment_is_reported() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<payments::Model>::new()])
            .into_connection();

        let err = fulfill_payment(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Transaction(FulfillError::PaymentNotFound)
        ));
    }
}
